use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::MySqlPool;

use crate::api::{error_response, extract_bearer};
use crate::services::auth_service;
use crate::services::auth_service::{AuthResponse, LoginRequest, RefreshTokenRequest};
use crate::utils::error::AppError;

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account is inactive")
    )
)]
pub async fn login(
    pool: web::Data<MySqlPool>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(&pool, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            error_response(&e)
        }
    }
}

pub async fn refresh_token(
    pool: web::Data<MySqlPool>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    log::info!("🔄 POST /auth/refresh");

    match auth_service::refresh(&pool, &request).await {
        Ok(response) => {
            log::info!("✅ Token refreshed for {}", response.user.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Token refresh failed: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Invalid or expired token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn verify_token(req: HttpRequest) -> HttpResponse {
    log::info!("✓ GET /auth/verify");

    let Some(token) = extract_bearer(&req) else {
        return error_response(&AppError::Unauthorized(
            "No valid Authorization header".to_string(),
        ));
    };

    match auth_service::verify_access_token(&token) {
        Ok(claims) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "valid": true,
            "user_id": claims.user_id,
            "email": claims.sub,
            "role": claims.role,
            "exp": claims.exp
        })),
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = crate::models::UserOut),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(pool: web::Data<MySqlPool>, req: HttpRequest) -> HttpResponse {
    log::info!("👤 GET /auth/me");

    let Some(token) = extract_bearer(&req) else {
        return error_response(&AppError::Unauthorized(
            "No valid Authorization header".to_string(),
        ));
    };

    let claims = match auth_service::verify_access_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            log::warn!("❌ Invalid token: {}", e);
            return error_response(&e);
        }
    };

    match auth_service::get_current_user(&pool, &claims).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => {
            log::error!("❌ Failed to load current user: {}", e);
            error_response(&e)
        }
    }
}
