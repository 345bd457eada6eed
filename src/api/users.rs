use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::MySqlPool;

use crate::api::{error_response, extract_bearer, require_admin, Pagination};
use crate::models::AuthorizedSystem;
use crate::services::auth_service::{self, Claims};
use crate::services::user_service;
use crate::services::user_service::{
    CreateUserRequest, UpdateUserRequest, UserCheckRequest, UserCheckResponse,
};
use crate::utils::error::AppError;

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = crate::models::UserOut),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email, CPF or username already registered")
    )
)]
pub async fn create_user(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    request: web::Json<CreateUserRequest>,
) -> HttpResponse {
    log::info!("📝 POST /users - email: {}", request.email);

    // Registro é público; só um admin autenticado pode escolher o role
    let caller_is_admin = extract_bearer(&req)
        .and_then(|token| auth_service::verify_access_token(&token).ok())
        .map(|claims| claims.role.is_admin())
        .unwrap_or(false);

    match user_service::create_user(&pool, request.into_inner(), caller_is_admin).await {
        Ok(user) => {
            log::info!("✅ Registration successful: {}", user.email);
            HttpResponse::Created().json(user)
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(Pagination),
    responses(
        (status = 200, description = "Paginated user list", body = [crate::models::UserOut]),
        (status = 403, description = "Admin privileges required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    query: web::Query<Pagination>,
) -> HttpResponse {
    log::info!("📋 GET /users - requested by {}", claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(10);

    match user_service::list_users(&pool, skip, limit).await {
        Ok(users) => {
            log::info!("✅ Listed {} users", users.len());
            HttpResponse::Ok().json(users)
        }
        Err(e) => {
            log::error!("❌ Error listing users: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    responses(
        (status = 200, description = "User data", body = crate::models::UserOut),
        (status = 403, description = "Not the caller's own record"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    user_id: web::Path<i64>,
) -> HttpResponse {
    let user_id = user_id.into_inner();
    log::info!("👤 GET /users/{} - requested by {}", user_id, claims.sub);

    // Cliente só enxerga o próprio cadastro
    if claims.user_id != user_id {
        if let Err(e) = require_admin(&claims) {
            return error_response(&e);
        }
    }

    match user_service::get_user_by_id(&pool, user_id).await {
        Ok(Some(user)) => HttpResponse::Ok().json(crate::models::UserOut::from(user)),
        Ok(None) => error_response(&AppError::NotFound("User not found".to_string())),
        Err(e) => {
            log::error!("❌ Error fetching user {}: {}", user_id, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = crate::models::UserOut),
        (status = 403, description = "Insufficient rights"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    user_id: web::Path<i64>,
    request: web::Json<UpdateUserRequest>,
) -> HttpResponse {
    let user_id = user_id.into_inner();
    log::info!("🔧 PUT /users/{} - requested by {}", user_id, claims.sub);

    let is_admin = claims.role.is_admin();

    if claims.user_id != user_id && !is_admin {
        return error_response(&AppError::Forbidden(
            "Users can only update their own record".to_string(),
        ));
    }

    match user_service::update_user(&pool, user_id, request.into_inner(), is_admin).await {
        Ok(user) => {
            log::info!("✅ User {} updated", user_id);
            HttpResponse::Ok().json(user)
        }
        Err(e) => {
            log::warn!("❌ Update failed for user {}: {}", user_id, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    user_id: web::Path<i64>,
) -> HttpResponse {
    let user_id = user_id.into_inner();
    log::info!("🗑️ DELETE /users/{} - requested by {}", user_id, claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match user_service::delete_user(&pool, user_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "User deleted"
        })),
        Err(e) => {
            log::warn!("❌ Delete failed for user {}: {}", user_id, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users/check",
    tag = "Users",
    request_body = UserCheckRequest,
    responses(
        (status = 200, description = "Existence check result", body = UserCheckResponse),
        (status = 401, description = "API key not provided"),
        (status = 403, description = "Invalid or inactive API key")
    ),
    security(("api_key" = []))
)]
pub async fn check_user(
    system: web::ReqData<AuthorizedSystem>,
    pool: web::Data<MySqlPool>,
    request: web::Json<UserCheckRequest>,
) -> HttpResponse {
    log::info!(
        "🔎 POST /users/check - system: {} (cpf: {})",
        system.name,
        request.cpf
    );

    match user_service::check_user_registered(&pool, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::error!("❌ Existence check failed: {}", e);
            error_response(&e)
        }
    }
}
