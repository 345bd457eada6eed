use actix_web::{web, HttpResponse};
use sqlx::MySqlPool;

use crate::api::{error_response, require_admin, Pagination};
use crate::models::{AuthorizedSystem, AuthorizedSystemOut};
use crate::services::auth_service::Claims;
use crate::services::authorized_system_service;
use crate::services::authorized_system_service::{CreateSystemRequest, UpdateSystemRequest};

#[utoipa::path(
    post,
    path = "/api/v1/authorized-systems",
    tag = "Authorized Systems",
    request_body = CreateSystemRequest,
    responses(
        (status = 201, description = "System created; the API key is only returned here",
            body = crate::models::AuthorizedSystemWithKey),
        (status = 403, description = "Admin privileges required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_system(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    request: web::Json<CreateSystemRequest>,
) -> HttpResponse {
    log::info!("📝 POST /authorized-systems - by {}", claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match authorized_system_service::create_system(&pool, request.into_inner()).await {
        Ok(system) => HttpResponse::Created().json(system),
        Err(e) => {
            log::warn!("❌ Failed to create system: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/authorized-systems",
    tag = "Authorized Systems",
    params(Pagination),
    responses(
        (status = 200, description = "Registered systems (keys omitted)", body = [AuthorizedSystemOut]),
        (status = 403, description = "Admin privileges required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_systems(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    query: web::Query<Pagination>,
) -> HttpResponse {
    log::info!("📋 GET /authorized-systems - by {}", claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match authorized_system_service::list_systems(
        &pool,
        query.skip.unwrap_or(0),
        query.limit.unwrap_or(100),
    )
    .await
    {
        Ok(systems) => HttpResponse::Ok().json(systems),
        Err(e) => {
            log::error!("❌ Error listing systems: {}", e);
            error_response(&e)
        }
    }
}

pub async fn get_system(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    system_id: web::Path<i64>,
) -> HttpResponse {
    let system_id = system_id.into_inner();
    log::info!("👤 GET /authorized-systems/{} - by {}", system_id, claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match authorized_system_service::get_system(&pool, system_id).await {
        Ok(system) => HttpResponse::Ok().json(system),
        Err(e) => error_response(&e),
    }
}

pub async fn update_system(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    system_id: web::Path<i64>,
    request: web::Json<UpdateSystemRequest>,
) -> HttpResponse {
    let system_id = system_id.into_inner();
    log::info!("🔧 PUT /authorized-systems/{} - by {}", system_id, claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match authorized_system_service::update_system(&pool, system_id, request.into_inner()).await {
        Ok(system) => HttpResponse::Ok().json(system),
        Err(e) => {
            log::warn!("❌ Failed to update system {}: {}", system_id, e);
            error_response(&e)
        }
    }
}

pub async fn touch_last_activity(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    system_id: web::Path<i64>,
) -> HttpResponse {
    let system_id = system_id.into_inner();
    log::info!(
        "🔧 PUT /authorized-systems/{}/last-activity - by {}",
        system_id,
        claims.sub
    );

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match authorized_system_service::touch_last_activity(&pool, system_id).await {
        Ok(system) => HttpResponse::Ok().json(system),
        Err(e) => error_response(&e),
    }
}

pub async fn delete_system(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    system_id: web::Path<i64>,
) -> HttpResponse {
    let system_id = system_id.into_inner();
    log::info!("🗑️ DELETE /authorized-systems/{} - by {}", system_id, claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match authorized_system_service::delete_system(&pool, system_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Authorized system deleted"
        })),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/authorized-systems/validate-key",
    tag = "Authorized Systems",
    responses(
        (status = 200, description = "Key is valid; returns the calling system", body = AuthorizedSystemOut),
        (status = 401, description = "API key not provided"),
        (status = 403, description = "Invalid or inactive API key")
    ),
    security(("api_key" = []))
)]
pub async fn validate_key(system: web::ReqData<AuthorizedSystem>) -> HttpResponse {
    // A validação (e o carimbo de last_activity) já aconteceu no middleware
    log::info!("✓ POST /authorized-systems/validate-key - system: {}", system.name);

    HttpResponse::Ok().json(AuthorizedSystemOut::from(system.into_inner()))
}
