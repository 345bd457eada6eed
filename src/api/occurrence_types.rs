use actix_web::{web, HttpResponse};
use sqlx::MySqlPool;

use crate::api::{error_response, require_admin};
use crate::models::OccurrenceType;
use crate::services::auth_service::Claims;
use crate::services::occurrence_type_service;
use crate::services::occurrence_type_service::{
    CreateOccurrenceTypeRequest, UpdateOccurrenceTypeRequest,
};

#[utoipa::path(
    get,
    path = "/api/v1/occurrence-types",
    tag = "Occurrence Types",
    responses(
        (status = 200, description = "All occurrence types", body = [OccurrenceType])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_types(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
) -> HttpResponse {
    log::info!("📋 GET /occurrence-types - by user {}", claims.user_id);

    match occurrence_type_service::list_types(&pool).await {
        Ok(types) => HttpResponse::Ok().json(types),
        Err(e) => {
            log::error!("❌ Error listing occurrence types: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/occurrence-types",
    tag = "Occurrence Types",
    request_body = CreateOccurrenceTypeRequest,
    responses(
        (status = 201, description = "Type created", body = OccurrenceType),
        (status = 403, description = "Admin privileges required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_type(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    request: web::Json<CreateOccurrenceTypeRequest>,
) -> HttpResponse {
    log::info!("📝 POST /occurrence-types - by {}", claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match occurrence_type_service::create_type(&pool, request.into_inner()).await {
        Ok(occurrence_type) => HttpResponse::Created().json(occurrence_type),
        Err(e) => {
            log::warn!("❌ Failed to create occurrence type: {}", e);
            error_response(&e)
        }
    }
}

pub async fn update_type(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    type_id: web::Path<i64>,
    request: web::Json<UpdateOccurrenceTypeRequest>,
) -> HttpResponse {
    let type_id = type_id.into_inner();
    log::info!("🔧 PUT /occurrence-types/{} - by {}", type_id, claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match occurrence_type_service::update_type(&pool, type_id, request.into_inner()).await {
        Ok(occurrence_type) => HttpResponse::Ok().json(occurrence_type),
        Err(e) => error_response(&e),
    }
}

pub async fn delete_type(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    type_id: web::Path<i64>,
) -> HttpResponse {
    let type_id = type_id.into_inner();
    log::info!("🗑️ DELETE /occurrence-types/{} - by {}", type_id, claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match occurrence_type_service::delete_type(&pool, type_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Occurrence type deleted"
        })),
        Err(e) => error_response(&e),
    }
}
