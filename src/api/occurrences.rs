use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::MySqlPool;

use crate::api::{error_response, require_admin};
use crate::models::Occurrence;
use crate::services::auth_service::Claims;
use crate::services::occurrence_service;
use crate::services::occurrence_service::{CreateOccurrenceRequest, UpdateOccurrenceRequest};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct OccurrenceFilter {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    /// Filtra por arquivadas/ativas; omitido retorna todas
    pub archived: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/v1/occurrences",
    tag = "Occurrences",
    request_body = CreateOccurrenceRequest,
    responses(
        (status = 201, description = "Occurrence created", body = Occurrence),
        (status = 400, description = "Invalid input")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_occurrence(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    request: web::Json<CreateOccurrenceRequest>,
) -> HttpResponse {
    log::info!("📝 POST /occurrences - by user {}", claims.user_id);

    match occurrence_service::create_occurrence(&pool, request.into_inner(), claims.user_id).await {
        Ok(occurrence) => HttpResponse::Created().json(occurrence),
        Err(e) => {
            log::warn!("❌ Failed to create occurrence: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/occurrences",
    tag = "Occurrences",
    params(OccurrenceFilter),
    responses(
        (status = 200, description = "Paginated occurrences", body = [Occurrence])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_occurrences(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    query: web::Query<OccurrenceFilter>,
) -> HttpResponse {
    log::info!("📋 GET /occurrences - by user {}", claims.user_id);

    match occurrence_service::list_occurrences(
        &pool,
        query.skip.unwrap_or(0),
        query.limit.unwrap_or(100),
        query.archived,
    )
    .await
    {
        Ok(occurrences) => {
            log::info!("✅ Listed {} occurrences", occurrences.len());
            HttpResponse::Ok().json(occurrences)
        }
        Err(e) => {
            log::error!("❌ Error listing occurrences: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/occurrences/{occurrence_id}",
    tag = "Occurrences",
    responses(
        (status = 200, description = "Occurrence data", body = Occurrence),
        (status = 404, description = "Occurrence not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_occurrence(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    occurrence_id: web::Path<i64>,
) -> HttpResponse {
    let occurrence_id = occurrence_id.into_inner();
    log::info!("👤 GET /occurrences/{} - by user {}", occurrence_id, claims.user_id);

    match occurrence_service::get_occurrence_by_id(&pool, occurrence_id).await {
        Ok(occurrence) => HttpResponse::Ok().json(occurrence),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/occurrences/{occurrence_id}",
    tag = "Occurrences",
    request_body = UpdateOccurrenceRequest,
    responses(
        (status = 200, description = "Occurrence updated", body = Occurrence),
        (status = 404, description = "Occurrence not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_occurrence(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    occurrence_id: web::Path<i64>,
    request: web::Json<UpdateOccurrenceRequest>,
) -> HttpResponse {
    let occurrence_id = occurrence_id.into_inner();
    log::info!("🔧 PUT /occurrences/{} - by user {}", occurrence_id, claims.user_id);

    match occurrence_service::update_occurrence(&pool, occurrence_id, request.into_inner()).await {
        Ok(occurrence) => HttpResponse::Ok().json(occurrence),
        Err(e) => {
            log::warn!("❌ Failed to update occurrence {}: {}", occurrence_id, e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/occurrences/{occurrence_id}",
    tag = "Occurrences",
    responses(
        (status = 200, description = "Occurrence deleted"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Occurrence not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_occurrence(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    occurrence_id: web::Path<i64>,
) -> HttpResponse {
    let occurrence_id = occurrence_id.into_inner();
    log::info!("🗑️ DELETE /occurrences/{} - by {}", occurrence_id, claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match occurrence_service::delete_occurrence(&pool, occurrence_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Occurrence deleted"
        })),
        Err(e) => error_response(&e),
    }
}
