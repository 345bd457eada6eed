use actix_web::{web, HttpResponse};
use sqlx::MySqlPool;

use crate::api::{error_response, require_admin, Pagination};
use crate::models::Review;
use crate::services::auth_service::Claims;
use crate::services::review_service;
use crate::services::review_service::{CreateReviewRequest, UpdateReviewRequest};

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Occurrence not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_review(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    request: web::Json<CreateReviewRequest>,
) -> HttpResponse {
    log::info!(
        "📝 POST /reviews - occurrence {} by user {}",
        request.occurrence_id,
        claims.user_id
    );

    match review_service::create_review(&pool, request.into_inner(), claims.user_id).await {
        Ok(review) => HttpResponse::Created().json(review),
        Err(e) => {
            log::warn!("❌ Failed to create review: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    tag = "Reviews",
    params(Pagination),
    responses(
        (status = 200, description = "Paginated reviews", body = [Review])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_reviews(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    query: web::Query<Pagination>,
) -> HttpResponse {
    log::info!("📋 GET /reviews - by user {}", claims.user_id);

    match review_service::list_reviews(&pool, query.skip.unwrap_or(0), query.limit.unwrap_or(100))
        .await
    {
        Ok(reviews) => HttpResponse::Ok().json(reviews),
        Err(e) => {
            log::error!("❌ Error listing reviews: {}", e);
            error_response(&e)
        }
    }
}

pub async fn get_review(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    review_id: web::Path<i64>,
) -> HttpResponse {
    let review_id = review_id.into_inner();
    log::info!("👤 GET /reviews/{} - by user {}", review_id, claims.user_id);

    match review_service::get_review_by_id(&pool, review_id).await {
        Ok(review) => HttpResponse::Ok().json(review),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/occurrence/{occurrence_id}",
    tag = "Reviews",
    responses(
        (status = 200, description = "Reviews attached to an occurrence", body = [Review])
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_reviews_for_occurrence(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    occurrence_id: web::Path<i64>,
) -> HttpResponse {
    let occurrence_id = occurrence_id.into_inner();
    log::info!(
        "📋 GET /reviews/occurrence/{} - by user {}",
        occurrence_id,
        claims.user_id
    );

    match review_service::list_reviews_for_occurrence(&pool, occurrence_id).await {
        Ok(reviews) => HttpResponse::Ok().json(reviews),
        Err(e) => error_response(&e),
    }
}

pub async fn update_review(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    review_id: web::Path<i64>,
    request: web::Json<UpdateReviewRequest>,
) -> HttpResponse {
    let review_id = review_id.into_inner();
    log::info!("🔧 PUT /reviews/{} - by user {}", review_id, claims.user_id);

    match review_service::update_review(&pool, review_id, request.into_inner()).await {
        Ok(review) => HttpResponse::Ok().json(review),
        Err(e) => {
            log::warn!("❌ Failed to update review {}: {}", review_id, e);
            error_response(&e)
        }
    }
}

pub async fn delete_review(
    claims: web::ReqData<Claims>,
    pool: web::Data<MySqlPool>,
    review_id: web::Path<i64>,
) -> HttpResponse {
    let review_id = review_id.into_inner();
    log::info!("🗑️ DELETE /reviews/{} - by {}", review_id, claims.sub);

    if let Err(e) = require_admin(&claims) {
        return error_response(&e);
    }

    match review_service::delete_review(&pool, review_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Review deleted"
        })),
        Err(e) => error_response(&e),
    }
}
