use chrono::Utc;
use serde::Deserialize;
use sqlx::MySqlPool;

use crate::models::Review;
use crate::services::occurrence_service;
use crate::utils::error::{map_db_err, AppError};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateReviewRequest {
    pub occurrence_id: i64,
    /// When present, the parent occurrence moves to this status.
    pub status_id: Option<i64>,
    pub public_text: Option<String>,
    pub private_text: Option<String>,
    pub forwarded_agency_id: Option<i64>,
    pub forwarded_user_id: Option<i64>,
    pub file_url: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateReviewRequest {
    pub status_id: Option<i64>,
    pub public_text: Option<String>,
    pub private_text: Option<String>,
    pub forwarded_agency_id: Option<i64>,
    pub forwarded_user_id: Option<i64>,
    pub file_url: Option<String>,
}

/// Creates a review for an existing occurrence, attributed to the caller.
pub async fn create_review(
    pool: &MySqlPool,
    request: CreateReviewRequest,
    reviewer_user_id: i64,
) -> Result<Review, AppError> {
    // 404 se a ocorrência não existir
    occurrence_service::get_occurrence_by_id(pool, request.occurrence_id).await?;

    if request.public_text.is_none() && request.private_text.is_none() {
        return Err(AppError::InvalidRequest(
            "A review needs public or private text".to_string(),
        ));
    }

    let result = sqlx::query(
        "INSERT INTO reviews (occurrence_id, status_id, public_text, private_text, reviewer_user_id, \
           forwarded_agency_id, forwarded_user_id, file_url, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(request.occurrence_id)
    .bind(request.status_id)
    .bind(&request.public_text)
    .bind(&request.private_text)
    .bind(reviewer_user_id)
    .bind(request.forwarded_agency_id)
    .bind(request.forwarded_user_id)
    .bind(&request.file_url)
    .bind(Utc::now().naive_utc())
    .execute(pool)
    .await
    .map_err(map_db_err)?;

    if let Some(status_id) = request.status_id {
        occurrence_service::set_occurrence_status(pool, request.occurrence_id, status_id).await?;
    }

    let review = get_review_by_id(pool, result.last_insert_id() as i64).await?;

    log::info!(
        "✅ Review {} created on occurrence {} by user {}",
        review.id,
        review.occurrence_id,
        reviewer_user_id
    );

    Ok(review)
}

pub async fn list_reviews(pool: &MySqlPool, skip: i64, limit: i64) -> Result<Vec<Review>, AppError> {
    sqlx::query_as::<_, Review>("SELECT * FROM reviews ORDER BY id LIMIT ? OFFSET ?")
        .bind(limit.max(1))
        .bind(skip.max(0))
        .fetch_all(pool)
        .await
        .map_err(map_db_err)
}

pub async fn list_reviews_for_occurrence(
    pool: &MySqlPool,
    occurrence_id: i64,
) -> Result<Vec<Review>, AppError> {
    sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE occurrence_id = ? ORDER BY id")
        .bind(occurrence_id)
        .fetch_all(pool)
        .await
        .map_err(map_db_err)
}

pub async fn get_review_by_id(pool: &MySqlPool, review_id: i64) -> Result<Review, AppError> {
    sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ?")
        .bind(review_id)
        .fetch_optional(pool)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| AppError::NotFound("Review not found".to_string()))
}

pub async fn update_review(
    pool: &MySqlPool,
    review_id: i64,
    request: UpdateReviewRequest,
) -> Result<Review, AppError> {
    let existing = get_review_by_id(pool, review_id).await?;

    sqlx::query(
        "UPDATE reviews SET \
           status_id = COALESCE(?, status_id), \
           public_text = COALESCE(?, public_text), \
           private_text = COALESCE(?, private_text), \
           forwarded_agency_id = COALESCE(?, forwarded_agency_id), \
           forwarded_user_id = COALESCE(?, forwarded_user_id), \
           file_url = COALESCE(?, file_url), \
           updated_at = ? \
         WHERE id = ?",
    )
    .bind(request.status_id)
    .bind(&request.public_text)
    .bind(&request.private_text)
    .bind(request.forwarded_agency_id)
    .bind(request.forwarded_user_id)
    .bind(&request.file_url)
    .bind(Utc::now().naive_utc())
    .bind(review_id)
    .execute(pool)
    .await
    .map_err(map_db_err)?;

    if let Some(status_id) = request.status_id {
        occurrence_service::set_occurrence_status(pool, existing.occurrence_id, status_id).await?;
    }

    get_review_by_id(pool, review_id).await
}

pub async fn delete_review(pool: &MySqlPool, review_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(review_id)
        .execute(pool)
        .await
        .map_err(map_db_err)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Review not found".to_string()));
    }

    log::info!("🗑️ Review {} deleted", review_id);

    Ok(())
}
