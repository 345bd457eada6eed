use chrono::Utc;
use serde::Deserialize;
use sqlx::MySqlPool;

use crate::models::OccurrenceType;
use crate::utils::error::{map_db_err, AppError};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateOccurrenceTypeRequest {
    pub name: String,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateOccurrenceTypeRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn list_types(pool: &MySqlPool) -> Result<Vec<OccurrenceType>, AppError> {
    sqlx::query_as::<_, OccurrenceType>("SELECT * FROM occurrence_types ORDER BY name")
        .fetch_all(pool)
        .await
        .map_err(map_db_err)
}

pub async fn get_type_by_id(pool: &MySqlPool, type_id: i64) -> Result<OccurrenceType, AppError> {
    sqlx::query_as::<_, OccurrenceType>("SELECT * FROM occurrence_types WHERE id = ?")
        .bind(type_id)
        .fetch_optional(pool)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| AppError::NotFound("Occurrence type not found".to_string()))
}

pub async fn create_type(
    pool: &MySqlPool,
    request: CreateOccurrenceTypeRequest,
) -> Result<OccurrenceType, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidRequest("Name is required".to_string()));
    }

    let result = sqlx::query(
        "INSERT INTO occurrence_types (name, icon, is_active, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&request.name)
    .bind(&request.icon)
    .bind(request.is_active.unwrap_or(true))
    .bind(Utc::now().naive_utc())
    .execute(pool)
    .await
    .map_err(map_db_err)?;

    get_type_by_id(pool, result.last_insert_id() as i64).await
}

pub async fn update_type(
    pool: &MySqlPool,
    type_id: i64,
    request: UpdateOccurrenceTypeRequest,
) -> Result<OccurrenceType, AppError> {
    get_type_by_id(pool, type_id).await?;

    sqlx::query(
        "UPDATE occurrence_types SET \
           name = COALESCE(?, name), \
           icon = COALESCE(?, icon), \
           is_active = COALESCE(?, is_active), \
           updated_at = ? \
         WHERE id = ?",
    )
    .bind(&request.name)
    .bind(&request.icon)
    .bind(request.is_active)
    .bind(Utc::now().naive_utc())
    .bind(type_id)
    .execute(pool)
    .await
    .map_err(map_db_err)?;

    get_type_by_id(pool, type_id).await
}

pub async fn delete_type(pool: &MySqlPool, type_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM occurrence_types WHERE id = ?")
        .bind(type_id)
        .execute(pool)
        .await
        .map_err(map_db_err)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Occurrence type not found".to_string()));
    }

    Ok(())
}
