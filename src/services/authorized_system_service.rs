use chrono::Utc;
use serde::Deserialize;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::models::{AuthorizedSystem, AuthorizedSystemOut, AuthorizedSystemWithKey};
use crate::utils::error::{map_db_err, AppError};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateSystemRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateSystemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

async fn get_by_id(pool: &MySqlPool, system_id: i64) -> Result<Option<AuthorizedSystem>, AppError> {
    sqlx::query_as::<_, AuthorizedSystem>("SELECT * FROM authorized_systems WHERE id = ?")
        .bind(system_id)
        .fetch_optional(pool)
        .await
        .map_err(map_db_err)
}

/// Registers a machine client and mints its API key. The key is returned
/// here and never again.
pub async fn create_system(
    pool: &MySqlPool,
    request: CreateSystemRequest,
) -> Result<AuthorizedSystemWithKey, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidRequest("Name is required".to_string()));
    }

    let api_key = Uuid::new_v4().to_string();
    let now = Utc::now().naive_utc();

    let result = sqlx::query(
        "INSERT INTO authorized_systems (name, api_key, description, is_active, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&request.name)
    .bind(&api_key)
    .bind(&request.description)
    .bind(request.is_active.unwrap_or(true))
    .bind(now)
    .execute(pool)
    .await
    .map_err(map_db_err)?;

    let system = get_by_id(pool, result.last_insert_id() as i64)
        .await?
        .ok_or_else(|| AppError::DatabaseError("System missing after insert".to_string()))?;

    log::info!("✅ Authorized system created: {} (id {})", system.name, system.id);

    Ok(system.into())
}

pub async fn list_systems(
    pool: &MySqlPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<AuthorizedSystemOut>, AppError> {
    let systems = sqlx::query_as::<_, AuthorizedSystem>(
        "SELECT * FROM authorized_systems ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(limit.max(1))
    .bind(skip.max(0))
    .fetch_all(pool)
    .await
    .map_err(map_db_err)?;

    Ok(systems.into_iter().map(AuthorizedSystemOut::from).collect())
}

pub async fn get_system(pool: &MySqlPool, system_id: i64) -> Result<AuthorizedSystemOut, AppError> {
    get_by_id(pool, system_id)
        .await?
        .map(AuthorizedSystemOut::from)
        .ok_or_else(|| AppError::NotFound("Authorized system not found".to_string()))
}

pub async fn update_system(
    pool: &MySqlPool,
    system_id: i64,
    request: UpdateSystemRequest,
) -> Result<AuthorizedSystemOut, AppError> {
    let result = sqlx::query(
        "UPDATE authorized_systems SET \
           name = COALESCE(?, name), \
           description = COALESCE(?, description), \
           is_active = COALESCE(?, is_active) \
         WHERE id = ?",
    )
    .bind(&request.name)
    .bind(&request.description)
    .bind(request.is_active)
    .bind(system_id)
    .execute(pool)
    .await
    .map_err(map_db_err)?;

    if result.rows_affected() == 0 && get_by_id(pool, system_id).await?.is_none() {
        return Err(AppError::NotFound("Authorized system not found".to_string()));
    }

    get_system(pool, system_id).await
}

pub async fn delete_system(pool: &MySqlPool, system_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM authorized_systems WHERE id = ?")
        .bind(system_id)
        .execute(pool)
        .await
        .map_err(map_db_err)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Authorized system not found".to_string()));
    }

    log::info!("🗑️ Authorized system {} deleted", system_id);

    Ok(())
}

/// Stamps `last_activity` with the current time.
pub async fn touch_last_activity(
    pool: &MySqlPool,
    system_id: i64,
) -> Result<AuthorizedSystemOut, AppError> {
    let result = sqlx::query("UPDATE authorized_systems SET last_activity = ? WHERE id = ?")
        .bind(Utc::now().naive_utc())
        .bind(system_id)
        .execute(pool)
        .await
        .map_err(map_db_err)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Authorized system not found".to_string()));
    }

    get_system(pool, system_id).await
}

/// Validates an `X-API-KEY` value: the system must exist and be active.
/// A successful validation counts as activity.
pub async fn validate_api_key(pool: &MySqlPool, api_key: &str) -> Result<AuthorizedSystem, AppError> {
    let system = sqlx::query_as::<_, AuthorizedSystem>(
        "SELECT * FROM authorized_systems WHERE api_key = ?",
    )
    .bind(api_key)
    .fetch_optional(pool)
    .await
    .map_err(map_db_err)?;

    match system {
        Some(system) if system.is_active => {
            touch_last_activity(pool, system.id).await?;
            Ok(system)
        }
        _ => Err(AppError::Forbidden(
            "Invalid or inactive API key".to_string(),
        )),
    }
}
