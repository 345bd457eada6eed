use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::models::{Role, User, UserOut};
use crate::utils::error::{map_db_err, AppError};
use crate::utils::validation;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub full_name: String,
    pub cpf: String,
    pub phone: Option<String>,
    pub email: String,
    pub password: String,
    /// Honored only for admin callers; everyone else registers as client.
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UserCheckRequest {
    pub cpf: String,
    pub phone: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserCheckResponse {
    pub registered: bool,
    pub message: String,
}

pub async fn get_user_by_id(pool: &MySqlPool, user_id: i64) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(map_db_err)
}

pub async fn get_user_by_email(pool: &MySqlPool, email: &str) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(map_db_err)
}

pub async fn list_users(pool: &MySqlPool, skip: i64, limit: i64) -> Result<Vec<UserOut>, AppError> {
    let limit = limit.clamp(1, 100);
    let skip = skip.max(0);

    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id LIMIT ? OFFSET ?")
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await
        .map_err(map_db_err)?;

    Ok(users.into_iter().map(UserOut::from).collect())
}

fn validate_new_user(request: &CreateUserRequest) -> Result<(), AppError> {
    if request.username.trim().is_empty() {
        return Err(AppError::InvalidRequest("Username is required".to_string()));
    }
    if request.full_name.trim().is_empty() {
        return Err(AppError::InvalidRequest("Full name is required".to_string()));
    }
    if !validation::validate_email(&request.email) {
        return Err(AppError::InvalidRequest("Invalid email address".to_string()));
    }
    if !validation::validate_cpf(&request.cpf) {
        return Err(AppError::InvalidRequest("Invalid CPF".to_string()));
    }
    if !validation::validate_password(&request.password) {
        return Err(AppError::InvalidRequest(format!(
            "Password must have at least {} characters",
            validation::MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Creates a user. `allow_role` is true only when the caller is an
/// authenticated admin; otherwise the requested role is ignored.
pub async fn create_user(
    pool: &MySqlPool,
    request: CreateUserRequest,
    allow_role: bool,
) -> Result<UserOut, AppError> {
    validate_new_user(&request)?;

    let role = if allow_role {
        request.role.unwrap_or(Role::Client)
    } else {
        Role::Client
    };

    let duplicate =
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ? OR cpf = ? OR username = ? LIMIT 1")
            .bind(&request.email)
            .bind(&request.cpf)
            .bind(&request.username)
            .fetch_optional(pool)
            .await
            .map_err(map_db_err)?;

    if duplicate.is_some() {
        return Err(AppError::Conflict(
            "Email, CPF or username already registered".to_string(),
        ));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let now = Utc::now().naive_utc();

    let result = sqlx::query(
        "INSERT INTO users (username, full_name, cpf, phone, email, role, password_hash, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, TRUE, ?, ?)",
    )
    .bind(&request.username)
    .bind(&request.full_name)
    .bind(&request.cpf)
    .bind(&request.phone)
    .bind(&request.email)
    .bind(role)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(map_db_err)?;

    let id = result.last_insert_id() as i64;

    let user = get_user_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::DatabaseError("User missing after insert".to_string()))?;

    log::info!("✅ User created: {} (role: {})", user.email, user.role);

    Ok(user.into())
}

/// Partial update. `allow_role` gates role and is_active changes (admin only).
pub async fn update_user(
    pool: &MySqlPool,
    user_id: i64,
    request: UpdateUserRequest,
    allow_role: bool,
) -> Result<UserOut, AppError> {
    let existing = get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if (request.role.is_some() || request.is_active.is_some()) && !allow_role {
        return Err(AppError::Forbidden(
            "Only admins can change role or account status".to_string(),
        ));
    }

    if let Some(email) = &request.email {
        if !validation::validate_email(email) {
            return Err(AppError::InvalidRequest("Invalid email address".to_string()));
        }
    }

    let password_hash = match &request.password {
        Some(password) => {
            if !validation::validate_password(password) {
                return Err(AppError::InvalidRequest(format!(
                    "Password must have at least {} characters",
                    validation::MIN_PASSWORD_LEN
                )));
            }
            Some(
                hash(password, DEFAULT_COST)
                    .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?,
            )
        }
        None => None,
    };

    sqlx::query(
        "UPDATE users SET \
           username = COALESCE(?, username), \
           full_name = COALESCE(?, full_name), \
           phone = COALESCE(?, phone), \
           email = COALESCE(?, email), \
           role = COALESCE(?, role), \
           password_hash = COALESCE(?, password_hash), \
           is_active = COALESCE(?, is_active), \
           updated_at = ? \
         WHERE id = ?",
    )
    .bind(&request.username)
    .bind(&request.full_name)
    .bind(&request.phone)
    .bind(&request.email)
    .bind(request.role)
    .bind(&password_hash)
    .bind(request.is_active)
    .bind(Utc::now().naive_utc())
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(map_db_err)?;

    let user = get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    log::info!("🔧 User updated: {} (was {})", user.email, existing.email);

    Ok(user.into())
}

pub async fn delete_user(pool: &MySqlPool, user_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(map_db_err)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    log::info!("🗑️ User {} deleted", user_id);

    Ok(())
}

/// Existence check by CPF + phone, used by authorized external systems.
pub async fn check_user_registered(
    pool: &MySqlPool,
    request: &UserCheckRequest,
) -> Result<UserCheckResponse, AppError> {
    let found = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE cpf = ? AND phone = ? LIMIT 1")
        .bind(&request.cpf)
        .bind(&request.phone)
        .fetch_optional(pool)
        .await
        .map_err(map_db_err)?;

    Ok(match found {
        Some(_) => UserCheckResponse {
            registered: true,
            message: "User already registered".to_string(),
        },
        None => UserCheckResponse {
            registered: false,
            message: "User not registered".to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateUserRequest {
        CreateUserRequest {
            username: "maria".to_string(),
            full_name: "Maria Silva".to_string(),
            cpf: "529.982.247-25".to_string(),
            phone: None,
            email: "maria@example.com".to_string(),
            password: "senhaF0rte".to_string(),
            role: Some(Role::Admin),
        }
    }

    #[test]
    fn test_validate_new_user_accepts_valid() {
        assert!(validate_new_user(&valid_request()).is_ok());
    }

    #[test]
    fn test_validate_new_user_rejects_bad_cpf() {
        let mut request = valid_request();
        request.cpf = "123.456.789-00".to_string();
        assert!(matches!(
            validate_new_user(&request),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_validate_new_user_rejects_short_password() {
        let mut request = valid_request();
        request.password = "curta".to_string();
        assert!(validate_new_user(&request).is_err());
    }

    #[test]
    fn test_validate_new_user_rejects_bad_email() {
        let mut request = valid_request();
        request.email = "nao-e-email".to_string();
        assert!(validate_new_user(&request).is_err());
    }
}
