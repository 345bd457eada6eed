use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::config;
use crate::models::{Role, User, UserOut};
use crate::services::user_service;
use crate::utils::error::AppError;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // email
    pub user_id: i64,
    pub role: Role,
    pub token_type: String, // "access" | "refresh"
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: UserOut,
}

fn generate_token(user: &User, token_type: &str, lifetime: Duration) -> Result<String, AppError> {
    let now = Utc::now();

    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id,
        role: user.role,
        token_type: token_type.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp() as usize,
        exp: (now + lifetime).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

pub fn generate_access_token(user: &User) -> Result<String, AppError> {
    generate_token(
        user,
        TOKEN_TYPE_ACCESS,
        Duration::minutes(config::access_token_expire_minutes()),
    )
}

pub fn generate_refresh_token(user: &User) -> Result<String, AppError> {
    generate_token(
        user,
        TOKEN_TYPE_REFRESH,
        Duration::days(config::refresh_token_expire_days()),
    )
}

/// Decodes and validates a token, additionally checking that it carries the
/// expected `token_type` so a refresh token can't pass as an access token.
pub fn verify_token(token: &str, expected_type: &str) -> Result<Claims, AppError> {
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config::jwt_secret().as_ref()),
        &validation,
    )
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    if data.claims.token_type != expected_type {
        return Err(AppError::Unauthorized(format!(
            "Invalid token: expected a {} token",
            expected_type
        )));
    }

    Ok(data.claims)
}

pub fn verify_access_token(token: &str) -> Result<Claims, AppError> {
    verify_token(token, TOKEN_TYPE_ACCESS)
}

fn issue_tokens(user: User) -> Result<AuthResponse, AppError> {
    let access_token = generate_access_token(&user)?;
    let refresh_token = generate_refresh_token(&user)?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        token_type: "bearer".to_string(),
        user: user.into(),
    })
}

// User login
pub async fn login(pool: &MySqlPool, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    let user = user_service::get_user_by_email(pool, &request.email)
        .await?
        // Mesma mensagem para e-mail e senha errados
        .ok_or_else(|| AppError::Unauthorized("Incorrect email or password".to_string()))?;

    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized(
            "Incorrect email or password".to_string(),
        ));
    }

    if !user.is_active {
        return Err(AppError::Forbidden("Account is inactive".to_string()));
    }

    issue_tokens(user)
}

// Exchange a refresh token for a fresh access/refresh pair
pub async fn refresh(
    pool: &MySqlPool,
    request: &RefreshTokenRequest,
) -> Result<AuthResponse, AppError> {
    let claims = verify_token(&request.refresh_token, TOKEN_TYPE_REFRESH)?;

    let user = user_service::get_user_by_email(pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !user.is_active {
        return Err(AppError::Forbidden("Account is inactive".to_string()));
    }

    issue_tokens(user)
}

// Get current user from validated claims
pub async fn get_current_user(pool: &MySqlPool, claims: &Claims) -> Result<UserOut, AppError> {
    let user = user_service::get_user_by_id(pool, claims.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: Role) -> User {
        User {
            id: 42,
            username: "joao".to_string(),
            full_name: "João Souza".to_string(),
            cpf: "111.444.777-35".to_string(),
            phone: Some("(61) 99999-0000".to_string()),
            email: "joao@example.com".to_string(),
            role,
            password_hash: bcrypt::hash("senhaF0rte", 4).unwrap(),
            is_active: true,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let user = sample_user(Role::Admin);
        let token = generate_access_token(&user).unwrap();

        let claims = verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, "joao@example.com");
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.token_type, TOKEN_TYPE_ACCESS);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let user = sample_user(Role::Client);
        let refresh = generate_refresh_token(&user).unwrap();

        assert!(verify_access_token(&refresh).is_err());
        assert!(verify_token(&refresh, TOKEN_TYPE_REFRESH).is_ok());
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let user = sample_user(Role::Client);
        let access = generate_access_token(&user).unwrap();

        assert!(verify_token(&access, TOKEN_TYPE_REFRESH).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // exp bem além do leeway default do jsonwebtoken (60s)
        let now = Utc::now();
        let claims = Claims {
            sub: "joao@example.com".to_string(),
            user_id: 42,
            role: Role::Client,
            token_type: TOKEN_TYPE_ACCESS.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: (now - Duration::minutes(10)).timestamp() as usize,
            exp: (now - Duration::minutes(5)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config::jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(verify_access_token(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let user = sample_user(Role::Client);
        let token = generate_access_token(&user).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

        assert!(verify_access_token(&tampered).is_err());
    }

    #[test]
    fn test_password_hash_verifies() {
        let user = sample_user(Role::Client);
        assert!(verify("senhaF0rte", &user.password_hash).unwrap());
        assert!(!verify("senhaErrada", &user.password_hash).unwrap());
    }
}
