pub mod auth;
pub mod authorized_systems;
pub mod health;
pub mod occurrence_types;
pub mod occurrences;
pub mod reviews;
pub mod swagger;
pub mod users;

use actix_web::{HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::services::auth_service::Claims;
use crate::utils::error::AppError;

/// Maps service errors onto HTTP responses with the standard error body.
pub(crate) fn error_response(err: &AppError) -> HttpResponse {
    let body = serde_json::json!({
        "success": false,
        "error": err.to_string()
    });

    match err {
        AppError::InvalidRequest(_) => HttpResponse::BadRequest().json(body),
        AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(body),
        AppError::Forbidden(_) => HttpResponse::Forbidden().json(body),
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::Conflict(_) => HttpResponse::Conflict().json(body),
        AppError::DatabaseError(_) | AppError::Internal(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Guard for admin-only operations.
pub(crate) fn require_admin(claims: &Claims) -> Result<(), AppError> {
    if claims.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin privileges required".to_string()))
    }
}

/// Bearer extraction for the /auth endpoints, which run outside AuthMiddleware.
pub(crate) fn extract_bearer(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct Pagination {
    /// Registros a pular
    pub skip: Option<i64>,
    /// Máximo de registros a retornar
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn claims_with_role(role: Role) -> Claims {
        Claims {
            sub: "x@example.com".to_string(),
            user_id: 1,
            role,
            token_type: "access".to_string(),
            jti: "test".to_string(),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&claims_with_role(Role::Admin)).is_ok());
        assert!(matches!(
            require_admin(&claims_with_role(Role::Client)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_error_response_status_mapping() {
        assert_eq!(
            error_response(&AppError::NotFound("x".into())).status(),
            actix_web::http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(&AppError::Conflict("x".into())).status(),
            actix_web::http::StatusCode::CONFLICT
        );
        assert_eq!(
            error_response(&AppError::Unauthorized("x".into())).status(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_response(&AppError::DatabaseError("x".into())).status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
