use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Authorization tiers. Stored as VARCHAR in the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Client => write!(f, "client"),
        }
    }
}

/// Full `users` row. Never serialized directly: responses go through
/// [`UserOut`], which carries no credential material.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub cpf: String,
    pub phone: Option<String>,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Client-safe user projection.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserOut {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub cpf: String,
    pub phone: Option<String>,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        UserOut {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            cpf: user.cpf,
            phone: user.phone,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "maria".to_string(),
            full_name: "Maria Silva".to_string(),
            cpf: "529.982.247-25".to_string(),
            phone: None,
            email: "maria@example.com".to_string(),
            role: Role::Client,
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            is_active: true,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_user_out_hides_password_hash() {
        let out: UserOut = sample_user().into();
        let json = serde_json::to_string(&out).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$"));
        assert!(json.contains("\"email\":\"maria@example.com\""));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"client\"");
    }

    #[test]
    fn test_role_admin_check() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Client.is_admin());
    }
}
