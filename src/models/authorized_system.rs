use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Machine client authenticated by `X-API-KEY`. The full row (with the key)
/// stays server-side; listings use [`AuthorizedSystemOut`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthorizedSystem {
    pub id: i64,
    pub name: String,
    pub api_key: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub last_activity: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthorizedSystemOut {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub last_activity: Option<NaiveDateTime>,
}

/// Returned only by the create endpoint: the single moment the key is shown.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AuthorizedSystemWithKey {
    pub id: i64,
    pub name: String,
    pub api_key: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl From<AuthorizedSystem> for AuthorizedSystemOut {
    fn from(system: AuthorizedSystem) -> Self {
        AuthorizedSystemOut {
            id: system.id,
            name: system.name,
            description: system.description,
            is_active: system.is_active,
            created_at: system.created_at,
            last_activity: system.last_activity,
        }
    }
}

impl From<AuthorizedSystem> for AuthorizedSystemWithKey {
    fn from(system: AuthorizedSystem) -> Self {
        AuthorizedSystemWithKey {
            id: system.id,
            name: system.name,
            api_key: system.api_key,
            description: system.description,
            is_active: system.is_active,
            created_at: system.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_projection_hides_api_key() {
        let system = AuthorizedSystem {
            id: 7,
            name: "portal".to_string(),
            api_key: "d3b07384-d9a0-4c9c-8e3a-000000000000".to_string(),
            description: None,
            is_active: true,
            created_at: chrono::Utc::now().naive_utc(),
            last_activity: None,
        };
        let json = serde_json::to_string(&AuthorizedSystemOut::from(system)).unwrap();
        assert!(!json.contains("api_key"));
        assert!(!json.contains("d3b07384"));
    }
}
