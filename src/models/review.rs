use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Caseworker assessment attached to an occurrence. `public_text` is shown to
/// the reporter; `private_text` stays internal.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Review {
    pub id: i64,
    pub occurrence_id: i64,
    pub status_id: Option<i64>,
    pub public_text: Option<String>,
    pub private_text: Option<String>,
    pub reviewer_user_id: Option<i64>,
    pub forwarded_agency_id: Option<i64>,
    pub forwarded_user_id: Option<i64>,
    pub file_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}
