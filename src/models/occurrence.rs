use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Citizen-reported occurrence. Reporter contact fields are optional because
/// confidential reports omit them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Occurrence {
    pub id: i64,
    pub occurred_on: Option<NaiveDate>,
    pub occurred_time: Option<NaiveTime>,
    pub status_id: i64,
    pub service_type_id: Option<i64>,
    pub program_id: i64,
    pub occurrence_type_id: Option<i64>,
    pub protocol: Option<String>,
    pub region_id: i64,
    pub confidential: bool,
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub email: Option<String>,
    pub file_url: Option<String>,
    pub subject: String,
    pub message: String,
    pub forwarded_agency_id: Option<i64>,
    pub forwarded_user_id: Option<i64>,
    pub forwarded_at: Option<NaiveDateTime>,
    pub notify: bool,
    pub person_id: Option<i64>,
    pub user_id: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
