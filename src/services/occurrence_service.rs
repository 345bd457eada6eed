use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;

use crate::models::Occurrence;
use crate::utils::error::{map_db_err, AppError};
use crate::utils::validation;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateOccurrenceRequest {
    pub occurred_on: Option<NaiveDate>,
    pub occurred_time: Option<NaiveTime>,
    pub status_id: i64,
    pub service_type_id: Option<i64>,
    pub program_id: i64,
    pub occurrence_type_id: Option<i64>,
    pub protocol: Option<String>,
    pub region_id: i64,
    pub confidential: Option<bool>,
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub email: Option<String>,
    pub file_url: Option<String>,
    pub subject: String,
    pub message: String,
    pub notify: Option<bool>,
    pub person_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateOccurrenceRequest {
    pub occurred_on: Option<NaiveDate>,
    pub occurred_time: Option<NaiveTime>,
    pub status_id: Option<i64>,
    pub service_type_id: Option<i64>,
    pub program_id: Option<i64>,
    pub occurrence_type_id: Option<i64>,
    pub protocol: Option<String>,
    pub region_id: Option<i64>,
    pub confidential: Option<bool>,
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub email: Option<String>,
    pub file_url: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub forwarded_agency_id: Option<i64>,
    pub forwarded_user_id: Option<i64>,
    pub forwarded_at: Option<NaiveDateTime>,
    pub notify: Option<bool>,
    pub person_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub archived: Option<bool>,
}

fn validate_create(request: &CreateOccurrenceRequest) -> Result<(), AppError> {
    if request.subject.trim().is_empty() {
        return Err(AppError::InvalidRequest("Subject is required".to_string()));
    }
    if request.message.trim().is_empty() {
        return Err(AppError::InvalidRequest("Message is required".to_string()));
    }
    if let Some(email) = &request.email {
        if !email.is_empty() && !validation::validate_email(email) {
            return Err(AppError::InvalidRequest(
                "Invalid reporter email address".to_string(),
            ));
        }
    }
    Ok(())
}

/// Creates an occurrence owned by `user_id` (the authenticated caller).
pub async fn create_occurrence(
    pool: &MySqlPool,
    request: CreateOccurrenceRequest,
    user_id: i64,
) -> Result<Occurrence, AppError> {
    validate_create(&request)?;

    let now = Utc::now().naive_utc();

    let result = sqlx::query(
        "INSERT INTO occurrences (occurred_on, occurred_time, status_id, service_type_id, program_id, \
           occurrence_type_id, protocol, region_id, confidential, full_name, address, phone1, phone2, \
           email, file_url, subject, message, notify, person_id, user_id, latitude, longitude, \
           archived, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, FALSE, ?, ?)",
    )
    .bind(request.occurred_on)
    .bind(request.occurred_time)
    .bind(request.status_id)
    .bind(request.service_type_id)
    .bind(request.program_id)
    .bind(request.occurrence_type_id)
    .bind(&request.protocol)
    .bind(request.region_id)
    .bind(request.confidential.unwrap_or(false))
    .bind(&request.full_name)
    .bind(&request.address)
    .bind(&request.phone1)
    .bind(&request.phone2)
    .bind(&request.email)
    .bind(&request.file_url)
    .bind(&request.subject)
    .bind(&request.message)
    .bind(request.notify.unwrap_or(false))
    .bind(request.person_id)
    .bind(user_id)
    .bind(request.latitude)
    .bind(request.longitude)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(map_db_err)?;

    let occurrence = get_occurrence_by_id(pool, result.last_insert_id() as i64).await?;

    log::info!(
        "✅ Occurrence {} created by user {} (status {})",
        occurrence.id,
        user_id,
        occurrence.status_id
    );

    Ok(occurrence)
}

pub async fn list_occurrences(
    pool: &MySqlPool,
    skip: i64,
    limit: i64,
    archived: Option<bool>,
) -> Result<Vec<Occurrence>, AppError> {
    let limit = limit.max(1);
    let skip = skip.max(0);

    let occurrences = match archived {
        Some(flag) => {
            sqlx::query_as::<_, Occurrence>(
                "SELECT * FROM occurrences WHERE archived = ? ORDER BY id LIMIT ? OFFSET ?",
            )
            .bind(flag)
            .bind(limit)
            .bind(skip)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Occurrence>("SELECT * FROM occurrences ORDER BY id LIMIT ? OFFSET ?")
                .bind(limit)
                .bind(skip)
                .fetch_all(pool)
                .await
        }
    }
    .map_err(map_db_err)?;

    Ok(occurrences)
}

pub async fn get_occurrence_by_id(pool: &MySqlPool, occurrence_id: i64) -> Result<Occurrence, AppError> {
    sqlx::query_as::<_, Occurrence>("SELECT * FROM occurrences WHERE id = ?")
        .bind(occurrence_id)
        .fetch_optional(pool)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| AppError::NotFound("Occurrence not found".to_string()))
}

pub async fn update_occurrence(
    pool: &MySqlPool,
    occurrence_id: i64,
    request: UpdateOccurrenceRequest,
) -> Result<Occurrence, AppError> {
    // Garante 404 antes de um UPDATE sem efeito
    get_occurrence_by_id(pool, occurrence_id).await?;

    if let Some(email) = &request.email {
        if !email.is_empty() && !validation::validate_email(email) {
            return Err(AppError::InvalidRequest(
                "Invalid reporter email address".to_string(),
            ));
        }
    }

    sqlx::query(
        "UPDATE occurrences SET \
           occurred_on = COALESCE(?, occurred_on), \
           occurred_time = COALESCE(?, occurred_time), \
           status_id = COALESCE(?, status_id), \
           service_type_id = COALESCE(?, service_type_id), \
           program_id = COALESCE(?, program_id), \
           occurrence_type_id = COALESCE(?, occurrence_type_id), \
           protocol = COALESCE(?, protocol), \
           region_id = COALESCE(?, region_id), \
           confidential = COALESCE(?, confidential), \
           full_name = COALESCE(?, full_name), \
           address = COALESCE(?, address), \
           phone1 = COALESCE(?, phone1), \
           phone2 = COALESCE(?, phone2), \
           email = COALESCE(?, email), \
           file_url = COALESCE(?, file_url), \
           subject = COALESCE(?, subject), \
           message = COALESCE(?, message), \
           forwarded_agency_id = COALESCE(?, forwarded_agency_id), \
           forwarded_user_id = COALESCE(?, forwarded_user_id), \
           forwarded_at = COALESCE(?, forwarded_at), \
           notify = COALESCE(?, notify), \
           person_id = COALESCE(?, person_id), \
           latitude = COALESCE(?, latitude), \
           longitude = COALESCE(?, longitude), \
           archived = COALESCE(?, archived), \
           updated_at = ? \
         WHERE id = ?",
    )
    .bind(request.occurred_on)
    .bind(request.occurred_time)
    .bind(request.status_id)
    .bind(request.service_type_id)
    .bind(request.program_id)
    .bind(request.occurrence_type_id)
    .bind(&request.protocol)
    .bind(request.region_id)
    .bind(request.confidential)
    .bind(&request.full_name)
    .bind(&request.address)
    .bind(&request.phone1)
    .bind(&request.phone2)
    .bind(&request.email)
    .bind(&request.file_url)
    .bind(&request.subject)
    .bind(&request.message)
    .bind(request.forwarded_agency_id)
    .bind(request.forwarded_user_id)
    .bind(request.forwarded_at)
    .bind(request.notify)
    .bind(request.person_id)
    .bind(request.latitude)
    .bind(request.longitude)
    .bind(request.archived)
    .bind(Utc::now().naive_utc())
    .bind(occurrence_id)
    .execute(pool)
    .await
    .map_err(map_db_err)?;

    get_occurrence_by_id(pool, occurrence_id).await
}

pub async fn delete_occurrence(pool: &MySqlPool, occurrence_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM occurrences WHERE id = ?")
        .bind(occurrence_id)
        .execute(pool)
        .await
        .map_err(map_db_err)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Occurrence not found".to_string()));
    }

    log::info!("🗑️ Occurrence {} deleted", occurrence_id);

    Ok(())
}

/// Status transition driven by a review that carries a status.
pub async fn set_occurrence_status(
    pool: &MySqlPool,
    occurrence_id: i64,
    status_id: i64,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE occurrences SET status_id = ?, updated_at = ? WHERE id = ?")
        .bind(status_id)
        .bind(Utc::now().naive_utc())
        .bind(occurrence_id)
        .execute(pool)
        .await
        .map_err(map_db_err)?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Occurrence not found".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateOccurrenceRequest {
        CreateOccurrenceRequest {
            occurred_on: None,
            occurred_time: None,
            status_id: 1,
            service_type_id: None,
            program_id: 2,
            occurrence_type_id: None,
            protocol: None,
            region_id: 3,
            confidential: None,
            full_name: None,
            address: None,
            phone1: None,
            phone2: None,
            email: None,
            file_url: None,
            subject: "Iluminação pública".to_string(),
            message: "Poste apagado há uma semana.".to_string(),
            notify: None,
            person_id: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_validate_create_requires_subject_and_message() {
        assert!(validate_create(&valid_request()).is_ok());

        let mut request = valid_request();
        request.subject = "   ".to_string();
        assert!(validate_create(&request).is_err());

        let mut request = valid_request();
        request.message = String::new();
        assert!(validate_create(&request).is_err());
    }

    #[test]
    fn test_validate_create_checks_reporter_email() {
        let mut request = valid_request();
        request.email = Some("invalido".to_string());
        assert!(validate_create(&request).is_err());

        request.email = Some("ok@example.com".to_string());
        assert!(validate_create(&request).is_ok());

        // Campo em branco é tratado como ausente
        request.email = Some(String::new());
        assert!(validate_create(&request).is_ok());
    }
}
