use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use crate::config;

/// Opens the MySQL pool, waiting for the database to come up.
///
/// In the compose setup the app container starts alongside MySQL, so the
/// first connection attempts are expected to fail while the server boots.
/// Attempts repeat at a fixed interval until one succeeds.
pub async fn connect_with_retry(database_url: &str) -> MySqlPool {
    let retry_interval = Duration::from_secs(config::db_connect_retry_secs());
    let mut attempt = 1u32;

    loop {
        match try_connect(database_url).await {
            Ok(pool) => {
                log::info!("✅ MySQL connected (attempt {})", attempt);
                return pool;
            }
            Err(e) => {
                log::warn!(
                    "⏳ MySQL not ready (attempt {}): {} - retrying in {}s",
                    attempt,
                    e,
                    retry_interval.as_secs()
                );
                tokio::time::sleep(retry_interval).await;
                attempt += 1;
            }
        }
    }
}

async fn try_connect(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .connect(database_url)
        .await?;

    // Test connection
    ping(&pool).await?;

    Ok(pool)
}

/// Administrative ping, also used by the health endpoint.
pub async fn ping(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Creates the tables on startup when absent. Schema changes beyond that are
/// out of scope here; this keeps a fresh container usable without tooling.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    log::info!("🔧 Ensuring database schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            BIGINT PRIMARY KEY AUTO_INCREMENT,
            username      VARCHAR(255) NOT NULL UNIQUE,
            full_name     VARCHAR(255) NOT NULL,
            cpf           VARCHAR(14)  NOT NULL UNIQUE,
            phone         VARCHAR(20)  NULL,
            email         VARCHAR(255) NOT NULL UNIQUE,
            role          VARCHAR(16)  NOT NULL DEFAULT 'client',
            password_hash VARCHAR(255) NOT NULL,
            is_active     BOOLEAN      NOT NULL DEFAULT TRUE,
            created_at    DATETIME     NOT NULL,
            updated_at    DATETIME     NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS authorized_systems (
            id            BIGINT PRIMARY KEY AUTO_INCREMENT,
            name          VARCHAR(255) NOT NULL,
            api_key       VARCHAR(255) NOT NULL UNIQUE,
            description   VARCHAR(500) NULL,
            is_active     BOOLEAN      NOT NULL DEFAULT TRUE,
            created_at    DATETIME     NOT NULL,
            last_activity DATETIME     NULL,
            INDEX idx_authorized_systems_api_key (api_key)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS occurrence_types (
            id         BIGINT PRIMARY KEY AUTO_INCREMENT,
            name       VARCHAR(100) NOT NULL,
            icon       VARCHAR(255) NULL,
            is_active  BOOLEAN      NOT NULL DEFAULT TRUE,
            created_at DATETIME     NULL,
            updated_at DATETIME     NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS occurrences (
            id                  BIGINT PRIMARY KEY AUTO_INCREMENT,
            occurred_on         DATE         NULL,
            occurred_time       TIME         NULL,
            status_id           BIGINT       NOT NULL,
            service_type_id     BIGINT       NULL,
            program_id          BIGINT       NOT NULL,
            occurrence_type_id  BIGINT       NULL,
            protocol            VARCHAR(20)  NULL,
            region_id           BIGINT       NOT NULL,
            confidential        BOOLEAN      NOT NULL DEFAULT FALSE,
            full_name           VARCHAR(150) NULL,
            address             VARCHAR(255) NULL,
            phone1              VARCHAR(15)  NULL,
            phone2              VARCHAR(15)  NULL,
            email               VARCHAR(100) NULL,
            file_url            TEXT         NULL,
            subject             VARCHAR(255) NOT NULL,
            message             TEXT         NOT NULL,
            forwarded_agency_id BIGINT       NULL,
            forwarded_user_id   BIGINT       NULL,
            forwarded_at        DATETIME     NULL,
            notify              BOOLEAN      NOT NULL DEFAULT FALSE,
            person_id           BIGINT       NULL,
            user_id             BIGINT       NOT NULL,
            latitude            DOUBLE       NULL,
            longitude           DOUBLE       NULL,
            archived            BOOLEAN      NOT NULL DEFAULT FALSE,
            created_at          DATETIME     NOT NULL,
            updated_at          DATETIME     NOT NULL,
            INDEX idx_occurrences_user_id (user_id),
            INDEX idx_occurrences_status_id (status_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id                  BIGINT PRIMARY KEY AUTO_INCREMENT,
            occurrence_id       BIGINT   NOT NULL,
            status_id           BIGINT   NULL,
            public_text         TEXT     NULL,
            private_text        TEXT     NULL,
            reviewer_user_id    BIGINT   NULL,
            forwarded_agency_id BIGINT   NULL,
            forwarded_user_id   BIGINT   NULL,
            file_url            TEXT     NULL,
            created_at          DATETIME NOT NULL,
            updated_at          DATETIME NULL,
            INDEX idx_reviews_occurrence_id (occurrence_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    log::info!("✅ Database schema ready");

    Ok(())
}
