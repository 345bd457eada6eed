use bcrypt::{hash, DEFAULT_COST};
use chrono::Utc;
use sqlx::MySqlPool;

use crate::config;

/// Creates the first admin account from `ADMIN_EMAIL`/`ADMIN_PASSWORD` when
/// no admin exists yet. Without this there is no way to reach the admin-only
/// endpoints of a fresh database (public registration always lands as client).
pub async fn seed_first_admin(pool: &MySqlPool) {
    let Some((email, password)) = config::admin_seed_credentials() else {
        log::debug!("ℹ️ ADMIN_EMAIL/ADMIN_PASSWORD not set - skipping admin seed");
        return;
    };

    let existing =
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE role = 'admin' LIMIT 1")
            .fetch_optional(pool)
            .await;

    match existing {
        Ok(Some(_)) => {
            log::debug!("ℹ️ Admin account already present - skipping seed");
        }
        Ok(None) => {
            let password_hash = match hash(&password, DEFAULT_COST) {
                Ok(password_hash) => password_hash,
                Err(e) => {
                    log::error!("❌ Admin seed: failed to hash password: {}", e);
                    return;
                }
            };

            let now = Utc::now().naive_utc();

            let result = sqlx::query(
                "INSERT INTO users (username, full_name, cpf, email, role, password_hash, is_active, created_at, updated_at) \
                 VALUES ('admin', 'Administrator', '000.000.000-00', ?, 'admin', ?, TRUE, ?, ?)",
            )
            .bind(&email)
            .bind(&password_hash)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await;

            match result {
                Ok(_) => log::info!("🌱 Seeded first admin user: {}", email),
                Err(e) => log::error!("❌ Admin seed failed: {}", e),
            }
        }
        Err(e) => {
            log::warn!("⚠️ Admin seed check failed: {}", e);
        }
    }
}
