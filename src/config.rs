use std::env;

// Leitura de configuração direto do ambiente, com defaults de desenvolvimento.
// O .env é carregado uma única vez no main via dotenv().

pub fn server_host() -> String {
    env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
}

pub fn server_port() -> String {
    env::var("PORT").unwrap_or_else(|_| "8000".to_string())
}

/// Full MySQL connection URL. `DATABASE_URL` wins; otherwise the URL is
/// composed from the individual `MYSQL_*` variables.
pub fn database_url() -> String {
    if let Ok(url) = env::var("DATABASE_URL") {
        return url;
    }

    let user = env::var("MYSQL_USER").unwrap_or_else(|_| "user".to_string());
    let password = env::var("MYSQL_PASSWORD").unwrap_or_else(|_| "password".to_string());
    let host = env::var("MYSQL_HOST").unwrap_or_else(|_| "db".to_string());
    let port = env::var("MYSQL_PORT").unwrap_or_else(|_| "3306".to_string());
    let database = env::var("MYSQL_DATABASE").unwrap_or_else(|_| "occurrence_db".to_string());

    format!("mysql://{}:{}@{}:{}/{}", user, password, host, port, database)
}

pub fn jwt_secret() -> String {
    env::var("SECRET_KEY").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

pub fn access_token_expire_minutes() -> i64 {
    env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30)
}

pub fn refresh_token_expire_days() -> i64 {
    env::var("REFRESH_TOKEN_EXPIRE_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(7)
}

/// Interval between connection attempts while waiting for the database
/// container to come up.
pub fn db_connect_retry_secs() -> u64 {
    env::var("DB_CONNECT_RETRY_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3)
}

pub fn cors_allowed_origin() -> String {
    env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

pub fn admin_seed_credentials() -> Option<(String, String)> {
    match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
        (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
            Some((email, password))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_composed_from_parts() {
        // Sem DATABASE_URL no ambiente de teste, a URL vem dos defaults
        if env::var("DATABASE_URL").is_err() && env::var("MYSQL_HOST").is_err() {
            let url = database_url();
            assert!(url.starts_with("mysql://"));
            assert!(url.ends_with("/occurrence_db"));
        }
    }

    #[test]
    fn test_token_lifetimes_have_defaults() {
        if env::var("ACCESS_TOKEN_EXPIRE_MINUTES").is_err() {
            assert_eq!(access_token_expire_minutes(), 30);
        }
        if env::var("REFRESH_TOKEN_EXPIRE_DAYS").is_err() {
            assert_eq!(refresh_token_expire_days(), 7);
        }
    }
}
