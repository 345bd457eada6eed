mod api;
mod config;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = config::server_host();
    let port = config::server_port();
    let database_url = config::database_url();

    log::info!("🚀 Starting Occurrence Service...");

    // Espera o MySQL subir (gate de inicialização do compose)
    let pool = database::connect_with_retry(&database_url).await;

    database::ensure_schema(&pool)
        .await
        .map_err(|e| std::io::Error::other(format!("Schema bootstrap failed: {}", e)))?;

    // 🌱 First admin account, when configured
    seeds::admin_seed::seed_first_admin(&pool).await;

    let pool_data = web::Data::new(pool);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&config::cors_allowed_origin())
            .allowed_origin("http://localhost:8000")
            .allowed_origin("http://127.0.0.1:8000")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(pool_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Auth endpoints (token handling, outside AuthMiddleware)
            .service(
                web::scope("/api/v1/auth")
                    .route("/login", web::post().to(api::auth::login))
                    .route("/refresh", web::post().to(api::auth::refresh_token))
                    .route("/verify", web::get().to(api::auth::verify_token))
                    .route("/me", web::get().to(api::auth::get_me)),
            )
            // Users: registro é público, demais rotas autenticadas
            .service(
                web::scope("/api/v1/users")
                    .route("", web::post().to(api::users::create_user))
                    .service(
                        web::resource("/check")
                            .wrap(middleware::ApiKeyAuth)
                            .route(web::post().to(api::users::check_user)),
                    )
                    .service(
                        web::resource("")
                            .wrap(middleware::AuthMiddleware)
                            .route(web::get().to(api::users::list_users)),
                    )
                    .service(
                        web::resource("/{user_id}")
                            .wrap(middleware::AuthMiddleware)
                            .route(web::get().to(api::users::get_user))
                            .route(web::put().to(api::users::update_user))
                            .route(web::delete().to(api::users::delete_user)),
                    ),
            )
            // Authorized systems: CRUD de admin + validação por X-API-KEY
            .service(
                web::scope("/api/v1/authorized-systems")
                    .service(
                        web::resource("/validate-key")
                            .wrap(middleware::ApiKeyAuth)
                            .route(web::post().to(api::authorized_systems::validate_key)),
                    )
                    .service(
                        web::scope("")
                            .wrap(middleware::AuthMiddleware)
                            .route("", web::post().to(api::authorized_systems::create_system))
                            .route("", web::get().to(api::authorized_systems::list_systems))
                            .route(
                                "/{system_id}/last-activity",
                                web::put().to(api::authorized_systems::touch_last_activity),
                            )
                            .route("/{system_id}", web::get().to(api::authorized_systems::get_system))
                            .route(
                                "/{system_id}",
                                web::put().to(api::authorized_systems::update_system),
                            )
                            .route(
                                "/{system_id}",
                                web::delete().to(api::authorized_systems::delete_system),
                            ),
                    ),
            )
            // Occurrences
            .service(
                web::scope("/api/v1/occurrences")
                    .wrap(middleware::AuthMiddleware)
                    .route("", web::post().to(api::occurrences::create_occurrence))
                    .route("", web::get().to(api::occurrences::list_occurrences))
                    .route("/{occurrence_id}", web::get().to(api::occurrences::get_occurrence))
                    .route("/{occurrence_id}", web::put().to(api::occurrences::update_occurrence))
                    .route(
                        "/{occurrence_id}",
                        web::delete().to(api::occurrences::delete_occurrence),
                    ),
            )
            // Reviews
            .service(
                web::scope("/api/v1/reviews")
                    .wrap(middleware::AuthMiddleware)
                    .route("", web::post().to(api::reviews::create_review))
                    .route("", web::get().to(api::reviews::list_reviews))
                    .route(
                        "/occurrence/{occurrence_id}",
                        web::get().to(api::reviews::list_reviews_for_occurrence),
                    )
                    .route("/{review_id}", web::get().to(api::reviews::get_review))
                    .route("/{review_id}", web::put().to(api::reviews::update_review))
                    .route("/{review_id}", web::delete().to(api::reviews::delete_review)),
            )
            // Occurrence types
            .service(
                web::scope("/api/v1/occurrence-types")
                    .wrap(middleware::AuthMiddleware)
                    .route("", web::get().to(api::occurrence_types::list_types))
                    .route("", web::post().to(api::occurrence_types::create_type))
                    .route("/{type_id}", web::put().to(api::occurrence_types::update_type))
                    .route("/{type_id}", web::delete().to(api::occurrence_types::delete_type)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
