use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Occurrence Service API",
        version = "0.1.0",
        description = "REST API for occurrence tracking with JWT authentication, admin/client roles and API-key authenticated external systems.\n\n**Authentication:** user endpoints take a JWT Bearer token; machine endpoints take an `X-API-KEY` header.",
    ),
    paths(
        // Auth
        crate::api::auth::login,
        crate::api::auth::verify_token,
        crate::api::auth::get_me,

        // Health
        crate::api::health::health_check,

        // Users
        crate::api::users::create_user,
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,
        crate::api::users::check_user,

        // Authorized systems
        crate::api::authorized_systems::create_system,
        crate::api::authorized_systems::list_systems,
        crate::api::authorized_systems::validate_key,

        // Occurrences
        crate::api::occurrences::create_occurrence,
        crate::api::occurrences::list_occurrences,
        crate::api::occurrences::get_occurrence,
        crate::api::occurrences::update_occurrence,
        crate::api::occurrences::delete_occurrence,

        // Reviews
        crate::api::reviews::create_review,
        crate::api::reviews::list_reviews,
        crate::api::reviews::list_reviews_for_occurrence,

        // Occurrence types
        crate::api::occurrence_types::list_types,
        crate::api::occurrence_types::create_type,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RefreshTokenRequest,
            crate::services::auth_service::AuthResponse,

            // Health
            crate::api::health::HealthResponse,

            // Users
            crate::models::Role,
            crate::models::UserOut,
            crate::services::user_service::CreateUserRequest,
            crate::services::user_service::UpdateUserRequest,
            crate::services::user_service::UserCheckRequest,
            crate::services::user_service::UserCheckResponse,

            // Authorized systems
            crate::models::AuthorizedSystemOut,
            crate::models::AuthorizedSystemWithKey,
            crate::services::authorized_system_service::CreateSystemRequest,
            crate::services::authorized_system_service::UpdateSystemRequest,

            // Occurrences
            crate::models::Occurrence,
            crate::services::occurrence_service::CreateOccurrenceRequest,
            crate::services::occurrence_service::UpdateOccurrenceRequest,

            // Reviews
            crate::models::Review,
            crate::services::review_service::CreateReviewRequest,
            crate::services::review_service::UpdateReviewRequest,

            // Occurrence types
            crate::models::OccurrenceType,
            crate::services::occurrence_type_service::CreateOccurrenceTypeRequest,
            crate::services::occurrence_type_service::UpdateOccurrenceTypeRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Login, token refresh and identity endpoints."),
        (name = "Health", description = "Service and database health."),
        (name = "Users", description = "User registration and management. Listing and deletion are admin-only."),
        (name = "Authorized Systems", description = "API-key credentials for machine clients. Managed by admins."),
        (name = "Occurrences", description = "Citizen-reported occurrences."),
        (name = "Reviews", description = "Caseworker assessments attached to occurrences."),
        (name = "Occurrence Types", description = "Occurrence classification catalog."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT access token"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-KEY"))),
            );
        }
    }
}
