use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::auth_service;

/// Gate for JWT-protected scopes. On success the validated
/// [`auth_service::Claims`] land in the request extensions, available to
/// handlers through `web::ReqData<Claims>`.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string());

        match token {
            Some(token) => match auth_service::verify_access_token(&token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);

                    let fut = self.service.call(req);
                    Box::pin(async move { fut.await })
                }
                Err(e) => {
                    log::warn!("❌ Rejected bearer token: {}", e);
                    Box::pin(async move { Err(ErrorUnauthorized("Invalid or expired token")) })
                }
            },
            None => Box::pin(async move { Err(ErrorUnauthorized("Missing authorization token")) }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};
    use crate::services::auth_service::{generate_access_token, generate_refresh_token, Claims};
    use actix_web::{test, web, App, HttpResponse};

    async fn protected(claims: web::ReqData<Claims>) -> HttpResponse {
        HttpResponse::Ok().body(claims.sub.clone())
    }

    fn sample_user() -> User {
        User {
            id: 7,
            username: "ana".to_string(),
            full_name: "Ana Lima".to_string(),
            cpf: "111.444.777-35".to_string(),
            phone: None,
            email: "ana@example.com".to_string(),
            role: Role::Client,
            password_hash: "x".to_string(),
            is_active: true,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    macro_rules! build_app {
        () => {
            test::init_service(
                App::new().service(
                    web::resource("/protected")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(protected)),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler_with_claims() {
        let app = build_app!();
        let token = generate_access_token(&sample_user()).unwrap();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let res = test::call_service(&app, req).await;
        assert!(res.status().is_success());

        let body = test::read_body(res).await;
        assert_eq!(body, "ana@example.com");
    }

    #[actix_web::test]
    async fn test_missing_token_is_rejected() {
        let app = build_app!();

        let req = test::TestRequest::get().uri("/protected").to_request();
        let res = test::try_call_service(&app, req).await;

        assert!(res.is_err());
    }

    #[actix_web::test]
    async fn test_refresh_token_is_rejected_on_protected_route() {
        let app = build_app!();
        let refresh = generate_refresh_token(&sample_user()).unwrap();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", refresh)))
            .to_request();

        let res = test::try_call_service(&app, req).await;
        assert!(res.is_err());
    }

    #[actix_web::test]
    async fn test_malformed_header_is_rejected() {
        let app = build_app!();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", "Token abc"))
            .to_request();

        let res = test::try_call_service(&app, req).await;
        assert!(res.is_err());
    }
}
