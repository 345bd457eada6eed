use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorForbidden, ErrorInternalServerError, ErrorUnauthorized},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use sqlx::MySqlPool;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::services::authorized_system_service;
use crate::utils::error::AppError;

/// Gate for machine clients: validates `X-API-KEY` against the
/// `authorized_systems` table before the request proceeds. The matching
/// [`crate::models::AuthorizedSystem`] is inserted into the extensions.
///
/// Missing key → 401; unknown or inactive key → 403 (same contract as the
/// original dependency chain).
pub struct ApiKeyAuth;

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthService {
            service: Rc::new(service),
        }))
    }
}

pub struct ApiKeyAuthService<S> {
    // Rc: o service precisa entrar no future da validação assíncrona
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let api_key = req
                .headers()
                .get("X-API-KEY")
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let Some(api_key) = api_key else {
                return Err(ErrorUnauthorized("API key (X-API-KEY) not provided"));
            };

            let Some(pool) = req.app_data::<web::Data<MySqlPool>>().cloned() else {
                return Err(ErrorInternalServerError("Database pool not configured"));
            };

            match authorized_system_service::validate_api_key(pool.get_ref(), &api_key).await {
                Ok(system) => {
                    req.extensions_mut().insert(system);
                    service.call(req).await
                }
                Err(AppError::Forbidden(_)) => {
                    log::warn!("❌ Rejected API key");
                    Err(ErrorForbidden("Invalid or inactive API key"))
                }
                Err(e) => {
                    log::error!("❌ API key validation failed: {}", e);
                    Err(ErrorInternalServerError("Failed to validate API key"))
                }
            }
        })
    }
}
