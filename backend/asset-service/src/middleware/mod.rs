/// HTTP middleware utilities for asset-service
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, HttpRequest};
use crypto_core::jwt::{self, JwtError, JwtValidator};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};

/// Result of checking the bearer token, stored in request extensions
#[derive(Debug, Clone)]
struct AuthOutcome(Result<Uuid, JwtError>);

/// Validates `Authorization: Bearer <jwt>` on every wrapped route.
///
/// The outcome is recorded rather than enforced here; handlers call
/// [`authenticated_user`] once their path parameters are validated, so a
/// malformed video id is reported before a missing token.
#[derive(Clone)]
pub struct JwtAuthMiddleware {
    validator: Arc<JwtValidator>,
}

impl JwtAuthMiddleware {
    pub fn new(validator: Arc<JwtValidator>) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            validator: self.validator.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    validator: Arc<JwtValidator>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
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
        let outcome = {
            let authorization = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok());

            jwt::get_bearer_token(authorization).and_then(|token| self.validator.validate(token))
        };

        if let Err(e) = &outcome {
            tracing::debug!(path = %req.path(), error = %e, "bearer token rejected");
        }
        req.extensions_mut().insert(AuthOutcome(outcome));

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}

/// The requester recorded by `JwtAuthMiddleware`, or the 401 to return
pub fn authenticated_user(req: &HttpRequest) -> Result<Uuid, AppError> {
    match req.extensions().get::<AuthOutcome>() {
        Some(AuthOutcome(Ok(user_id))) => Ok(*user_id),
        Some(AuthOutcome(Err(e))) => {
            tracing::warn!(path = %req.path(), error = %e, "unauthenticated request");
            Err(AppError::from(e.clone()))
        }
        None => Err(AppError::Unauthorized("Couldn't find JWT".to_string())),
    }
}

/// Records `http_requests_total` / `http_request_duration_seconds`
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
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
        let service = self.service.clone();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();

            // Route patterns keep label cardinality bounded
            let (path, status) = match &res {
                Ok(res) => (
                    res.request()
                        .match_pattern()
                        .unwrap_or_else(|| "unmatched".to_string()),
                    res.status(),
                ),
                Err(e) => ("unmatched".to_string(), e.as_response_error().status_code()),
            };
            let status = status.as_u16().to_string();

            HTTP_REQUESTS_TOTAL
                .with_label_values(&[&method, &path, &status])
                .inc();
            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[&method, &path, &status])
                .observe(elapsed.as_secs_f64());

            tracing::debug!(%method, %path, %status, elapsed_ms = elapsed.as_millis() as u64, "request completed");
            res
        })
    }
}
