use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::verify_token;
use crate::error::AppError;
use crate::AppState;

/// Requires a valid bearer token on every request except the login endpoint.
///
/// On success the decoded [`Claims`](crate::auth::Claims) are stored in the
/// request extensions for [`AuthenticatedLogin`](crate::auth::AuthenticatedLogin).
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
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
        if req.path().ends_with("/auth/login") {
            return Box::pin(self.service.call(req));
        }

        let secret = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.secret_key.clone(),
            None => {
                let app_err = AppError::InternalServerError("Application state missing".into());
                return Box::pin(async move { Err(app_err.into()) });
            }
        };

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match token.map(|token| verify_token(token, &secret)) {
            Some(Ok(claims)) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Some(Err(app_err)) => Box::pin(async move { Err(app_err.into()) }),
            None => {
                let app_err = AppError::Unauthorized("Missing token".into());
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
