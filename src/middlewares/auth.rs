use crate::error::AppError;
use crate::models::RoleSet;
use crate::utils::JwtService;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// Identity of the authenticated caller, placed into request extensions by
/// the middleware and read back by handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub roles: RoleSet,
}

struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
    excluded_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec!["/swagger-ui", "/swagger-ui/", "/api-docs/openapi.json"],
            // The guide catalog and category list are browsable without an
            // account. Reading and downloading under the same prefix require
            // a user and are enforced in the handlers.
            prefix_paths: vec![
                "/swagger-ui/",
                "/api-docs/",
                "/api/v1/auth/",
                "/api/v1/guides",
                "/api/v1/categories",
                "/uploads/",
            ],
            excluded_paths: vec!["/api/v1/auth/me"],
        }
    }

    fn is_public_path(&self, path: &str) -> bool {
        if self
            .excluded_paths
            .iter()
            .any(|&excluded| path.starts_with(excluded))
        {
            return false;
        }

        if self.exact_paths.contains(&path) {
            return true;
        }

        self.prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

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
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
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
        // CORS preflight requests carry no credentials.
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        // A valid token identifies the caller even on public paths, so the
        // catalog can personalize favorites for signed-in readers.
        let has_token = token.is_some();
        let authenticated = token.and_then(|token| {
            match self.jwt_service.verify_access_token(token) {
                Ok(claims) => claims.sub.parse::<i64>().ok().map(|id| AuthenticatedUser {
                    id,
                    roles: RoleSet::from_names(claims.roles),
                }),
                Err(_) => None,
            }
        });

        let is_public = self.public_paths.is_public_path(req.path());

        match authenticated {
            Some(user) => {
                req.extensions_mut().insert(user);
                Box::pin(self.service.call(req))
            }
            None if is_public => Box::pin(self.service.call(req)),
            None => {
                let error = if has_token {
                    AppError::AuthError("Invalid access token".to_string())
                } else {
                    AppError::AuthError("Missing access token".to_string())
                };
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}
