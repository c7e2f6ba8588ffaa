use actix_web::{HttpMessage, HttpRequest};

use crate::error::{AppError, AppResult};
use crate::middlewares::AuthenticatedUser;

pub mod admin;
pub mod auth;
pub mod category;
pub mod favorite;
pub mod guide;
pub mod user;

pub use admin::admin_config;
pub use auth::auth_config;
pub use category::category_config;
pub use favorite::favorite_config;
pub use guide::guide_config;
pub use user::user_config;

pub(crate) fn authenticated_user(req: &HttpRequest) -> AppResult<AuthenticatedUser> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}

pub(crate) fn optional_user_id(req: &HttpRequest) -> Option<i64> {
    req.extensions().get::<AuthenticatedUser>().map(|u| u.id)
}

pub(crate) fn require_staff(req: &HttpRequest) -> AppResult<AuthenticatedUser> {
    let user = authenticated_user(req)?;
    if !user.roles.is_staff() {
        return Err(AppError::PermissionDenied);
    }
    Ok(user)
}

pub(crate) fn require_admin(req: &HttpRequest) -> AppResult<AuthenticatedUser> {
    let user = authenticated_user(req)?;
    if !user.roles.is_admin() {
        return Err(AppError::PermissionDenied);
    }
    Ok(user)
}

pub(crate) fn require_super_admin(req: &HttpRequest) -> AppResult<AuthenticatedUser> {
    let user = authenticated_user(req)?;
    if !user.roles.is_super_admin() {
        return Err(AppError::PermissionDenied);
    }
    Ok(user)
}

/// Client address and user agent, as recorded in the activity trail.
pub(crate) fn client_metadata(req: &HttpRequest) -> (Option<String>, Option<String>) {
    let ip_address = req
        .connection_info()
        .realip_remote_addr()
        .map(|addr| addr.to_string());
    let user_agent = req
        .headers()
        .get("User-Agent")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    (ip_address, user_agent)
}
