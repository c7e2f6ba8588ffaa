pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, AuthenticatedUser};
pub use cors::create_cors;
