pub mod email;
pub mod jwt;
pub mod password;
pub mod slug;

pub use email::*;
pub use jwt::*;
pub use password::*;
pub use slug::{ensure_unique_slug, generate_slug};
