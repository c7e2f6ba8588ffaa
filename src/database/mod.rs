mod connection;
mod seed;

pub use connection::{create_pool, run_migrations, DbPool};
pub use seed::seed_super_admin;
