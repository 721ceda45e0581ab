//! Persistence adapters for Kickflip Funnels.
//!
//! - [`PgFunnelService`]: PostgreSQL-backed funnel store (JSONB element list).
//! - [`InMemoryFunnelService`]: process-local store used without a database
//!   and in tests.
//! - [`FileSessionStore`] / [`MemorySessionStore`]: durable and volatile
//!   key/value session storage.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod pg_service;
pub mod repositories;
pub mod session_store;

pub use memory::{FailOp, InMemoryFunnelService};
pub use pg_service::PgFunnelService;
pub use session_store::{FileSessionStore, MemorySessionStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
