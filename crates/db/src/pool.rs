//! Postgres connection pool.
//!
//! One pool is created at process start and handed to whoever needs it.
//! Every repository call borrows a connection for a single statement and
//! returns it when the statement finishes, whether it succeeded or not.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::{DbConfig, DbError};

/// Type alias for the shared Postgres pool used across the whole application.
pub type DbPool = PgPool;

/// Create a new connection pool from `config`.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, DbError> {
    let options = config.connect_options()?;
    info!(
        "Connecting to database (max_connections={})",
        config.max_connections
    );
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Run embedded SQLx migrations located in `./migrations` (relative to the
/// workspace root at build time).
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    info!("Running database migrations");
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Drain the pool: wait for borrowed connections to come back, then close
/// every connection. Later acquires fail with `PoolClosed`.
pub async fn close_pool(pool: &DbPool) {
    info!("Closing database pool ({} open connections)", pool.size());
    pool.close().await;
}
