//! Typed error type for the db crate.

use thiserror::Error;

/// Errors raised by the persistence layer.
///
/// Store failures (unique email, unknown owner, lost connection) are carried
/// unchanged in `Sqlx` so callers can inspect the native database error.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("invalid database configuration: {0}")]
    Config(String),
}
