//! Store-level error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by a [`crate::RentalStore`] backend.
///
/// Not-found is never an error: lookups return `Ok(None)` or an empty list.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failure from Postgres, carrying the native error unchanged.
    #[error("database error: {0}")]
    Database(#[from] db::DbError),

    /// The ephemeral store refused a write that would break a uniqueness or
    /// reference rule.
    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("cannot read fixture {path}: {source}")]
    FixtureIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture {path}: {source}")]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
