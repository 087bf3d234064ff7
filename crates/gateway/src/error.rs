//! Gateway-level error types.

use thiserror::Error;

/// Errors produced by [`crate::QueryGateway`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Page sizes must be positive.
    #[error("limit must be a positive integer, got {0}")]
    InvalidLimit(u32),

    /// Failure from the persistence backend, passed through untranslated.
    #[error(transparent)]
    Store(#[from] store::StoreError),
}
