//! `db` crate — pure persistence layer.
//!
//! Provides connection configuration, a connection pool, typed row structs,
//! the property search filter, and repository functions for every table in
//! the LightBnB schema. No business logic lives here.

pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod pool;
pub mod repository;

pub use config::DbConfig;
pub use error::DbError;
pub use filter::{PropertyFilter, DEFAULT_LIMIT};
pub use pool::DbPool;
