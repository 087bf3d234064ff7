//! Repository functions — one function per database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, DbError>`.
//! A lookup that finds nothing is `Ok(None)` or an empty `Vec`, never an
//! error. No business logic, only SQL.

pub mod properties;
pub mod reservations;
pub mod users;
