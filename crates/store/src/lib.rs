//! `store` crate — the `RentalStore` trait and its two backends.
//!
//! [`PgStore`] is the durable backend over the `db` crate's repository
//! functions. [`MemoryStore`] is an ephemeral backend seeded from JSON
//! fixtures, used for demos and tests. The gateway dispatches through the
//! trait object and never knows which one it holds.

pub mod error;
pub mod fixtures;
pub mod memory;
pub mod postgres;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use traits::RentalStore;
