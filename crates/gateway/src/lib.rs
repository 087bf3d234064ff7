//! `gateway` crate — the `QueryGateway` façade the web layer calls into.

pub mod error;
pub mod queries;

pub use error::GatewayError;
pub use queries::QueryGateway;
