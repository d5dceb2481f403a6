//! Data models
//!
//! Shared between the server and its HTTP clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod order;

// Re-exports
pub use order::*;
