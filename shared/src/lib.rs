//! Shared types for the order service
//!
//! Common types used by the server and its tests: the order model,
//! the unified error type and the public identifier generator.

pub mod error;
pub mod models;
pub mod unique_id;
pub mod util;

pub use unique_id::{IdGenerator, ReadableIdGenerator};
