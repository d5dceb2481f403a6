//! Business services

pub mod order;

pub use order::{MAX_ID_ATTEMPTS, OrderService, sort_by_priority};
