//! Order service
//!
//! HTTP service for payment orders: create, list with filters and
//! priority-country ordering, and lookups by order number or generated id.
//!
//! # Modules
//!
//! - [`api`] - HTTP routes, extractors and middleware
//! - [`services`] - business rules
//! - [`db`] - connection pool and repositories (PostgreSQL, SQLite)
//! - [`config`] - environment configuration
//! - [`logger`] - tracing setup

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod services;
pub mod state;

pub use api::build_app;
pub use config::Config;
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
