//! Shared application state

use std::sync::Arc;

use shared::ReadableIdGenerator;

use crate::BoxError;
use crate::config::Config;
use crate::db::DbService;
use crate::services::OrderService;

/// Shared application state, cheap to clone into every handler
#[derive(Clone)]
pub struct AppState {
    /// Connection pool owner (health checks, shutdown)
    pub db: DbService,
    pub orders: OrderService,
}

impl AppState {
    /// Connect to the configured database and wire the services
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::connect(&config.database_url, config.db_max_connections).await?;
        Ok(Self::from_parts(db, &config.priority_country))
    }

    /// Wire the services on top of an already opened database
    pub fn from_parts(db: DbService, priority_country: &str) -> Self {
        let orders = OrderService::new(
            db.order_repository(),
            Arc::new(ReadableIdGenerator::new()),
            priority_country,
        );
        Self { db, orders }
    }
}
