//! Database Module
//!
//! Opens the connection pool for the configured engine, applies migrations
//! and hands out the matching [`OrderRepository`].

pub mod repository;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use shared::error::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{PgPool, SqlitePool};

use repository::{OrderRepository, PgOrderRepository, SqliteOrderRepository};

/// Storage engine selected by the database URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

impl DbEngine {
    pub fn from_url(url: &str) -> Result<Self, AppError> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(Self::Postgres)
        } else if url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else {
            Err(AppError::database(format!(
                "Unsupported database URL (expected postgres:// or sqlite:): {url}"
            )))
        }
    }
}

#[derive(Clone)]
enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

/// Database service, owner of the connection pool
#[derive(Clone)]
pub struct DbService {
    pool: DbPool,
}

impl DbService {
    /// Connect to `url`, choosing the engine from its scheme, and run migrations
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AppError> {
        match DbEngine::from_url(url)? {
            DbEngine::Postgres => Self::connect_postgres(url, max_connections).await,
            DbEngine::Sqlite => Self::connect_sqlite(url, max_connections).await,
        }
    }

    async fn connect_postgres(url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to PostgreSQL: {e}")))?;
        tracing::info!("Database connection established (PostgreSQL)");

        sqlx::migrate!("./migrations/postgres")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            pool: DbPool::Postgres(pool),
        })
    }

    async fn connect_sqlite(url: &str, max_connections: u32) -> Result<Self, AppError> {
        // Build connection options: WAL, normal sync
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::migrate_sqlite(pool).await
    }

    /// Private in-memory SQLite database (standalone runs and tests)
    ///
    /// One connection that never expires: an in-memory database lives
    /// exactly as long as its connection.
    pub async fn sqlite_in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::migrate_sqlite(pool).await
    }

    async fn migrate_sqlite(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self {
            pool: DbPool::Sqlite(pool),
        })
    }

    pub fn engine(&self) -> DbEngine {
        match self.pool {
            DbPool::Postgres(_) => DbEngine::Postgres,
            DbPool::Sqlite(_) => DbEngine::Sqlite,
        }
    }

    /// Order repository backed by this pool
    pub fn order_repository(&self) -> Arc<dyn OrderRepository> {
        match &self.pool {
            DbPool::Postgres(pool) => Arc::new(PgOrderRepository::new(pool.clone())),
            DbPool::Sqlite(pool) => Arc::new(SqliteOrderRepository::new(pool.clone())),
        }
    }

    pub fn sqlite_pool(&self) -> Option<&SqlitePool> {
        match &self.pool {
            DbPool::Sqlite(pool) => Some(pool),
            DbPool::Postgres(_) => None,
        }
    }

    /// Round-trip to the database (health check)
    pub async fn ping(&self) -> Result<(), AppError> {
        let result = match &self.pool {
            DbPool::Postgres(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
            DbPool::Sqlite(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
        };
        result.map_err(|e| AppError::database(format!("Database ping failed: {e}")))
    }

    pub async fn close(&self) {
        match &self.pool {
            DbPool::Postgres(pool) => pool.close().await,
            DbPool::Sqlite(pool) => pool.close().await,
        }
    }
}
