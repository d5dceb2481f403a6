//! Repository Module
//!
//! Storage access for the `orders` table. The service only sees the
//! [`OrderRepository`] trait; the engines behind it are PostgreSQL and SQLite.

pub mod order;
pub mod pg_order;
pub mod sqlite_order;

// Re-exports
pub use order::OrderRepository;
pub use pg_order::PgOrderRepository;
pub use sqlite_order::SqliteOrderRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    /// A unique constraint rejected the write
    #[error("Duplicate {column}: {value}")]
    Duplicate { column: &'static str, value: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Map an insert failure, turning unique violations into [`RepoError::Duplicate`]
///
/// `keys` lists `(column, value)` for every unique column of the row. The
/// violated column is found in the constraint name (PostgreSQL) or in the
/// error message (SQLite: `UNIQUE constraint failed: orders.unique_id`).
pub(crate) fn map_insert_error(err: sqlx::Error, keys: &[(&'static str, &str)]) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        let text = format!(
            "{} {}",
            db_err.constraint().unwrap_or_default(),
            db_err.message()
        );
        if let Some(&(column, value)) = keys.iter().find(|(column, _)| text.contains(*column)) {
            return RepoError::Duplicate {
                column,
                value: value.to_string(),
            };
        }
        tracing::warn!(error = %db_err, "Unique violation on an unexpected constraint");
    }
    RepoError::from(err)
}
