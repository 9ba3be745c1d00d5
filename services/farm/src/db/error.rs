//! Database error types.

use farm_balance::StoreError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to connect to the database.
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// Failed to execute a query.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    /// Migration directory not found in the current environment.
    #[error("migration directory not found; tried {tried}. Last error: {last_error}. Run from repo root or services/farm.")]
    MigrationDirNotFound { tried: String, last_error: String },

    /// A row holds a value the domain types reject.
    #[error("invalid {column} in row: {message}")]
    Decode {
        column: &'static str,
        message: String,
    },
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Decode { .. } => StoreError::Corrupt(err.to_string()),
            DbError::Connect(_) => StoreError::Unavailable(err.to_string()),
            other => StoreError::backend(other),
        }
    }
}
