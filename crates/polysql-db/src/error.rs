//! Error types for the database wrapper.

use polysql_core::BuildError;

/// Errors that can occur while executing statements.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `begin_transaction` was called while a transaction is active.
    #[error("transaction already in progress")]
    TransactionInProgress,

    /// Commit or rollback was called without an active transaction.
    #[error("no transaction in progress")]
    NoTransaction,

    /// The connection pool could not be opened.
    #[error("failed to open database: {0}")]
    Open(#[source] sqlx::Error),

    /// The driver refused to start a transaction.
    #[error("failed to begin transaction: {0}")]
    Begin(#[source] sqlx::Error),

    /// The driver refused to commit.
    #[error("failed to commit transaction: {0}")]
    Commit(#[source] sqlx::Error),

    /// The driver refused to roll back.
    #[error("failed to rollback transaction: {0}")]
    Rollback(#[source] sqlx::Error),

    /// Error reported while executing a statement.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A statement could not be compiled.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DbError>;
