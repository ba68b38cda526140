//! Error types for plate-db.

use plate_core::enums::Table;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or a column held unreadable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., no household yet).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors that abort a legacy data migration. The transaction is always
/// rolled back before one of these is returned.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// An insert, update, or count failed.
    #[error("Migration aborted: {0}")]
    Database(#[from] DatabaseError),

    /// A post-load row count did not match the number of rows inserted.
    #[error("Verification failed for table '{table}': expected {expected} rows, found {actual}")]
    Verification {
        table: Table,
        expected: u64,
        actual: u64,
    },

    /// A shared menu could not get a unique token.
    #[error("Migration aborted: {0}")]
    Token(#[from] TokenError),
}

/// Errors from public token issuance.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Every candidate collided with an existing token.
    #[error("Could not generate a unique token after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// The insert failed for a reason other than a token collision.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<libsql::Error> for MigrationError {
    fn from(e: libsql::Error) -> Self {
        Self::Database(DatabaseError::LibSql(e))
    }
}

impl From<libsql::Error> for TokenError {
    fn from(e: libsql::Error) -> Self {
        Self::Database(DatabaseError::LibSql(e))
    }
}
