//! # plate-db
//!
//! libSQL storage for plateful households.
//!
//! Owns the relational schema, the one-shot loader that moves a legacy JSON
//! document snapshot into it, and the read path that reassembles meal
//! aggregates from flat join rows. Live writes (meal logging, kid
//! selections, shared menus) go through the same row writers the loader
//! uses, so both paths produce identical rows.

pub mod error;
pub mod helpers;
pub mod migrate;
mod migrations;
pub mod rehydrate;
pub mod remap;
pub mod repos;
pub mod token;

mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all plateful state.
///
/// Wraps a libSQL database and a single connection. Repository methods,
/// the migrator, and ID generation all hang off this type.
pub struct PlateDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl PlateDb {
    /// Open a local database at the given path. `":memory:"` is accepted.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are off by default and must be enabled per connection.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let plate_db = Self { db, conn };
        plate_db.run_migrations().await?;
        Ok(plate_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID. Returns e.g. `"mea-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        generate_id(&self.conn, prefix).await
    }
}

/// Generate a prefixed ID on an arbitrary connection or transaction.
///
/// Uses `randomblob(4)` in SQL to produce 8 hex chars, then prepends the prefix.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or returns no rows.
pub async fn generate_id(conn: &libsql::Connection, prefix: &str) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
            (),
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}
