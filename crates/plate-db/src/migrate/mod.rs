//! One-shot legacy migration.
//!
//! [`PlateDb::migrate`] moves a [`SourceSnapshot`] into the relational store
//! inside a single transaction: empty every table, insert the household,
//! load each collection in dependency order, then compare a `COUNT(*)` of
//! every table against the number of rows the loaders inserted. The
//! transaction commits only if every count matches. Re-running against the
//! same snapshot yields the same counts.
//!
//! The migration must not run concurrently with live writes to the same
//! store.

mod load;
pub mod source;

use std::collections::BTreeMap;
use std::time::Instant;

use plate_core::enums::Table;
use plate_core::responses::{MigrationReport, TableCount};

use crate::PlateDb;
use crate::error::{DatabaseError, MigrationError};
use load::LoadContext;
pub use source::SourceSnapshot;

/// Household name used when none is configured.
pub const DEFAULT_HOUSEHOLD_NAME: &str = "Home";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateOptions {
    pub household_name: String,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            household_name: DEFAULT_HOUSEHOLD_NAME.to_string(),
        }
    }
}

impl PlateDb {
    /// Replace the store's contents with `snapshot`.
    ///
    /// # Errors
    ///
    /// `MigrationError::Database` on any failed statement,
    /// `MigrationError::Token` if a shared menu cannot get a unique token,
    /// `MigrationError::Verification` naming the first table whose row count
    /// diverged. The store is unchanged in every error case.
    pub async fn migrate(
        &self,
        snapshot: &SourceSnapshot,
        options: &MigrateOptions,
    ) -> Result<MigrationReport, MigrationError> {
        let started = Instant::now();
        let tx = self.conn().transaction().await?;

        match load_and_verify(&tx, snapshot, options).await {
            Ok(mut report) => {
                tx.commit().await?;
                report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                tracing::info!(
                    "migrate: committed {} tables in {} ms",
                    report.tables.len(),
                    report.duration_ms
                );
                Ok(report)
            }
            Err(e) => {
                tracing::warn!("migrate: rolling back: {}", e);
                if let Err(rb) = tx.rollback().await {
                    tracing::warn!("migrate: rollback failed: {}", rb);
                }
                Err(e)
            }
        }
    }
}

async fn load_and_verify(
    conn: &libsql::Connection,
    snapshot: &SourceSnapshot,
    options: &MigrateOptions,
) -> Result<MigrationReport, MigrationError> {
    truncate_all(conn).await?;

    let mut ctx = LoadContext::begin(conn, &options.household_name).await?;
    ctx.load_foods(&snapshot.foods).await?;
    ctx.load_profiles(&snapshot.profiles).await?;
    ctx.load_menus(&snapshot.menus).await?;
    ctx.apply_active_menu(snapshot.active_menu_id.as_deref()).await?;
    ctx.load_kid_selections(&snapshot.kid_selections).await?;
    ctx.load_meals(&snapshot.meals).await?;
    ctx.load_shared_menus(&snapshot.shared_menus).await?;
    ctx.load_shared_menu_responses(&snapshot.shared_menu_responses)
        .await?;

    let tables = verify_counts(conn, &ctx.inserted).await?;
    Ok(MigrationReport {
        tables,
        skipped: ctx.skipped,
        dangling_refs: ctx.remapper.dangling_refs(),
        source_warnings: snapshot.warnings,
        dropped_main_completions: ctx.dropped_main_completions,
        duration_ms: 0,
    })
}

/// Empty every table, children first.
async fn truncate_all(conn: &libsql::Connection) -> Result<(), DatabaseError> {
    for table in Table::ALL.iter().rev() {
        let removed = conn
            .execute(&format!("DELETE FROM {}", table.as_str()), ())
            .await?;
        tracing::debug!("migrate: cleared {} ({} rows)", table, removed);
    }
    Ok(())
}

async fn count_rows(conn: &libsql::Connection, table: Table) -> Result<u64, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT COUNT(*) FROM {}", table.as_str()), ())
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let count = row.get::<i64>(0)?;
    u64::try_from(count).map_err(|e| DatabaseError::Query(format!("negative count: {e}")))
}

/// Count every table and fail on the first one that differs from `inserted`.
async fn verify_counts(
    conn: &libsql::Connection,
    inserted: &BTreeMap<Table, u64>,
) -> Result<Vec<TableCount>, MigrationError> {
    let mut tables = Vec::with_capacity(Table::ALL.len());
    for table in Table::ALL {
        let count = TableCount {
            table,
            expected: inserted.get(&table).copied().unwrap_or(0),
            actual: count_rows(conn, table).await?,
        };
        if !count.matches() {
            return Err(MigrationError::Verification {
                table,
                expected: count.expected,
                actual: count.actual,
            });
        }
        tables.push(count);
    }
    Ok(tables)
}
