//! Response types returned as JSON by `plate` commands.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Table;

/// Verified row count for one table after a migration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TableCount {
    pub table: Table,
    /// Rows the loader inserted.
    pub expected: u64,
    /// Rows `COUNT(*)` found before commit.
    pub actual: u64,
}

impl TableCount {
    #[must_use]
    pub const fn matches(&self) -> bool {
        self.expected == self.actual
    }
}

/// Response from `plate migrate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MigrationReport {
    /// One entry per target table, in load order.
    pub tables: Vec<TableCount>,
    /// Source documents not inserted (e.g. responses whose menu did not resolve).
    pub skipped: u32,
    /// Embedded references kept verbatim because no mapping existed.
    pub dangling_refs: u32,
    /// Source files that were missing or unparsable.
    pub source_warnings: u32,
    /// Legacy reviews whose `mainCompletion` could not be carried forward.
    pub dropped_main_completions: u32,
    pub duration_ms: u64,
}

impl MigrationReport {
    /// Verified row count for `table`, or 0 if it was not part of the run.
    #[must_use]
    pub fn count(&self, table: Table) -> u64 {
        self.tables
            .iter()
            .find(|c| c.table == table)
            .map_or(0, |c| c.actual)
    }

    /// `table name -> verified count`.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<&'static str, u64> {
        self.tables
            .iter()
            .map(|c| (c.table.as_str(), c.actual))
            .collect()
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.tables {
            let mark = if c.matches() { "ok" } else { "MISMATCH" };
            writeln!(
                f,
                "{:<24} {:>6}/{:<6} {mark}",
                c.table.as_str(),
                c.actual,
                c.expected
            )?;
        }
        write!(
            f,
            "skipped={} dangling_refs={} source_warnings={} dropped_main_completions={} ({} ms)",
            self.skipped,
            self.dangling_refs,
            self.source_warnings,
            self.dropped_main_completions,
            self.duration_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> MigrationReport {
        MigrationReport {
            tables: vec![
                TableCount { table: Table::Households, expected: 1, actual: 1 },
                TableCount { table: Table::FoodItems, expected: 4, actual: 3 },
            ],
            ..MigrationReport::default()
        }
    }

    #[test]
    fn count_reads_actual() {
        let r = report();
        assert_eq!(r.count(Table::FoodItems), 3);
        assert_eq!(r.count(Table::Menus), 0);
        assert_eq!(r.counts().get("households"), Some(&1));
    }

    #[test]
    fn display_flags_mismatch() {
        let text = report().to_string();
        assert!(text.contains("households"));
        assert!(text.lines().nth(1).unwrap().contains("MISMATCH"));
        assert!(!text.lines().next().unwrap().contains("MISMATCH"));
    }
}
