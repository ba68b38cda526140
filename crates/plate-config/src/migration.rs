//! Legacy data migration settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_source_dir() -> String {
    "legacy-data".to_string()
}

fn default_household_name() -> String {
    "Home".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MigrationConfig {
    /// Directory holding `foods.json`, `profiles.json`, `menus.json`,
    /// `meals.json`, and `shared-menus.json`.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Name given to the single household created by a migration.
    #[serde(default = "default_household_name")]
    pub household_name: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            household_name: default_household_name(),
        }
    }
}

impl MigrationConfig {
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        PathBuf::from(&self.source_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = MigrationConfig::default();
        assert_eq!(config.source_dir, "legacy-data");
        assert_eq!(config.household_name, "Home");
        assert_eq!(config.source_path(), PathBuf::from("legacy-data"));
    }
}
