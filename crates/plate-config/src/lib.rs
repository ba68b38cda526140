//! # plate-config
//!
//! Layered configuration loading for plateful using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PLATEFUL_*` prefix, `__` as separator)
//! 2. Project-level `.plateful/config.toml`
//! 3. User-level `~/.config/plateful/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `PLATEFUL_DATABASE__PATH` -> `database.path`,
//! `PLATEFUL_MIGRATION__SOURCE_DIR` -> `migration.source_dir`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use plate_config::PlateConfig;
//!
//! let config = PlateConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod error;
mod general;
mod migration;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use migration::MigrationConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "PLATEFUL_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlateConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub migration: MigrationConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl PlateConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading the nearest `.env`, searching the
    /// current directory and then its parents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_ancestors();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer more providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".plateful/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values no command can work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.migration.household_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "migration.household_name".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.general.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.default_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    fn load_dotenv_from_ancestors() {
        let found = std::env::current_dir()
            .ok()
            .and_then(|cwd| find_dotenv(&cwd));
        if let Some(path) = found {
            let _ = dotenvy::from_path(&path);
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("plateful").join("config.toml"))
    }
}

/// The `.env` closest to `start`, walking up to the filesystem root.
fn find_dotenv(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".env"))
        .find(|path| path.is_file())
}
