use anyhow::Context;
use plate_config::PlateConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<PlateConfig> {
    let mut config = PlateConfig::load_with_dotenv().context("failed to load configuration")?;
    apply_overrides(&mut config, flags);
    Ok(config)
}

fn apply_overrides(config: &mut PlateConfig, flags: &GlobalFlags) {
    if let Some(path) = &flags.db {
        config.database.path.clone_from(path);
    }
}

#[cfg(test)]
mod tests {
    use super::apply_overrides;
    use crate::cli::{GlobalFlags, OutputFormat};
    use plate_config::PlateConfig;

    fn flags(db: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            limit: None,
            quiet: false,
            db: db.map(String::from),
        }
    }

    #[test]
    fn db_flag_wins() {
        let mut config = PlateConfig::default();
        apply_overrides(&mut config, &flags(Some(":memory:")));
        assert!(config.database.is_in_memory());
    }

    #[test]
    fn config_kept_without_flag() {
        let mut config = PlateConfig::default();
        apply_overrides(&mut config, &flags(None));
        assert_eq!(config.database.path, "plateful.db");
    }
}
