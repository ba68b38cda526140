use anyhow::Context;
use plate_config::PlateConfig;
use plate_db::PlateDb;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub db: PlateDb,
    pub config: PlateConfig,
}

impl AppContext {
    pub async fn init(config: PlateConfig) -> anyhow::Result<Self> {
        let db = PlateDb::open_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        tracing::debug!("opened {}", config.database.path);
        Ok(Self { db, config })
    }
}
