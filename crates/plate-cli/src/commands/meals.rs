use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `plate meals`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let limit = flags.limit.unwrap_or(ctx.config.general.default_limit);
    let household = ctx
        .db
        .default_household()
        .await
        .context("cannot list meals")?;
    let meals = ctx.db.list_meals(&household.id, limit).await?;
    output(&meals, flags.format)
}
