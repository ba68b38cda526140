use anyhow::Context;
use serde::Serialize;

use plate_core::entities::{SharedMenu, SharedMenuResponse};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SharedMenuView {
    #[serde(flatten)]
    menu: SharedMenu,
    responses: Vec<SharedMenuResponse>,
}

pub async fn run(token: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let menu = ctx
        .db
        .get_shared_menu_by_token(token)
        .await
        .with_context(|| format!("no shared menu with token '{token}'"))?;
    let responses = ctx.db.list_shared_menu_responses(&menu.id).await?;
    output(&SharedMenuView { menu, responses }, flags.format)
}
