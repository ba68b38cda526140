mod show;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ShareCommands;
use crate::context::AppContext;

/// Handle `plate share`.
pub async fn handle(action: &ShareCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        ShareCommands::Show { token } => show::run(token, ctx, flags).await,
    }
}
