use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Migrate(args) => commands::migrate::handle(&args, ctx, flags).await,
        Commands::Meals => commands::meals::handle(ctx, flags).await,
        Commands::Share { action } => commands::share::handle(&action, ctx, flags).await,
    }
}
