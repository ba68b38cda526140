use clap::{Args, Subcommand};

use crate::cli::subcommands::ShareCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Load a legacy JSON snapshot into the store, replacing its contents.
    Migrate(MigrateArgs),
    /// List recent meals with their selections and reviews (see --limit).
    Meals,
    /// Shared menus.
    Share {
        #[command(subcommand)]
        action: ShareCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct MigrateArgs {
    /// Directory holding the legacy JSON files (overrides `migration.source_dir`)
    #[arg(long)]
    pub source: Option<String>,

    /// Household name (overrides `migration.household_name`)
    #[arg(long)]
    pub household: Option<String>,
}
