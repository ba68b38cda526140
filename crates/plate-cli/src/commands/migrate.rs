use std::path::PathBuf;

use anyhow::{Context, bail};
use plate_db::migrate::{MigrateOptions, SourceSnapshot};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::MigrateArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `plate migrate`.
pub async fn handle(args: &MigrateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let source = args
        .source
        .as_ref()
        .map_or_else(|| ctx.config.migration.source_path(), PathBuf::from);
    if !source.is_dir() {
        bail!("legacy source directory '{}' does not exist", source.display());
    }

    let options = MigrateOptions {
        household_name: args
            .household
            .clone()
            .unwrap_or_else(|| ctx.config.migration.household_name.clone()),
    };

    let snapshot = SourceSnapshot::load_dir(&source);
    let report = ctx
        .db
        .migrate(&snapshot, &options)
        .await
        .with_context(|| format!("migration from '{}' failed", source.display()))?;

    if !flags.quiet {
        eprintln!("{report}");
    }
    output(&report, flags.format)
}
