use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum ShareCommands {
    /// Show a shared menu and its responses.
    Show {
        /// Public token
        token: String,
    },
}
