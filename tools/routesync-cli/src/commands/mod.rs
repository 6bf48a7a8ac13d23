//! CLI command implementations.

pub mod config;
pub mod matching;
pub mod normalize;
pub mod parse;
pub mod simulate;

use clap::{Args, Subcommand};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// URL to parse; relative input resolves against the configured href.
    pub url: String,
}

/// Arguments for the normalize command.
#[derive(Args)]
pub struct NormalizeArgs {
    /// Paths to normalize.
    #[arg(required = true)]
    pub paths: Vec<String>,
}

/// Arguments for the match command.
#[derive(Args)]
pub struct MatchArgs {
    /// URL to match.
    pub url: String,

    /// Patterns to try, first match wins.
    #[arg(required = true)]
    pub patterns: Vec<String>,

    /// Accept patterns that match a prefix of the path.
    #[arg(short, long)]
    pub loose: bool,
}

/// Arguments for the simulate command.
#[derive(Args)]
pub struct SimulateArgs {
    /// Navigation targets, applied in order.
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Debounce delay in milliseconds (overrides config).
    #[arg(short, long)]
    pub delay: Option<u64>,

    /// Milliseconds elapsed between navigations.
    #[arg(short, long, default_value_t = 0)]
    pub interval: u64,

    /// Initial location (default: the configured href).
    #[arg(short, long)]
    pub start: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Validate the configuration.
    Validate,
    /// Create a config file in the current directory.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}
