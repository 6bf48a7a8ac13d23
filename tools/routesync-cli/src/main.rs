//! routesync CLI - Inspect how URLs become routes and back.
//!
//! Commands:
//! - `routesync parse` - Parse a URL into a route
//! - `routesync normalize` - Normalize paths
//! - `routesync match` - Match a URL against route patterns
//! - `routesync simulate` - Drive a headless store and show history writes
//! - `routesync config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, MatchArgs, NormalizeArgs, ParseArgs, SimulateArgs};

/// routesync CLI - Parse, match and simulate URL-synchronised routes
#[derive(Parser)]
#[command(name = "routesync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Override the configured base path
    #[arg(short, long, global = true)]
    base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a URL into a route
    Parse(ParseArgs),

    /// Normalize one or more paths
    Normalize(NormalizeArgs),

    /// Match a URL against route patterns
    Match(MatchArgs),

    /// Replay a sequence of navigations against an in-memory history
    Simulate(SimulateArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        init_tracing();
    }

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), cli.base.as_deref(), output)?;

    // Execute command
    let result = match cli.command {
        Commands::Parse(args) => commands::parse::run(args, &ctx),
        Commands::Normalize(args) => commands::normalize::run(args, &ctx),
        Commands::Match(args) => commands::matching::run(args, &ctx),
        Commands::Simulate(args) => commands::simulate::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

const DEFAULT_LOG_FILTER: &str = "routesync=debug,routesync_core=debug,routesync_store=trace";

/// Log to stderr. `RUST_LOG` wins over the default filter.
fn init_tracing() {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
