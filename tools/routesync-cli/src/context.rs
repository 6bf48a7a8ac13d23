//! CLI execution context.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use routesync_core::StoreConfig;

use crate::config;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Effective store configuration.
    pub config: StoreConfig,
    /// File the configuration came from, if any.
    pub source: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from an explicit config file or the nearest one found.
    pub fn load(config_path: Option<&str>, base: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let source = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => config::find(&cwd),
        };

        let mut store_config = match &source {
            Some(path) => {
                output.debug(&format!("Using config {}", path.display()));
                config::load(path)?
            }
            None => StoreConfig::default(),
        };

        tracing::debug!(
            source = ?source.as_deref().map(|path| path.display().to_string()),
            base = %store_config.base,
            "configuration loaded"
        );

        if let Some(base) = base {
            tracing::debug!(%base, "base overridden from command line");
            store_config.base = base.to_string();
            store_config
                .validate()
                .context("Invalid --base override")?;
        }

        Ok(Self {
            config: store_config,
            source,
            output,
            cwd,
        })
    }
}
