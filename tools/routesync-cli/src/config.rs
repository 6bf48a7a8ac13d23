//! CLI configuration.
//!
//! The config file is a [`StoreConfig`] document, TOML unless the file name
//! ends in `.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use routesync_core::StoreConfig;

/// File names searched for, in order, from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["routesync.toml", ".routesync.toml", "routesync.json"];

/// Load config from a file.
pub fn load(path: &Path) -> Result<StoreConfig> {
    StoreConfig::load(path)
        .with_context(|| format!("Failed to load config file: {}", path.display()))
}

/// Find the nearest config file in the directory tree.
pub fn find(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Serialize a config the way its file extension asks for.
pub fn render(config: &StoreConfig, path: &Path) -> Result<String> {
    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::to_string_pretty(config).context("Failed to encode JSON config")
    } else {
        toml::to_string_pretty(config).context("Failed to encode TOML config")
    }
}

/// Generate a commented default config file.
pub fn generate_default_config(base: &str) -> String {
    format!(
        r#"# routesync store configuration

# Path prefix the application lives under
base = "{base}"

# Reference URL used when there is no browser location
href = "http://localhost"

# Write route changes to history and listen for back/forward
side_effect = true

# Intercept same-origin link clicks: true, false, or a scope selector
handle_navigation = true

# Debounce history writes; 200 or less writes immediately
delay_ms = 0

# Drop query/fragment carried over unchanged when the path changes
auto_clear_params = false

[query]
parse = true
typed = true
clean = false
short_boolean = false

[fragment]
parse = true
typed = true
clean = false
short_boolean = false
"#,
        base = base
    )
}
