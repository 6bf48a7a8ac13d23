//! Error types for routesync.
//!
//! Ordinary bad input (malformed URLs, paths outside the base, patterns that
//! do not match) never surfaces as an error. These variants cover
//! programmer errors: unusable configuration and patterns that cannot be
//! compiled.

use thiserror::Error;

/// Result type for routesync operations.
pub type RouteResult<T> = Result<T, RouteError>;

/// Errors that can occur in routesync.
#[derive(Error, Debug)]
pub enum RouteError {
    /// Route pattern could not be compiled.
    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Configuration values are inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML configuration could not be parsed.
    #[error("Failed to parse TOML configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// JSON configuration could not be parsed.
    #[error("Failed to parse JSON configuration: {0}")]
    ConfigJson(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

