//! Store configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RouteError, RouteResult};

/// Reference URL used when no browser location is available.
pub const DEFAULT_HREF: &str = "http://localhost";

/// Delays at or below this many milliseconds write history immediately.
pub const IMMEDIATE_THRESHOLD_MS: u64 = 200;

/// Decoding/encoding options for one parameter axis (query or fragment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamOptions {
    /// Parse the axis into parameters at all.
    #[serde(default = "default_true")]
    pub parse: bool,
    /// Coerce values into booleans, numbers and nil.
    #[serde(default = "default_true")]
    pub typed: bool,
    /// Drop nil and empty values when encoding.
    #[serde(default)]
    pub clean: bool,
    /// Drop `false` and write `true` as a bare key when encoding.
    #[serde(default)]
    pub short_boolean: bool,
}

impl Default for ParamOptions {
    fn default() -> Self {
        Self {
            parse: true,
            typed: true,
            clean: false,
            short_boolean: false,
        }
    }
}

impl ParamOptions {
    pub fn with_parse(mut self, parse: bool) -> Self {
        self.parse = parse;
        self
    }

    pub fn with_typed(mut self, typed: bool) -> Self {
        self.typed = typed;
        self
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn with_short_boolean(mut self, short_boolean: bool) -> Self {
        self.short_boolean = short_boolean;
        self
    }
}

/// Whether anchor clicks are intercepted.
///
/// Deserializes from `true`/`false` or from a CSS selector string that
/// limits interception to links inside matching elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavigationMode {
    /// `true` intercepts every eligible link, `false` none.
    Enabled(bool),
    /// Only links inside an element matching this selector.
    Scoped(String),
}

impl NavigationMode {
    /// Check if interception is on at all.
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Enabled(enabled) => *enabled,
            Self::Scoped(selector) => !selector.is_empty(),
        }
    }

    /// Selector restricting interception, if any.
    pub fn scope(&self) -> Option<&str> {
        match self {
            Self::Scoped(selector) if !selector.is_empty() => Some(selector),
            _ => None,
        }
    }
}

impl Default for NavigationMode {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

/// Options resolved once when a route store is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path prefix under which the application lives.
    #[serde(default)]
    pub base: String,

    /// Reference URL for parsing when there is no browser location.
    #[serde(default = "default_href")]
    pub href: String,

    /// Synchronise with the browser history.
    #[serde(default = "default_true")]
    pub side_effect: bool,

    /// Intercept same-origin anchor clicks.
    #[serde(default)]
    pub handle_navigation: NavigationMode,

    /// Debounce delay for history writes, in milliseconds.
    #[serde(default)]
    pub delay_ms: u64,

    /// Clear carried-over query/fragment when the path changes.
    #[serde(default)]
    pub auto_clear_params: bool,

    /// Query string options.
    #[serde(default)]
    pub query: ParamOptions,

    /// Fragment options.
    #[serde(default)]
    pub fragment: ParamOptions,
}

fn default_true() -> bool {
    true
}

fn default_href() -> String {
    DEFAULT_HREF.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base: String::new(),
            href: default_href(),
            side_effect: true,
            handle_navigation: NavigationMode::default(),
            delay_ms: 0,
            auto_clear_params: false,
            query: ParamOptions::default(),
            fragment: ParamOptions::default(),
        }
    }
}

impl StoreConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for headless use: no history side effects.
    pub fn headless() -> Self {
        Self {
            side_effect: false,
            handle_navigation: NavigationMode::Enabled(false),
            ..Self::default()
        }
    }

    /// Set the base path.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Set the reference URL.
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = href.into();
        self
    }

    pub fn with_side_effect(mut self, side_effect: bool) -> Self {
        self.side_effect = side_effect;
        self
    }

    pub fn with_navigation(mut self, mode: NavigationMode) -> Self {
        self.handle_navigation = mode;
        self
    }

    /// Set the history write delay in milliseconds.
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_auto_clear_params(mut self, auto_clear: bool) -> Self {
        self.auto_clear_params = auto_clear;
        self
    }

    pub fn with_query(mut self, options: ParamOptions) -> Self {
        self.query = options;
        self
    }

    pub fn with_fragment(mut self, options: ParamOptions) -> Self {
        self.fragment = options;
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> RouteResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> RouteResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` files are JSON, everything else TOML.
    pub fn load(path: impl AsRef<Path>) -> RouteResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RouteError::Io {
            path: path.display().to_string(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Reject values no store can work with.
    pub fn validate(&self) -> RouteResult<()> {
        if self.base.contains(['?', '#']) {
            return Err(RouteError::Config(format!(
                "base must be a plain path, got {:?}",
                self.base
            )));
        }

        if Url::parse(&self.href).is_err() {
            return Err(RouteError::Config(format!(
                "href must be an absolute URL, got {:?}",
                self.href
            )));
        }

        Ok(())
    }

    /// History write delay as a duration.
    pub fn delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.delay_ms)
    }
}
