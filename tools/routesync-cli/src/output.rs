//! Output formatting for the CLI.

use console::style;
use routesync_core::{Params, Value};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a step in a process.
    pub fn step(&self, num: usize, total: usize, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style(format!("[{}/{}]", num, total)).dim(), msg);
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print every entry of a parameter map under a label.
    pub fn params(&self, label: &str, params: &Params) {
        if self.json {
            return;
        }
        if params.is_empty() {
            self.kv(label, &style("(none)").dim().to_string());
            return;
        }
        println!("  {}:", style(label).dim());
        for (key, value) in params.iter() {
            println!("    {} = {}", key, value_badge(value));
        }
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Styled rendering of a scalar, colored by type.
pub fn value_badge(value: &Value) -> String {
    match value {
        Value::Bool(_) => style(value.to_string()).magenta().to_string(),
        Value::Number(_) => style(value.to_string()).cyan().to_string(),
        Value::Null | Value::Undefined => style(value.to_string()).dim().to_string(),
        Value::String(s) => style(format!("{:?}", s)).green().to_string(),
    }
}

/// Display form of a path, marking the outside-base sentinel.
pub fn path_label(path: &str) -> String {
    if path.is_empty() {
        style("(outside base)").yellow().to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_badge_keeps_text() {
        console::set_colors_enabled(false);
        assert_eq!(value_badge(&Value::Bool(true)), "true");
        assert_eq!(value_badge(&Value::Number(1.5)), "1.5");
        assert_eq!(value_badge(&Value::from("a b")), "\"a b\"");
    }

    #[test]
    fn test_path_label() {
        console::set_colors_enabled(false);
        assert_eq!(path_label("/a"), "/a");
        assert_eq!(path_label(""), "(outside base)");
    }
}
