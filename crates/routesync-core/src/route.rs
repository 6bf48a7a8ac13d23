//! The route value mirrored from the address bar.

use serde::{Deserialize, Serialize};

use crate::params::Params;
use crate::scalar::Value;

/// Structured snapshot of a URL: path plus query and fragment parameters.
///
/// `path` is normalized (leading slash, no duplicate or trailing slashes),
/// or empty when the URL lies outside the application base. Routes are
/// replaced wholesale, never edited in place by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Normalized path relative to the base.
    pub path: String,
    /// Query parameters.
    #[serde(default)]
    pub query: Params,
    /// Fragment parameters.
    #[serde(default)]
    pub fragment: Params,
}

impl Route {
    /// Create a route for a path with no parameters.
    ///
    /// The path is stored as given; use [`crate::path::normalize`] first
    /// when it comes from untrusted input.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Params::new(),
            fragment: Params::new(),
        }
    }

    /// The root route.
    pub fn root() -> Self {
        Self::new("/")
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key, value);
        self
    }

    /// Add a fragment parameter.
    pub fn with_fragment(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fragment.insert(key, value);
        self
    }

    /// Replace all query parameters.
    pub fn with_query_params(mut self, query: Params) -> Self {
        self.query = query;
        self
    }

    /// Replace all fragment parameters.
    pub fn with_fragment_params(mut self, fragment: Params) -> Self {
        self.fragment = fragment;
        self
    }

    /// True for the sentinel produced by URLs outside the base.
    pub fn is_outside_base(&self) -> bool {
        self.path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_builders() {
        let route = Route::new("/users/42")
            .with_query("active", true)
            .with_fragment("tab", "info");
        assert_eq!(route.path, "/users/42");
        assert_eq!(route.query.get("active"), Some(&Value::Bool(true)));
        assert_eq!(route.fragment.get("tab"), Some(&Value::from("info")));
        assert!(!route.is_outside_base());
        assert!(Route::default().is_outside_base());
    }

    #[test]
    fn test_route_json() {
        let route = Route::new("/a").with_query("n", 1);
        let json = serde_json::to_string(&route).unwrap();
        assert_eq!(json, r#"{"path":"/a","query":{"n":1},"fragment":{}}"#);

        let back: Route = serde_json::from_str(r#"{"path":"/a","query":{"n":1}}"#).unwrap();
        assert_eq!(back, route);
    }
}
