//! URL ⇄ route transcoding.

use url::Url;

use crate::config::{ParamOptions, StoreConfig};
use crate::params::{decode_component, decode_with, encode_with};
use crate::path::{join_base, normalize, strip_base};
use crate::route::Route;

/// Raw pieces of a resolved URL, without their `?`/`#` markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// Percent-encoded path.
    pub path: String,
    /// Query string.
    pub query: String,
    /// Fragment string.
    pub fragment: String,
}

/// Parses URLs into [`Route`]s and serializes them back.
///
/// Query and fragment are handled independently, each with its own
/// [`ParamOptions`].
#[derive(Debug, Clone)]
pub struct RouteParser {
    base: String,
    reference: Option<Url>,
    query: ParamOptions,
    fragment: ParamOptions,
}

impl Default for RouteParser {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl RouteParser {
    /// Create a parser from the store configuration.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            base: normalize(&config.base),
            reference: Url::parse(&config.href).ok(),
            query: config.query,
            fragment: config.fragment,
        }
    }

    /// Resolve relative input against `href` instead of the configured one.
    ///
    /// An unparseable `href` keeps the previous reference.
    pub fn with_reference(mut self, href: &str) -> Self {
        if let Ok(url) = Url::parse(href) {
            self.reference = Some(url);
        }
        self
    }

    /// The normalized base path (`/` when none is configured).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The reference URL relative input resolves against.
    pub fn reference(&self) -> Option<&Url> {
        self.reference.as_ref()
    }

    pub fn query_options(&self) -> &ParamOptions {
        &self.query
    }

    pub fn fragment_options(&self) -> &ParamOptions {
        &self.fragment
    }

    /// Check whether a URL path lies under the base.
    pub fn in_base(&self, path: &str) -> bool {
        strip_base(path, &self.base).is_some()
    }

    /// Resolve `input` into its raw parts.
    ///
    /// Anything that cannot be resolved yields empty parts.
    pub fn split(&self, input: &str) -> UrlParts {
        let resolved = match &self.reference {
            Some(reference) => reference.join(input),
            None => Url::parse(input),
        };

        match resolved {
            Ok(url) => UrlParts {
                path: url.path().to_string(),
                query: url.query().unwrap_or_default().to_string(),
                fragment: url.fragment().unwrap_or_default().to_string(),
            },
            Err(err) => {
                tracing::trace!(%input, error = %err, "unresolvable url");
                UrlParts::default()
            }
        }
    }

    /// Parse a URL-like string into a route.
    ///
    /// A path outside the base produces the empty-path sentinel.
    pub fn parse(&self, input: &str) -> Route {
        let parts = self.split(input);

        let path = match strip_base(&parts.path, &self.base) {
            Some(rest) => normalize(rest),
            None => String::new(),
        };

        Route {
            path,
            query: decode_with(&parts.query, &self.query),
            fragment: decode_with(&parts.fragment, &self.fragment),
        }
    }

    /// Parse a navigation target the way `goto` does.
    ///
    /// Absolute URLs are parsed as-is. Anything else is taken relative to
    /// the base: its path is normalized and prefixed, its query and fragment
    /// are kept verbatim.
    pub fn resolve(&self, target: &str) -> Route {
        if is_absolute_url(target) {
            return self.parse(target);
        }

        let split_at = target.find(['?', '#']).unwrap_or(target.len());
        let (path, rest) = target.split_at(split_at);
        self.parse(&format!("{}{}", join_base(&self.base, path), rest))
    }

    /// Serialize a route relative to the base.
    ///
    /// Query and fragment are appended only when their axis is parsed and
    /// the encoding is non-empty. The assembled string is percent-decoded.
    pub fn serialize(&self, route: &Route) -> String {
        decode_component(&format!("{}{}", route.path, self.encoded_params(route)))
    }

    /// Serialize a route including the base, as written to history.
    pub fn href(&self, route: &Route) -> String {
        decode_component(&format!(
            "{}{}",
            join_base(&self.base, &route.path),
            self.encoded_params(route)
        ))
    }

    fn encoded_params(&self, route: &Route) -> String {
        let mut out = String::new();

        if self.query.parse {
            let query = encode_with(&route.query, &self.query);
            if !query.is_empty() {
                out.push('?');
                out.push_str(&query);
            }
        }

        if self.fragment.parse {
            let fragment = encode_with(&route.fragment, &self.fragment);
            if !fragment.is_empty() {
                out.push('#');
                out.push_str(&fragment);
            }
        }

        out
    }
}

/// Check for a URL with a hierarchical scheme (`https://...`).
///
/// Opaque forms such as `tag:rust` or `mailto:a@b` count as relative.
pub fn is_absolute_url(input: &str) -> bool {
    Url::parse(input).is_ok_and(|url| !url.cannot_be_a_base())
}

/// Serialize a route with the given configuration.
pub fn serialize(route: &Route, config: &StoreConfig) -> String {
    RouteParser::new(config).serialize(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use crate::scalar::Value;

    fn app_parser() -> RouteParser {
        RouteParser::new(&StoreConfig::new().with_base("/app"))
    }

    #[test]
    fn test_end_to_end() {
        let parser = app_parser();
        let route = parser.parse("https://x.test/app/users/42?active=true#tab=info");

        assert_eq!(route.path, "/users/42");
        assert_eq!(route.query, Params::new().with("active", true));
        assert_eq!(route.fragment, Params::new().with("tab", "info"));
        assert_eq!(parser.serialize(&route), "/users/42?active=true#tab=info");
        assert_eq!(parser.href(&route), "/app/users/42?active=true#tab=info");
    }

    #[test]
    fn test_outside_base_is_empty_path() {
        let parser = app_parser();
        let route = parser.parse("https://x.test/other/page?x=1");
        assert_eq!(route.path, "");
        assert!(route.is_outside_base());
        assert_eq!(route.query.get("x"), Some(&Value::Number(1.0)));

        assert_eq!(parser.parse("/apple").path, "");
        assert_eq!(parser.parse("/app").path, "/");
        assert_eq!(parser.parse("/app/").path, "/");
    }

    #[test]
    fn test_relative_input_uses_reference() {
        let parser = RouteParser::default();
        let route = parser.parse("/Users//7/?sort=name");
        assert_eq!(route.path, "/users/7");
        assert_eq!(route.query.get("sort"), Some(&Value::from("name")));

        let parser = parser.with_reference("https://example.com/docs/intro");
        assert_eq!(parser.parse("setup").path, "/docs/setup");
    }

    #[test]
    fn test_malformed_input_settles_on_root() {
        let parser = RouteParser::new(&StoreConfig::new().with_href("not a url"));
        assert!(parser.reference().is_none());
        let route = parser.parse("::::");
        assert_eq!(route, Route::root());

        assert_eq!(app_parser().with_reference("nope").parse("http://[::1"), Route::default());
    }

    #[test]
    fn test_axes_are_independent() {
        let config = StoreConfig::new()
            .with_query(ParamOptions::default().with_typed(false))
            .with_fragment(ParamOptions::default().with_parse(false));
        let parser = RouteParser::new(&config);
        let route = parser.parse("/p?n=5#a=1");

        assert_eq!(route.query.get("n"), Some(&Value::from("5")));
        assert!(route.fragment.is_empty());

        let route = route.with_fragment("ignored", true);
        assert_eq!(parser.serialize(&route), "/p?n=5");
    }

    #[test]
    fn test_serialize_clean_and_short_boolean() {
        let config = StoreConfig::new()
            .with_query(ParamOptions::default().with_clean(true).with_short_boolean(true));
        let parser = RouteParser::new(&config);
        let route = Route::new("/list")
            .with_query("open", true)
            .with_query("archived", false)
            .with_query("q", "")
            .with_fragment("hidden", false);

        assert_eq!(parser.serialize(&route), "/list?open#hidden=false");
    }

    #[test]
    fn test_serialize_decodes_final_string() {
        let parser = RouteParser::default();
        let route = Route::new("/search").with_query("q", "café au lait");
        assert_eq!(parser.serialize(&route), "/search?q=café au lait");
        assert_eq!(parser.serialize(&Route::root()), "/");
    }

    #[test]
    fn test_resolve_goto_targets() {
        let parser = app_parser();
        let route = parser.resolve("Users/5?Tab=Posts");
        assert_eq!(route.path, "/users/5");
        assert_eq!(route.query.get("Tab"), Some(&Value::from("Posts")));

        assert_eq!(parser.resolve("/").path, "/");
        assert_eq!(parser.resolve("https://x.test/app/a").path, "/a");
        assert_eq!(parser.resolve("https://x.test/b").path, "");

        // a colon in the first segment is not a scheme
        assert_eq!(parser.resolve("tag:rust").path, "/tag:rust");
        assert_eq!(parser.resolve("Tag:Rust?x=1").path, "/tag:rust");
        assert_eq!(RouteParser::default().resolve("tag:rust").path, "/tag:rust");
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://x.test/a"));
        assert!(is_absolute_url("http://localhost"));
        assert!(!is_absolute_url("/a"));
        assert!(!is_absolute_url("users/5"));
        assert!(!is_absolute_url("tag:rust"));
        assert!(!is_absolute_url("mailto:a@b.test"));
    }

    #[test]
    fn test_free_serialize() {
        let route = Route::new("/a").with_query("b", 2);
        assert_eq!(serialize(&route, &StoreConfig::default()), "/a?b=2");
    }
}
