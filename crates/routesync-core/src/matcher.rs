//! Route pattern compilation and matching.
//!
//! Pattern syntax:
//!
//! ```text
//! /users          static segment (case-insensitive)
//! /users/:id      named segment
//! /users/:id?     optional named segment
//! /files/:name.md named segment with a literal suffix
//! /docs/*         wildcard, captured as `wild`
//! ```
//!
//! A failed match is `None`; a match without captures is `Some` of an empty
//! map.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{RouteError, RouteResult};
use crate::params::decode_component;
use crate::path::{normalize, strip_base};
use crate::route::Route;

/// Pattern matched when none is given.
pub const DEFAULT_PATTERN: &str = "*";

/// Capture name used for `*` segments.
pub const WILDCARD_KEY: &str = "wild";

const CACHE_LIMIT: usize = 256;

/// Captured segments by name; `None` for an optional segment that was absent.
pub type RouteParams = BTreeMap<String, Option<String>>;

static PATTERN_CACHE: Lazy<Mutex<HashMap<(String, bool), Pattern>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    keys: Vec<String>,
    regex: Regex,
    loose: bool,
}

impl Pattern {
    /// Compile a pattern.
    ///
    /// Strict patterns must consume the whole path (a trailing slash is
    /// tolerated); `loose` patterns match any path they are a segment-aligned
    /// prefix of.
    pub fn compile(pattern: &str, loose: bool) -> RouteResult<Self> {
        let mut keys = Vec::new();
        let mut expr = String::from("(?i)^");

        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            if segment.starts_with('*') {
                keys.push(WILDCARD_KEY.to_string());
                expr.push_str("/(.*)");
            } else if let Some(param) = segment.strip_prefix(':') {
                let optional = param.find('?');
                let suffix = param.find('.');
                let name = &param[..optional.or(suffix).unwrap_or(param.len())];

                if name.is_empty() {
                    return Err(RouteError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: format!("unnamed parameter in segment {:?}", segment),
                    });
                }
                keys.push(name.to_string());

                if optional.is_some() && suffix.is_none() {
                    expr.push_str("(?:/([^/]+?))?");
                } else {
                    expr.push_str("/([^/]+?)");
                }
                if let Some(at) = suffix {
                    if optional.is_some() {
                        expr.push('?');
                    }
                    expr.push_str(&regex::escape(&param[at..]));
                }
            } else {
                expr.push('/');
                expr.push_str(&regex::escape(segment));
            }
        }

        expr.push_str(if loose { "(?:/|$)" } else { "/?$" });

        let regex = Regex::new(&expr).map_err(|err| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            keys,
            regex,
            loose,
        })
    }

    /// Compile through a process-wide cache.
    pub fn cached(pattern: &str, loose: bool) -> RouteResult<Self> {
        let key = (pattern.to_string(), loose);
        if let Ok(cache) = PATTERN_CACHE.lock() {
            if let Some(found) = cache.get(&key) {
                return Ok(found.clone());
            }
        }

        let compiled = Self::compile(pattern, loose)?;
        if let Ok(mut cache) = PATTERN_CACHE.lock() {
            if cache.len() >= CACHE_LIMIT {
                cache.clear();
            }
            cache.insert(key, compiled.clone());
        }
        Ok(compiled)
    }

    /// The pattern text this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Capture names, in order of appearance.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_loose(&self) -> bool {
        self.loose
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path`, returning percent-decoded captures.
    ///
    /// Empty or absent captures come back as `None`.
    pub fn exec(&self, path: &str) -> Option<RouteParams> {
        let captures = self.regex.captures(path)?;

        let params = self
            .keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let value = captures
                    .get(i + 1)
                    .map(|m| decode_component(m.as_str()))
                    .filter(|v| !v.is_empty());
                (key.clone(), value)
            })
            .collect();

        Some(params)
    }
}

/// Matches routes and raw paths, honouring an application base.
#[derive(Debug, Clone)]
pub struct Matcher {
    base: String,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new("")
    }
}

impl Matcher {
    /// Create a matcher for paths under `base`.
    pub fn new(base: &str) -> Self {
        Self {
            base: normalize(base),
        }
    }

    /// The normalized base.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Match a parsed route (whose path is already relative to the base).
    pub fn match_route(&self, route: &Route, pattern: &str, loose: bool) -> Option<RouteParams> {
        if route.is_outside_base() {
            return None;
        }
        exec(&route.path, pattern, loose)
    }

    /// Match a raw path, stripping the base first.
    pub fn match_path(&self, path: &str, pattern: &str, loose: bool) -> Option<RouteParams> {
        let rest = strip_base(path, &self.base)?;
        let rest = if rest.is_empty() { "/" } else { rest };
        exec(rest, pattern, loose)
    }

    /// Index and captures of the first pattern matching `route`.
    pub fn first_match<'p, I>(
        &self,
        route: &Route,
        patterns: I,
        loose: bool,
    ) -> Option<(usize, RouteParams)>
    where
        I: IntoIterator<Item = &'p str>,
    {
        patterns
            .into_iter()
            .enumerate()
            .find_map(|(i, pattern)| self.match_route(route, pattern, loose).map(|p| (i, p)))
    }
}

fn exec(path: &str, pattern: &str, loose: bool) -> Option<RouteParams> {
    match Pattern::cached(pattern, loose) {
        Ok(compiled) => compiled.exec(path),
        Err(err) => {
            tracing::warn!(%pattern, error = %err, "route pattern rejected");
            None
        }
    }
}

/// Match a route against a pattern.
pub fn match_route(route: &Route, pattern: &str, loose: bool) -> Option<RouteParams> {
    Matcher::default().match_route(route, pattern, loose)
}

/// Match a raw path against a pattern.
pub fn match_path(path: &str, pattern: &str, loose: bool) -> Option<RouteParams> {
    Matcher::default().match_path(path, pattern, loose)
}
