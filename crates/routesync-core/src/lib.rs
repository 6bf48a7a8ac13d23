//! Core transcoding for routesync.
//!
//! This crate turns URLs into structured routes and back:
//! - `Value` / `coerce` - Typed scalars from string tokens
//! - `Params` / `decode` / `encode` - Query and fragment codec
//! - `normalize` - Canonical paths
//! - `Pattern` / `Matcher` - Route patterns with named captures
//! - `RouteParser` - URL ⇄ `Route`
//! - `StoreConfig` - Options shared with the store
//!
//! ```
//! use routesync_core::{RouteParser, StoreConfig, Value};
//!
//! let parser = RouteParser::new(&StoreConfig::new().with_base("/app"));
//! let route = parser.parse("https://x.test/app/users/42?active=true#tab=info");
//!
//! assert_eq!(route.path, "/users/42");
//! assert_eq!(route.query.get("active"), Some(&Value::Bool(true)));
//! assert_eq!(parser.serialize(&route), "/users/42?active=true#tab=info");
//! ```

pub mod config;
pub mod error;
pub mod matcher;
pub mod params;
pub mod parser;
pub mod path;
mod route;
pub mod scalar;

pub use config::{NavigationMode, ParamOptions, StoreConfig, DEFAULT_HREF, IMMEDIATE_THRESHOLD_MS};
pub use error::{RouteError, RouteResult};
pub use matcher::{match_path, match_route, Matcher, Pattern, RouteParams, DEFAULT_PATTERN};
pub use params::{decode, decode_with, encode, encode_with, Params};
pub use parser::{is_absolute_url, serialize, RouteParser, UrlParts};
pub use path::normalize;
pub use route::Route;
pub use scalar::{coerce, Value};
