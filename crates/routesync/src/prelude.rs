//! Prelude for convenient imports.
//!
//! ```rust
//! use routesync::prelude::*;
//! ```
//!
//! This imports all commonly used items:
//! - Route model: `Route`, `Params`, `Value`
//! - Configuration: `StoreConfig`, `ParamOptions`, `NavigationMode`
//! - Store: `RouteStore`, `Subscription`, `History`, `Timer`
//! - Matching: `match_route`, `Matcher`, `RouteParams`

// Route model
pub use routesync_core::{Params, Route, Value};

// Configuration
pub use routesync_core::{NavigationMode, ParamOptions, StoreConfig};

// Parsing and matching
pub use routesync_core::{match_path, match_route, Matcher, RouteParams, RouteParser};

// Errors
pub use routesync_core::{RouteError, RouteResult};

// Store
pub use routesync_store::{
    Anchor, ClickEvent, History, ManualTimer, MemoryHistory, RouteStore, Subscription, Timer,
};

#[cfg(feature = "leptos")]
pub use routesync_store::route_signal;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use routesync_store::{attach, browser_store, BrowserHistory, BrowserTimer};
