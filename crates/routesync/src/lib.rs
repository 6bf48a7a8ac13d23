//! # routesync
//!
//! Keeps an application's current route in a single observable store and
//! mirrors it into the browser address bar.
//!
//! ## Quick Start
//!
//! ```rust
//! use routesync::prelude::*;
//!
//! let history = MemoryHistory::new("https://shop.test/app/");
//! let store = RouteStore::builder(StoreConfig::new().with_base("/app"))
//!     .history(history.clone())
//!     .build();
//!
//! let _sub = store.subscribe(|route| println!("now at {}", route.path));
//! store.goto("products/7?color=red");
//!
//! assert_eq!(store.get().path, "/products/7");
//! assert_eq!(history.location(), "https://shop.test/app/products/7?color=red");
//!
//! let params = store.matches("/products/:id", false).unwrap_or_default();
//! assert_eq!(params.get("id"), Some(&Some("7".to_string())));
//! ```
//!
//! ## Crate Features
//!
//! - `web` - Browser history, timers and click listeners (wasm32 only)
//! - `leptos` - Mirror the store into a Leptos `RwSignal`

pub mod prelude;

// Re-export member crates
pub use routesync_core;
pub use routesync_store;

// Re-export core types
pub use routesync_core::{
    decode, encode, normalize, serialize, Matcher, NavigationMode, ParamOptions, Params, Pattern,
    Route, RouteError, RouteParams, RouteParser, RouteResult, StoreConfig, Value,
};
pub use routesync_core::{match_path, match_route};

// Re-export store types
pub use routesync_store::{
    ClickDecision, History, IgnoreReason, ManualTimer, MemoryHistory, RouteStore, RouteTarget,
    Subscription, Timer,
};

/// Create a store with no history, seeded from `config.href`.
pub fn create_store(config: StoreConfig) -> RouteStore {
    RouteStore::new(config)
}
