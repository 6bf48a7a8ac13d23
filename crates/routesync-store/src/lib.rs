//! Route store for routesync.
//!
//! `RouteStore` holds the current [`Route`](routesync_core::Route), notifies
//! subscribers and writes changes back to a [`History`]. Browser wiring
//! lives behind the `web` feature, the Leptos signal behind `leptos`.

pub mod debounce;
pub mod history;
pub mod navigation;
mod store;

#[cfg(feature = "leptos")]
pub mod reactive;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod web;

pub use debounce::{Debouncer, ManualTimer, Timer, TimerId};
pub use history::{History, MemoryHistory};
pub use navigation::{
    classify, Anchor, ClickDecision, ClickEvent, IgnoreReason, LinkElement, Modifiers,
};
pub use store::{RouteStore, RouteStoreBuilder, RouteTarget, Subscription};

#[cfg(feature = "leptos")]
pub use reactive::route_signal;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use web::{attach, browser_store, BrowserBindings, BrowserHistory, BrowserTimer, WebError};
