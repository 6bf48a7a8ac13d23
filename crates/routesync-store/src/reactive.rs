//! Leptos signal binding.

use leptos::prelude::{RwSignal, Set};
use routesync_core::Route;

use crate::store::{RouteStore, Subscription};

/// Mirror the store into a signal.
///
/// The signal follows every store change until the subscription is removed.
/// Write through the store, not the signal.
pub fn route_signal(store: &RouteStore) -> (RwSignal<Route>, Subscription) {
    let signal = RwSignal::new(store.get());
    let subscription = store.subscribe(move |route| signal.set(route.clone()));
    (signal, subscription)
}
