//! The observable route store.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use routesync_core::{Matcher, Params, Route, RouteParams, RouteParser, StoreConfig};
use url::Url;

use crate::debounce::{Debouncer, Timer};
use crate::history::History;
use crate::navigation::{classify, ClickDecision, ClickEvent, LinkElement};

type Listener = Rc<dyn Fn(&Route)>;

/// What [`RouteStore::set`] accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteTarget {
    /// A structured route, stored as given.
    Route(Route),
    /// A URL, resolved the way [`RouteStore::goto`] does.
    Url(String),
}

impl From<Route> for RouteTarget {
    fn from(route: Route) -> Self {
        RouteTarget::Route(route)
    }
}

impl From<&str> for RouteTarget {
    fn from(url: &str) -> Self {
        RouteTarget::Url(url.to_string())
    }
}

impl From<String> for RouteTarget {
    fn from(url: String) -> Self {
        RouteTarget::Url(url)
    }
}

impl From<&String> for RouteTarget {
    fn from(url: &String) -> Self {
        RouteTarget::Url(url.clone())
    }
}

struct StoreInner {
    config: StoreConfig,
    parser: RouteParser,
    matcher: Matcher,
    current: RefCell<Route>,
    version: Cell<u64>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
    history: Option<Rc<dyn History>>,
    debouncer: Debouncer,
}

/// Holds the current route and keeps it in sync with history.
///
/// Clones share state. The store is single-threaded; all callbacks run on
/// the thread that owns it.
#[derive(Clone)]
pub struct RouteStore {
    inner: Rc<StoreInner>,
}

/// Builder for [`RouteStore`].
pub struct RouteStoreBuilder {
    config: StoreConfig,
    history: Option<Rc<dyn History>>,
    timer: Option<Rc<dyn Timer>>,
}

impl RouteStoreBuilder {
    /// Attach a history. Its location becomes the initial route.
    pub fn history(mut self, history: impl History + 'static) -> Self {
        self.history = Some(Rc::new(history));
        self
    }

    /// Use `timer` for debounced writes. Without one, writes are immediate.
    pub fn timer(mut self, timer: impl Timer + 'static) -> Self {
        self.timer = Some(Rc::new(timer));
        self
    }

    pub fn build(self) -> RouteStore {
        let mut parser = RouteParser::new(&self.config);
        let initial = match &self.history {
            Some(history) => {
                let location = history.location();
                parser = parser.with_reference(&location);
                parser.parse(&location)
            }
            None => parser.parse(&self.config.href),
        };

        let debouncer = match self.timer {
            Some(timer) => Debouncer::new(timer),
            None => Debouncer::immediate(),
        };

        tracing::debug!(
            base = %parser.base(),
            path = %initial.path,
            side_effect = self.config.side_effect,
            "route store created"
        );

        RouteStore {
            inner: Rc::new(StoreInner {
                matcher: Matcher::new(&self.config.base),
                config: self.config,
                parser,
                current: RefCell::new(initial),
                version: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                history: self.history,
                debouncer,
            }),
        }
    }
}

impl RouteStore {
    /// Create a store without history, seeded from `config.href`.
    pub fn new(config: StoreConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: StoreConfig) -> RouteStoreBuilder {
        RouteStoreBuilder {
            config,
            history: None,
            timer: None,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    pub fn parser(&self) -> &RouteParser {
        &self.inner.parser
    }

    /// Snapshot of the current route.
    pub fn get(&self) -> Route {
        self.inner.current.borrow().clone()
    }

    /// Current route serialized relative to the base.
    pub fn serialize(&self) -> String {
        self.inner.parser.serialize(&self.inner.current.borrow())
    }

    /// Current route serialized with the base, as written to history.
    pub fn href(&self) -> String {
        self.inner.parser.href(&self.inner.current.borrow())
    }

    /// Whether history writes and event handling are on.
    ///
    /// Requires `side_effect`, an attached history, and a top-level window.
    pub fn side_effects_active(&self) -> bool {
        self.inner.config.side_effect
            && self
                .inner
                .history
                .as_ref()
                .is_some_and(|history| history.is_top_level())
    }

    /// Check if a debounced history write is waiting.
    pub fn has_pending_write(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Register a listener. It is called right away with the current route,
    /// then after every change.
    pub fn subscribe(&self, listener: impl Fn(&Route) + 'static) -> Subscription {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);

        let listener: Listener = Rc::new(listener);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::clone(&listener)));

        let current = self.get();
        listener(&current);

        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Replace the current route with a route or a URL.
    pub fn set(&self, target: impl Into<RouteTarget>) {
        match target.into() {
            RouteTarget::Route(route) => self.replace(route),
            RouteTarget::Url(url) => self.goto(&url),
        }
    }

    /// Replace the current route with `f(current)`.
    pub fn update(&self, f: impl FnOnce(&Route) -> Route) {
        let current = self.get();
        self.replace(f(&current));
    }

    /// Navigate to a URL. Absolute URLs are parsed as-is; anything else is
    /// taken relative to the base.
    pub fn goto(&self, url: &str) {
        tracing::trace!(%url, "goto");
        self.replace(self.inner.parser.resolve(url));
    }

    /// Match the current route against `pattern`.
    pub fn matches(&self, pattern: &str, loose: bool) -> Option<RouteParams> {
        self.inner
            .matcher
            .match_route(&self.inner.current.borrow(), pattern, loose)
    }

    /// Re-read the history location after back/forward navigation.
    ///
    /// Any pending write is dropped; the location wins.
    pub fn handle_popstate(&self) {
        if !self.side_effects_active() {
            return;
        }
        let Some(history) = self.inner.history.as_ref() else {
            return;
        };

        self.inner.debouncer.cancel();
        let location = history.location();
        tracing::debug!(%location, "popstate");
        self.replace(self.inner.parser.parse(&location));
    }

    /// Decide how a click would be handled, without acting on it.
    pub fn classify_click<L: LinkElement>(&self, event: &ClickEvent<L>) -> Option<ClickDecision> {
        if !self.side_effects_active() {
            return None;
        }
        let history = self.inner.history.as_ref()?;
        let location = Url::parse(&history.location()).ok()?;
        Some(classify(
            event,
            &self.inner.config.handle_navigation,
            &location,
            &self.inner.parser,
        ))
    }

    /// Handle a document click. Returns true when the click became an
    /// in-app navigation and the caller must prevent the default action.
    pub fn handle_click<L: LinkElement>(&self, event: &ClickEvent<L>) -> bool {
        match self.classify_click(event) {
            Some(ClickDecision::Navigate(url)) => {
                tracing::debug!(%url, "intercepted link");
                self.replace(self.inner.parser.parse(&url));
                true
            }
            Some(ClickDecision::Ignore(reason)) => {
                tracing::trace!(%reason, "click left to the browser");
                false
            }
            None => false,
        }
    }

    fn location_route(&self) -> Option<Route> {
        if !self.side_effects_active() {
            return None;
        }
        let history = self.inner.history.as_ref()?;
        Some(self.inner.parser.parse(&history.location()))
    }

    fn replace(&self, route: Route) {
        let route = match self.location_route() {
            Some(location) if self.inner.config.auto_clear_params => {
                clear_carried(route, &location)
            }
            _ => route,
        };

        let version = self.inner.version.get() + 1;
        self.inner.version.set(version);
        *self.inner.current.borrow_mut() = route.clone();
        tracing::trace!(path = %route.path, version, "route replaced");

        self.notify(&route, version);
        self.reconcile();
    }

    fn notify(&self, route: &Route, version: u64) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            // a listener replaced the route; the newer value has been delivered
            if self.inner.version.get() != version {
                break;
            }
            listener(route);
        }
    }

    fn reconcile(&self) {
        let Some(location) = self.location_route() else {
            return;
        };
        let Some(history) = self.inner.history.as_ref() else {
            return;
        };

        let parser = &self.inner.parser;
        let current = self.get();
        if parser.serialize(&current) == parser.serialize(&location) {
            self.inner.debouncer.cancel();
            return;
        }

        let href = parser.href(&current);
        let history = Rc::clone(history);
        tracing::debug!(%href, delay_ms = self.inner.config.delay_ms, "history write scheduled");
        self.inner.debouncer.schedule(self.inner.config.delay(), move || {
            tracing::debug!(%href, "history push");
            history.push(&href);
        });
    }
}

/// Drop query or fragment carried over unchanged from the location when the
/// path changes.
fn clear_carried(mut route: Route, location: &Route) -> Route {
    if route.path == location.path {
        return route;
    }
    if !route.query.is_empty() && route.query == location.query {
        route.query = Params::new();
    }
    if !route.fragment.is_empty() && route.fragment == location.fragment {
        route.fragment = Params::new();
    }
    route
}

impl fmt::Debug for RouteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteStore")
            .field("route", &self.inner.current.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .field("history", &self.inner.history.is_some())
            .field("debouncer", &self.inner.debouncer)
            .finish()
    }
}

/// Handle returned by [`RouteStore::subscribe`].
///
/// Dropping it keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
#[must_use = "dropping a Subscription does not unsubscribe"]
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::ManualTimer;
    use crate::history::MemoryHistory;
    use routesync_core::Value;

    fn recording(store: &RouteStore) -> (Rc<RefCell<Vec<String>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |route| sink.borrow_mut().push(route.path.clone()));
        (seen, sub)
    }

    #[test]
    fn test_headless_store() {
        let store = RouteStore::new(StoreConfig::headless().with_href("https://x.test/a?b=1"));
        assert_eq!(store.get().path, "/a");
        assert_eq!(store.get().query.get("b"), Some(&Value::Number(1.0)));
        assert!(!store.side_effects_active());

        store.goto("/c");
        assert_eq!(store.serialize(), "/c");
    }

    #[test]
    fn test_goto_colon_segment_stays_in_base() {
        let store = RouteStore::new(StoreConfig::headless().with_base("/app"));
        store.goto("tag:rust");
        assert_eq!(store.get().path, "/tag:rust");
        assert_eq!(store.href(), "/app/tag:rust");
    }

    #[test]
    fn test_subscribe_delivers_current_then_changes() {
        let store = RouteStore::new(StoreConfig::headless());
        let (seen, sub) = recording(&store);
        store.set(Route::new("/x"));
        store.set("/y");

        assert_eq!(*seen.borrow(), vec!["/", "/x", "/y"]);

        sub.unsubscribe();
        store.set("/z");
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_update_uses_current() {
        let store = RouteStore::new(StoreConfig::headless());
        store.update(|route| route.clone().with_query("page", 2));
        assert_eq!(store.serialize(), "/?page=2");
    }

    #[test]
    fn test_immediate_write_to_history() {
        let history = MemoryHistory::new("https://x.test/app/");
        let store = RouteStore::builder(StoreConfig::new().with_base("/app"))
            .history(history.clone())
            .build();

        store.goto("users?x=1");
        assert_eq!(history.location(), "https://x.test/app/users?x=1");
        assert_eq!(store.href(), "/app/users?x=1");

        // already in sync, no new entry
        store.goto("users?x=1");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_listener_setting_route_wins() {
        let store = RouteStore::new(StoreConfig::headless());
        let inner = store.clone();
        let _redirect = store.subscribe(move |route| {
            if route.path == "/old" {
                inner.set("/new");
            }
        });
        let (seen, _sub) = recording(&store);

        store.set("/old");
        assert_eq!(store.get().path, "/new");
        assert_eq!(seen.borrow().last().map(String::as_str), Some("/new"));
    }

    #[test]
    fn test_matches_current_route() {
        let store = RouteStore::new(StoreConfig::headless().with_href("http://localhost/users/3"));
        let params = store.matches("/users/:id", false);
        assert_eq!(params.and_then(|p| p.get("id").cloned().flatten()).as_deref(), Some("3"));
        assert!(store.matches("/posts", false).is_none());
    }

    #[test]
    fn test_clear_carried() {
        let location = Route::new("/a").with_query("q", 1).with_fragment("f", 1);
        let next = Route::new("/b").with_query("q", 1).with_fragment("g", 2);
        let cleared = clear_carried(next, &location);
        assert!(cleared.query.is_empty());
        assert_eq!(cleared.fragment.get("g"), Some(&Value::Number(2.0)));

        let same_path = Route::new("/a").with_query("q", 1);
        assert_eq!(clear_carried(same_path.clone(), &location), same_path);
    }

    #[test]
    fn test_pending_write_dropped_when_back_in_sync() {
        let history = MemoryHistory::new("https://x.test/a");
        let timer = ManualTimer::new();
        let store = RouteStore::builder(StoreConfig::new().with_delay_ms(500))
            .history(history.clone())
            .timer(timer.clone())
            .build();

        store.set("/b");
        assert!(store.has_pending_write());
        store.set("/a");
        assert!(!store.has_pending_write());

        timer.run_all();
        assert_eq!(history.len(), 1);
    }
}
