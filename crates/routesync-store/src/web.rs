//! Browser bindings: `window.history`, timers and document listeners.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use routesync_core::StoreConfig;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, HtmlAnchorElement, MouseEvent, Window};

use crate::debounce::{Timer, TimerId};
use crate::history::History;
use crate::navigation::{ClickEvent, LinkElement, Modifiers};
use crate::store::RouteStore;

/// Browser binding errors.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("No browser window available")]
    NoWindow,

    #[error("Browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Js(format!("{:?}", value))
    }
}

/// [`History`] backed by `window.history` and `window.location`.
#[derive(Debug, Clone)]
pub struct BrowserHistory {
    window: Window,
}

impl BrowserHistory {
    pub fn new() -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        Ok(Self { window })
    }
}

impl History for BrowserHistory {
    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn push(&self, url: &str) {
        let result = self
            .window
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(url)));
        if let Err(err) = result {
            tracing::warn!(%url, error = ?err, "pushState failed");
        }
    }

    fn origin(&self) -> String {
        self.window.location().origin().unwrap_or_default()
    }

    fn is_top_level(&self) -> bool {
        match self.window.parent() {
            Ok(Some(parent)) => js_sys::Object::is(&parent, &self.window),
            _ => true,
        }
    }
}

/// [`Timer`] backed by `setTimeout`.
#[derive(Clone, Default)]
pub struct BrowserTimer {
    state: Rc<RefCell<TimerState>>,
}

#[derive(Default)]
struct TimerState {
    next_id: u64,
    active: HashMap<u64, Timeout>,
    fired: Vec<u64>,
}

impl BrowserTimer {
    pub fn new() -> Self {
        Self::default()
    }

    fn purge_fired(&self) {
        let mut state = self.state.borrow_mut();
        let fired = std::mem::take(&mut state.fired);
        for id in fired {
            state.active.remove(&id);
        }
    }
}

impl Timer for BrowserTimer {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        // fired timeouts are released here, never from inside their own callback
        self.purge_fired();

        let id = {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            state.next_id
        };

        let state = Rc::clone(&self.state);
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || {
            state.borrow_mut().fired.push(id);
            callback();
        });

        self.state.borrow_mut().active.insert(id, timeout);
        TimerId(id)
    }

    fn cancel(&self, id: TimerId) {
        self.purge_fired();
        // dropping a Timeout clears it
        self.state.borrow_mut().active.remove(&id.0);
    }
}

/// An `<a>` (or SVG anchor) element.
#[derive(Debug, Clone)]
pub struct DomAnchor(pub Element);

impl LinkElement for DomAnchor {
    fn href(&self) -> Option<String> {
        match self.0.dyn_ref::<HtmlAnchorElement>() {
            Some(anchor) => Some(anchor.href()).filter(|href| !href.is_empty()),
            None => self.0.get_attribute("href"),
        }
    }

    fn target(&self) -> Option<String> {
        self.0.get_attribute("target")
    }

    fn has_download(&self) -> bool {
        self.0.has_attribute("download")
    }

    fn rel(&self) -> Option<String> {
        self.0.get_attribute("rel")
    }

    fn closest(&self, selector: &str) -> bool {
        matches!(self.0.closest(selector), Ok(Some(_)))
    }
}

/// Convert a DOM click into a [`ClickEvent`].
pub fn click_event(event: &MouseEvent) -> ClickEvent<DomAnchor> {
    let anchor = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|element| element.closest("a").ok().flatten())
        .map(DomAnchor);

    ClickEvent {
        button: event.button(),
        modifiers: Modifiers {
            ctrl: event.ctrl_key(),
            meta: event.meta_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
        },
        default_prevented: event.default_prevented(),
        anchor,
    }
}

/// Listeners registered by [`attach`]. Dropping this removes them.
pub struct BrowserBindings {
    window: Window,
    popstate: Closure<dyn FnMut(Event)>,
    click: Option<Closure<dyn FnMut(MouseEvent)>>,
}

impl Drop for BrowserBindings {
    fn drop(&mut self) {
        let _ = self.window.remove_event_listener_with_callback(
            "popstate",
            self.popstate.as_ref().unchecked_ref(),
        );
        if let Some(click) = &self.click {
            let _ = self
                .window
                .remove_event_listener_with_callback("click", click.as_ref().unchecked_ref());
        }
    }
}

/// Wire `store` to the window's popstate and click events.
///
/// Nothing is registered when the store's side effects are inactive.
pub fn attach(store: &RouteStore) -> Result<Option<BrowserBindings>, WebError> {
    if !store.side_effects_active() {
        tracing::debug!("side effects inactive, no listeners attached");
        return Ok(None);
    }

    let window = web_sys::window().ok_or(WebError::NoWindow)?;

    let popstate = {
        let store = store.clone();
        Closure::<dyn FnMut(Event)>::new(move |_event: Event| store.handle_popstate())
    };
    window.add_event_listener_with_callback("popstate", popstate.as_ref().unchecked_ref())?;

    let click = if store.config().handle_navigation.is_enabled() {
        let store = store.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if store.handle_click(&click_event(&event)) {
                event.prevent_default();
            }
        });
        window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        Some(closure)
    } else {
        None
    };

    Ok(Some(BrowserBindings {
        window,
        popstate,
        click,
    }))
}

/// Create a store on the live browser history and attach its listeners.
pub fn browser_store(
    config: StoreConfig,
) -> Result<(RouteStore, Option<BrowserBindings>), WebError> {
    let store = RouteStore::builder(config)
        .history(BrowserHistory::new()?)
        .timer(BrowserTimer::new())
        .build();
    let bindings = attach(&store)?;
    Ok((store, bindings))
}
