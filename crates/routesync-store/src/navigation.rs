//! Anchor click interception.
//!
//! A click becomes an in-app navigation only when every check passes; the
//! first failing check is reported as an [`IgnoreReason`].

use std::fmt;

use routesync_core::{NavigationMode, RouteParser};
use url::Url;

/// Keyboard modifiers held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.meta || self.alt || self.shift
    }
}

/// Read access to the anchor a click landed on.
pub trait LinkElement {
    /// The link target, resolved or raw. `None` when the attribute is missing.
    fn href(&self) -> Option<String>;

    /// The `target` attribute.
    fn target(&self) -> Option<String>;

    /// Whether a `download` attribute is present.
    fn has_download(&self) -> bool;

    /// The `rel` attribute.
    fn rel(&self) -> Option<String>;

    /// Whether the element or an ancestor matches `selector`.
    fn closest(&self, selector: &str) -> bool;
}

/// Plain anchor description, used outside the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub href: Option<String>,
    pub target: Option<String>,
    pub download: bool,
    pub rel: Option<String>,
    /// Selectors this anchor sits inside.
    pub scopes: Vec<String>,
}

impl Anchor {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_download(mut self) -> Self {
        self.download = true;
        self
    }

    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = Some(rel.into());
        self
    }

    /// Place the anchor inside an element matching `selector`.
    pub fn within(mut self, selector: impl Into<String>) -> Self {
        self.scopes.push(selector.into());
        self
    }
}

impl LinkElement for Anchor {
    fn href(&self) -> Option<String> {
        self.href.clone()
    }

    fn target(&self) -> Option<String> {
        self.target.clone()
    }

    fn has_download(&self) -> bool {
        self.download
    }

    fn rel(&self) -> Option<String> {
        self.rel.clone()
    }

    fn closest(&self, selector: &str) -> bool {
        self.scopes.iter().any(|s| s == selector)
    }
}

/// A click as seen by the document-level listener.
#[derive(Debug, Clone)]
pub struct ClickEvent<L = Anchor> {
    /// Mouse button; 0 is the primary button.
    pub button: i16,
    pub modifiers: Modifiers,
    pub default_prevented: bool,
    /// Nearest enclosing anchor of the click target.
    pub anchor: Option<L>,
}

impl<L> ClickEvent<L> {
    /// Plain primary-button click on `anchor`.
    pub fn primary(anchor: L) -> Self {
        Self {
            button: 0,
            modifiers: Modifiers::default(),
            default_prevented: false,
            anchor: Some(anchor),
        }
    }

    /// Primary-button click outside any anchor.
    pub fn without_anchor() -> Self {
        Self {
            button: 0,
            modifiers: Modifiers::default(),
            default_prevented: false,
            anchor: None,
        }
    }

    pub fn with_button(mut self, button: i16) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn prevented(mut self) -> Self {
        self.default_prevented = true;
        self
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickDecision {
    /// Handle in-app; carries the absolute target URL.
    Navigate(String),
    /// Leave the click to the browser.
    Ignore(IgnoreReason),
}

impl ClickDecision {
    pub fn is_navigate(&self) -> bool {
        matches!(self, ClickDecision::Navigate(_))
    }
}

/// Why a click was left to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Disabled,
    Modified,
    SecondaryButton,
    AlreadyHandled,
    NoAnchor,
    NoHref,
    OutOfScope,
    ExplicitTarget,
    Download,
    External,
    SpecialScheme,
    InvalidHref,
    CrossOrigin,
    OutsideBase,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnoreReason::Disabled => "interception disabled",
            IgnoreReason::Modified => "modifier key held",
            IgnoreReason::SecondaryButton => "not the primary button",
            IgnoreReason::AlreadyHandled => "default already prevented",
            IgnoreReason::NoAnchor => "no anchor",
            IgnoreReason::NoHref => "anchor without href",
            IgnoreReason::OutOfScope => "anchor outside scope",
            IgnoreReason::ExplicitTarget => "explicit target",
            IgnoreReason::Download => "download link",
            IgnoreReason::External => "rel=external",
            IgnoreReason::SpecialScheme => "mailto or tel link",
            IgnoreReason::InvalidHref => "unresolvable href",
            IgnoreReason::CrossOrigin => "different origin",
            IgnoreReason::OutsideBase => "outside base",
        }
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether a click should be handled in-app.
///
/// `location` is the current document URL; the link is resolved against it.
pub fn classify<L: LinkElement>(
    event: &ClickEvent<L>,
    mode: &NavigationMode,
    location: &Url,
    parser: &RouteParser,
) -> ClickDecision {
    use IgnoreReason::*;

    if !mode.is_enabled() {
        return ClickDecision::Ignore(Disabled);
    }
    if event.modifiers.any() {
        return ClickDecision::Ignore(Modified);
    }
    if event.button != 0 {
        return ClickDecision::Ignore(SecondaryButton);
    }
    if event.default_prevented {
        return ClickDecision::Ignore(AlreadyHandled);
    }

    let Some(anchor) = &event.anchor else {
        return ClickDecision::Ignore(NoAnchor);
    };
    let Some(href) = anchor.href().filter(|h| !h.is_empty()) else {
        return ClickDecision::Ignore(NoHref);
    };
    if let Some(scope) = mode.scope() {
        if !anchor.closest(scope) {
            return ClickDecision::Ignore(OutOfScope);
        }
    }
    if anchor.target().is_some_and(|t| !t.is_empty()) {
        return ClickDecision::Ignore(ExplicitTarget);
    }
    if anchor.has_download() {
        return ClickDecision::Ignore(Download);
    }
    if anchor
        .rel()
        .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("external")))
    {
        return ClickDecision::Ignore(External);
    }

    let url = match location.join(&href) {
        Ok(url) => url,
        Err(_) => return ClickDecision::Ignore(InvalidHref),
    };
    if matches!(url.scheme(), "mailto" | "tel") {
        return ClickDecision::Ignore(SpecialScheme);
    }
    if url.origin() != location.origin() {
        return ClickDecision::Ignore(CrossOrigin);
    }
    if !parser.in_base(url.path()) {
        return ClickDecision::Ignore(OutsideBase);
    }

    ClickDecision::Navigate(url.into())
}
