//! Browser history abstraction.

use std::cell::RefCell;
use std::rc::Rc;

use url::Url;

/// The part of the browser history the store reads and writes.
pub trait History {
    /// Absolute URL of the current entry.
    fn location(&self) -> String;

    /// Push a new entry without reloading. `url` may be relative to the
    /// current location.
    fn push(&self, url: &str);

    /// ASCII origin of the current location (`scheme://host[:port]`).
    fn origin(&self) -> String {
        Url::parse(&self.location())
            .map(|url| url.origin().ascii_serialization())
            .unwrap_or_default()
    }

    /// False inside an embedded frame, where the store leaves the address
    /// bar alone.
    fn is_top_level(&self) -> bool {
        true
    }
}

/// In-memory history stack for headless use and tests.
///
/// Clones share the same stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    state: Rc<RefCell<MemoryState>>,
}

#[derive(Debug)]
struct MemoryState {
    entries: Vec<String>,
    index: usize,
    top_level: bool,
}

impl MemoryHistory {
    /// Create a history whose only entry is `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(MemoryState {
                entries: vec![initial.into()],
                index: 0,
                top_level: true,
            })),
        }
    }

    /// Create a history that reports itself as an embedded frame.
    pub fn embedded(initial: impl Into<String>) -> Self {
        let history = Self::new(initial);
        history.state.borrow_mut().top_level = false;
        history
    }

    /// Step back one entry, returning the new location.
    pub fn back(&self) -> Option<String> {
        let mut state = self.state.borrow_mut();
        if state.index == 0 {
            return None;
        }
        state.index -= 1;
        Some(state.entries[state.index].clone())
    }

    /// Step forward one entry, returning the new location.
    pub fn forward(&self) -> Option<String> {
        let mut state = self.state.borrow_mut();
        if state.index + 1 >= state.entries.len() {
            return None;
        }
        state.index += 1;
        Some(state.entries[state.index].clone())
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.state.borrow().entries.clone()
    }

    /// Number of entries on the stack.
    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }

    /// Index of the current entry.
    pub fn index(&self) -> usize {
        self.state.borrow().index
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        let state = self.state.borrow();
        state.entries[state.index].clone()
    }

    fn push(&self, url: &str) {
        let mut state = self.state.borrow_mut();
        let resolved = Url::parse(&state.entries[state.index])
            .and_then(|current| current.join(url))
            .map(String::from)
            .unwrap_or_else(|_| url.to_string());

        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(resolved);
        state.index = keep;
    }

    fn is_top_level(&self) -> bool {
        self.state.borrow().top_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_resolves_relative() {
        let history = MemoryHistory::new("https://x.test/app");
        history.push("/app/users?x=1");
        assert_eq!(history.location(), "https://x.test/app/users?x=1");
        assert_eq!(history.len(), 2);
        assert_eq!(history.origin(), "https://x.test");
    }

    #[test]
    fn test_back_and_forward() {
        let history = MemoryHistory::new("https://x.test/");
        history.push("/a");
        history.push("/b");

        assert_eq!(history.back().as_deref(), Some("https://x.test/a"));
        assert_eq!(history.back().as_deref(), Some("https://x.test/"));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward().as_deref(), Some("https://x.test/a"));
        assert_eq!(history.index(), 1);
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let history = MemoryHistory::new("https://x.test/");
        history.push("/a");
        history.push("/b");
        history.back();
        history.push("/c");

        assert_eq!(
            history.entries(),
            vec!["https://x.test/", "https://x.test/a", "https://x.test/c"]
        );
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn test_embedded_is_not_top_level() {
        assert!(MemoryHistory::new("https://x.test/").is_top_level());
        assert!(!MemoryHistory::embedded("https://x.test/").is_top_level());
    }
}
