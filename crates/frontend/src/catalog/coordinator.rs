//! Coordinates the facet widgets: at most one dropdown open at a time,
//! plus a broadcast reset counter.
//!
//! Facet widgets are otherwise independent and have no shared owner, so
//! clearing all filters atomically goes through the reset counter: every
//! widget watches it and clears its own local selection when it changes.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Selectors exempt from the outside-click close: the dropdown itself, the
/// product cards and the sort control.
const OUTSIDE_CLICK_EXEMPT: &str = ".filter-dropdown, .product-card, .sort-control";

pub(crate) fn toggled(open: Option<&str>, name: &str) -> Option<String> {
    if open == Some(name) {
        None
    } else {
        Some(name.to_string())
    }
}

#[derive(Clone, Copy)]
pub struct FilterCoordinator {
    /// Name of the currently open dropdown, if any.
    pub open: RwSignal<Option<String>>,
    /// Monotonic reset counter; carries no payload, observers only care
    /// that it changed.
    pub reset_epoch: RwSignal<u64>,
}

impl Default for FilterCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterCoordinator {
    pub fn new() -> Self {
        Self {
            open: RwSignal::new(None),
            reset_epoch: RwSignal::new(0),
        }
    }

    /// Close `name` if it is the open dropdown, otherwise open it (which
    /// implicitly closes any other).
    pub fn toggle(&self, name: &str) {
        self.open
            .update(|open| *open = toggled(open.as_deref(), name));
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.open.with(|open| open.as_deref() == Some(name))
    }

    pub fn close_all(&self) {
        self.open.set(None);
    }

    /// Broadcast a reset: every facet widget and the search box clears its
    /// local selection on observing the change.
    pub fn reset(&self) {
        self.reset_epoch.update(|epoch| *epoch += 1);
    }

    /// Install the document-level listener that closes the open dropdown on
    /// any click outside of it (product cards and the sort control exempt).
    pub fn install_outside_click(&self) {
        let open = self.open;
        let closure = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
            if open.with_untracked(|o| o.is_none()) {
                return;
            }
            let inside = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .and_then(|el| el.closest(OUTSIDE_CLICK_EXEMPT).ok().flatten())
                .is_some();
            if !inside {
                open.set(None);
            }
        }) as Box<dyn FnMut(_)>);

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let _ = document
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        }
        closure.forget(); // lives for the page session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_semantics() {
        assert_eq!(toggled(None, "material"), Some("material".to_string()));
        // toggling the open dropdown closes it
        assert_eq!(toggled(Some("material"), "material"), None);
        // toggling another replaces the open one
        assert_eq!(
            toggled(Some("material"), "collection"),
            Some("collection".to_string())
        );
    }

    #[test]
    fn test_coordinator_single_open() {
        let coordinator = FilterCoordinator::new();
        coordinator.toggle("material");
        assert!(coordinator.is_open("material"));
        coordinator.toggle("collection");
        assert!(coordinator.is_open("collection"));
        assert!(!coordinator.is_open("material"));
        coordinator.close_all();
        assert!(coordinator.open.get_untracked().is_none());
    }

    #[test]
    fn test_reset_is_monotonic() {
        let coordinator = FilterCoordinator::new();
        let before = coordinator.reset_epoch.get_untracked();
        coordinator.reset();
        coordinator.reset();
        assert_eq!(coordinator.reset_epoch.get_untracked(), before + 2);
    }
}
