//! Keyboard State - host key events routed to the focused element.
//!
//! The host feeds [`KeyboardEvent`]s in through [`dispatch_focused`]; the
//! focused element's handlers run synchronously and report whether they
//! consumed the event.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{Signal, signal};

use super::focus;

// =============================================================================
// Event Types
// =============================================================================

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    #[default]
    Press,
    Release,
}

/// A host keyboard event.
///
/// `key` follows the usual naming: single characters for printable keys,
/// names like "Enter", "Backspace", "ArrowLeft" for the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    pub fn with_modifiers(key: &str, modifiers: Modifiers) -> Self {
        Self {
            key: key.to_string(),
            modifiers,
            state: KeyState::Press,
        }
    }

    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }
}

// =============================================================================
// Handler Registry
// =============================================================================

/// A key handler. Returns true when the event was consumed.
pub type KeyHandler = Rc<dyn Fn(&KeyboardEvent) -> bool>;

thread_local! {
    static HANDLERS: RefCell<HashMap<usize, Vec<(usize, KeyHandler)>>> =
        RefCell::new(HashMap::new());
    static HANDLER_COUNTER: RefCell<usize> = const { RefCell::new(0) };

    /// Last dispatched event, for inspection.
    static LAST_EVENT: Signal<Option<KeyboardEvent>> = signal(None);
}

/// Register a key handler that runs while the element holds focus.
/// Returns a cleanup function.
pub fn on_focused(index: usize, handler: impl Fn(&KeyboardEvent) -> bool + 'static) -> impl FnOnce() {
    let id = HANDLER_COUNTER.with(|counter| {
        let mut counter = counter.borrow_mut();
        *counter += 1;
        *counter
    });
    HANDLERS.with(|map| {
        map.borrow_mut()
            .entry(index)
            .or_default()
            .push((id, Rc::new(handler)));
    });

    move || {
        HANDLERS.with(|map| {
            if let Some(handlers) = map.borrow_mut().get_mut(&index) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
            }
        });
    }
}

/// Dispatch a key event to the focused element's handlers.
/// Returns true when a handler consumed it.
pub fn dispatch_focused(event: &KeyboardEvent) -> bool {
    LAST_EVENT.with(|last| last.set(Some(event.clone())));

    let Some(index) = focus::get_focused_index() else {
        return false;
    };
    let handlers: Vec<KeyHandler> = HANDLERS.with(|map| {
        map.borrow()
            .get(&index)
            .map(|handlers| handlers.iter().map(|(_, handler)| handler.clone()).collect())
            .unwrap_or_default()
    });
    for handler in handlers {
        if handler(event) {
            return true;
        }
    }
    false
}

/// The last dispatched event, if any.
pub fn last_event() -> Option<KeyboardEvent> {
    LAST_EVENT.with(|last| last.get())
}

/// The last dispatched key name, if any.
pub fn last_key() -> Option<String> {
    last_event().map(|event| event.key)
}

pub(crate) fn cleanup_index(index: usize) {
    HANDLERS.with(|map| {
        map.borrow_mut().remove(&index);
    });
}

/// Reset all keyboard state. For tests.
pub fn reset_keyboard_state() {
    HANDLERS.with(|map| map.borrow_mut().clear());
    LAST_EVENT.with(|last| last.set(None));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::focus::{focus, reset_focus_state};
    use std::cell::Cell;

    fn setup() {
        reset_keyboard_state();
        reset_focus_state();
    }

    #[test]
    fn test_dispatch_routes_to_focused() {
        setup();

        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = hits.clone();
        let _cleanup = on_focused(1, move |_| {
            hits_clone.set(hits_clone.get() + 1);
            true
        });

        // Not focused yet
        assert!(!dispatch_focused(&KeyboardEvent::new("a")));
        assert_eq!(hits.get(), 0);

        focus(1);
        assert!(dispatch_focused(&KeyboardEvent::new("a")));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_unconsumed_event_returns_false() {
        setup();

        let _cleanup = on_focused(1, |_| false);
        focus(1);
        assert!(!dispatch_focused(&KeyboardEvent::new("Tab")));
    }

    #[test]
    fn test_last_event_tracking() {
        setup();

        assert_eq!(last_key(), None);
        dispatch_focused(&KeyboardEvent::new("Enter"));
        assert_eq!(last_key(), Some("Enter".to_string()));
    }

    #[test]
    fn test_cleanup_unregisters() {
        setup();

        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = hits.clone();
        let cleanup = on_focused(1, move |_| {
            hits_clone.set(hits_clone.get() + 1);
            true
        });

        focus(1);
        cleanup();
        dispatch_focused(&KeyboardEvent::new("a"));
        assert_eq!(hits.get(), 0);
    }
}
