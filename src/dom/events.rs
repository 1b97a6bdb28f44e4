//! Custom Events - synchronous dispatch with ancestor propagation.
//!
//! Widgets emit named events (`ui-click`, `ui-input`, ...) with a structured
//! detail payload. Dispatch is synchronous: by the time the emitting call
//! returns, every listener has run. Composed events also walk the parent
//! chain recorded in the instance registry, so a listener on an ancestor
//! observes events from its descendants.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;

use crate::types::{ButtonKind, ButtonVariant, EditOperation};

// =============================================================================
// Detail Payloads
// =============================================================================

/// Structured detail carried by a [`UiEvent`].
///
/// Serializes with a `type` discriminant so payloads have a stable wire
/// shape for hosts that forward events as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventDetail {
    /// Button activation.
    Click {
        variant: ButtonVariant,
        kind: ButtonKind,
    },
    /// Per-edit value change.
    Input {
        value: String,
        operation: EditOperation,
    },
    /// Committed value change (focus loss after edits).
    Change { value: String },
    /// Focus gained.
    Focus { value: String },
    /// Focus lost.
    Blur { value: String },
}

// =============================================================================
// UiEvent
// =============================================================================

/// A named custom event.
#[derive(Debug)]
pub struct UiEvent {
    pub name: String,
    pub detail: EventDetail,
    /// Whether `prevent_default` has an effect.
    pub cancelable: bool,
    /// Whether the event propagates up the parent chain.
    pub composed: bool,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl UiEvent {
    /// Create an event. Widget events are composed and not cancelable by
    /// default.
    pub fn new(name: &str, detail: EventDetail) -> Self {
        Self {
            name: name.to_string(),
            detail,
            cancelable: false,
            composed: true,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Cancel the default action. No-op on a non-cancelable event.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop propagation to ancestor listeners.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

// =============================================================================
// Native Event (the triggering interaction)
// =============================================================================

/// The host interaction that triggered a widget operation.
///
/// Suppressed interactions call both [`prevent_default`](Self::prevent_default)
/// and [`stop_propagation`](Self::stop_propagation) on it.
#[derive(Debug, Default)]
pub struct NativeEvent {
    default_prevented: bool,
    propagation_stopped: bool,
}

impl NativeEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

// =============================================================================
// Listener Registry
// =============================================================================

type Listener = Rc<dyn Fn(&UiEvent)>;

struct ListenerEntry {
    id: usize,
    name: String,
    callback: Listener,
}

thread_local! {
    static LISTENERS: RefCell<HashMap<usize, Vec<ListenerEntry>>> = RefCell::new(HashMap::new());
    static LISTENER_COUNTER: Cell<usize> = const { Cell::new(0) };
}

/// Listen for a named event on an element. Returns a cleanup function.
pub fn listen(index: usize, name: &str, callback: impl Fn(&UiEvent) + 'static) -> impl FnOnce() {
    let id = LISTENER_COUNTER.with(|counter| {
        let id = counter.get();
        counter.set(id + 1);
        id
    });
    LISTENERS.with(|map| {
        map.borrow_mut().entry(index).or_default().push(ListenerEntry {
            id,
            name: name.to_string(),
            callback: Rc::new(callback),
        });
    });

    move || {
        LISTENERS.with(|map| {
            if let Some(entries) = map.borrow_mut().get_mut(&index) {
                entries.retain(|entry| entry.id != id);
            }
        });
    }
}

/// Number of listeners registered on an element.
pub fn listener_count(index: usize) -> usize {
    LISTENERS.with(|map| map.borrow().get(&index).map_or(0, Vec::len))
}

/// Dispatch an event from an element, synchronously.
///
/// Listeners on the element run first; composed events then walk the parent
/// chain until the root or until propagation is stopped. Returns false when
/// a listener canceled a cancelable event.
pub fn dispatch(index: usize, event: &UiEvent) -> bool {
    let mut current = Some(index);
    while let Some(target) = current {
        let callbacks: Vec<Listener> = LISTENERS.with(|map| {
            map.borrow()
                .get(&target)
                .map(|entries| {
                    entries
                        .iter()
                        .filter(|entry| entry.name == event.name)
                        .map(|entry| entry.callback.clone())
                        .collect()
                })
                .unwrap_or_default()
        });
        for callback in callbacks {
            callback(event);
        }
        if !event.composed || event.propagation_stopped() {
            break;
        }
        current = crate::engine::registry::get_parent_index(target);
    }
    !event.default_prevented()
}

pub(crate) fn cleanup_index(index: usize) {
    LISTENERS.with(|map| {
        map.borrow_mut().remove(&index);
    });
}

pub(crate) fn reset() {
    LISTENERS.with(|map| map.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::registry::{
        allocate_index, pop_parent_context, push_parent_context, reset_registry,
    };

    fn setup() {
        reset_registry();
    }

    #[test]
    fn test_dispatch_is_synchronous() {
        setup();

        let index = allocate_index(None);
        let received = Rc::new(RefCell::new(Vec::new()));
        let received_clone = received.clone();
        let _cleanup = listen(index, "ui-input", move |event| {
            if let EventDetail::Input { value, .. } = &event.detail {
                received_clone.borrow_mut().push(value.clone());
            }
        });

        let event = UiEvent::new(
            "ui-input",
            EventDetail::Input {
                value: "a".to_string(),
                operation: EditOperation::Insert,
            },
        );
        dispatch(index, &event);
        // Listener has already run by the time dispatch returns
        assert_eq!(*received.borrow(), vec!["a".to_string()]);
    }

    #[test]
    fn test_name_filtering() {
        setup();

        let index = allocate_index(None);
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = hits.clone();
        let _cleanup = listen(index, "ui-change", move |_| {
            hits_clone.set(hits_clone.get() + 1);
        });

        let event = UiEvent::new(
            "ui-input",
            EventDetail::Input {
                value: String::new(),
                operation: EditOperation::Insert,
            },
        );
        dispatch(index, &event);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_composed_event_reaches_ancestors() {
        setup();

        let parent = allocate_index(None);
        push_parent_context(parent);
        let child = allocate_index(None);
        pop_parent_context();

        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = hits.clone();
        let _cleanup = listen(parent, "ui-click", move |_| {
            hits_clone.set(hits_clone.get() + 1);
        });

        let event = UiEvent::new(
            "ui-click",
            EventDetail::Click {
                variant: ButtonVariant::Primary,
                kind: ButtonKind::Button,
            },
        );
        dispatch(child, &event);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_stop_propagation_halts_walk() {
        setup();

        let parent = allocate_index(None);
        push_parent_context(parent);
        let child = allocate_index(None);
        pop_parent_context();

        let parent_hits = Rc::new(Cell::new(0u32));
        let parent_hits_clone = parent_hits.clone();
        let _parent_cleanup = listen(parent, "ui-click", move |_| {
            parent_hits_clone.set(parent_hits_clone.get() + 1);
        });
        let _child_cleanup = listen(child, "ui-click", |event| {
            event.stop_propagation();
        });

        let event = UiEvent::new(
            "ui-click",
            EventDetail::Click {
                variant: ButtonVariant::Primary,
                kind: ButtonKind::Button,
            },
        );
        dispatch(child, &event);
        assert_eq!(parent_hits.get(), 0);
    }

    #[test]
    fn test_cleanup_removes_listener() {
        setup();

        let index = allocate_index(None);
        let cleanup = listen(index, "ui-click", |_| {});
        assert_eq!(listener_count(index), 1);
        cleanup();
        assert_eq!(listener_count(index), 0);
    }

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let event = UiEvent::new(
            "ui-click",
            EventDetail::Click {
                variant: ButtonVariant::Primary,
                kind: ButtonKind::Button,
            },
        );
        event.prevent_default();
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_detail_serializes_with_type_tag() {
        let detail = EventDetail::Input {
            value: "hi".to_string(),
            operation: EditOperation::DeleteBackward,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["type"], "input");
        assert_eq!(json["value"], "hi");
        assert_eq!(json["operation"], "delete-backward");
    }
}
