//! Focus State - which element currently holds focus.
//!
//! A single signal tracks the focused element index (-1 means none).
//! Editable widgets register [`FocusCallbacks`] so focus transitions drive
//! their change-detection and event emission.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{Signal, signal};

/// Focus transition callbacks registered by a widget.
#[derive(Default)]
pub struct FocusCallbacks {
    pub on_focus: Option<Rc<dyn Fn()>>,
    pub on_blur: Option<Rc<dyn Fn()>>,
}

thread_local! {
    /// Currently focused element index (-1 = none).
    static FOCUSED_INDEX: Signal<i32> = signal(-1);

    /// Per-element focus callbacks.
    static CALLBACKS: RefCell<HashMap<usize, FocusCallbacks>> = RefCell::new(HashMap::new());
}

/// Get the currently focused element index, if any.
pub fn get_focused_index() -> Option<usize> {
    FOCUSED_INDEX.with(|focused| {
        let index = focused.get();
        (index >= 0).then_some(index as usize)
    })
}

/// Check whether any element holds focus.
pub fn has_focus() -> bool {
    get_focused_index().is_some()
}

/// Check whether a specific element holds focus.
pub fn is_focused(index: usize) -> bool {
    get_focused_index() == Some(index)
}

/// Register focus callbacks for an element.
/// Returns a cleanup function to unregister.
pub fn register_callbacks(index: usize, callbacks: FocusCallbacks) -> impl FnOnce() {
    CALLBACKS.with(|map| {
        map.borrow_mut().insert(index, callbacks);
    });

    move || {
        CALLBACKS.with(|map| {
            map.borrow_mut().remove(&index);
        });
    }
}

/// Move focus to an element.
///
/// Blurs the previous holder first (its on_blur runs before the new
/// on_focus). No-op when the element already holds focus.
pub fn focus(index: usize) {
    if is_focused(index) {
        return;
    }
    blur();

    FOCUSED_INDEX.with(|focused| focused.set(index as i32));
    tracing::trace!(index, "focus gained");

    let on_focus = CALLBACKS.with(|map| {
        map.borrow()
            .get(&index)
            .and_then(|callbacks| callbacks.on_focus.clone())
    });
    if let Some(on_focus) = on_focus {
        on_focus();
    }
}

/// Release focus from whatever holds it. No-op when nothing is focused.
pub fn blur() {
    let Some(previous) = get_focused_index() else {
        return;
    };
    FOCUSED_INDEX.with(|focused| focused.set(-1));
    tracing::trace!(index = previous, "focus lost");

    let on_blur = CALLBACKS.with(|map| {
        map.borrow()
            .get(&previous)
            .and_then(|callbacks| callbacks.on_blur.clone())
    });
    if let Some(on_blur) = on_blur {
        on_blur();
    }
}

/// Silently drop focus held by a released element. No callbacks run; the
/// element is gone.
pub(crate) fn clear_if_focused(index: usize) {
    if is_focused(index) {
        FOCUSED_INDEX.with(|focused| focused.set(-1));
    }
    CALLBACKS.with(|map| {
        map.borrow_mut().remove(&index);
    });
}

/// Reset all focus state. For tests.
pub fn reset_focus_state() {
    FOCUSED_INDEX.with(|focused| focused.set(-1));
    CALLBACKS.with(|map| map.borrow_mut().clear());
}
