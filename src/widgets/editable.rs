//! Editable State - the internal value store shared by input and textarea.
//!
//! The value lives in a per-element signal; the `value` attribute is a
//! mirror kept current through the internal reflect path. Keystroke editing
//! is implemented once here (cursor, selection, maxlength) and both editable
//! widgets drive it, the textarea with newline support.

use std::cell::RefCell;
use std::collections::HashMap;

use spark_signals::{Signal, signal};

use crate::engine::attributes;
use crate::state::keyboard::KeyboardEvent;
use crate::types::EditOperation;

thread_local! {
    static VALUES: RefCell<HashMap<usize, Signal<String>>> = RefCell::new(HashMap::new());
    static CURSORS: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());
    static SELECTIONS: RefCell<HashMap<usize, (usize, usize)>> = RefCell::new(HashMap::new());
    static CUSTOM_VALIDITY: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());
    static CHANGE_BASELINE: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Registration
// =============================================================================

/// Register editable state for an element. Called by widget constructors;
/// resets any state left at the index.
pub(crate) fn register(index: usize) -> Signal<String> {
    let value = signal(String::new());
    VALUES.with(|map| {
        map.borrow_mut().insert(index, value.clone());
    });
    CURSORS.with(|map| {
        map.borrow_mut().insert(index, 0);
    });
    SELECTIONS.with(|map| {
        map.borrow_mut().remove(&index);
    });
    CUSTOM_VALIDITY.with(|map| {
        map.borrow_mut().remove(&index);
    });
    CHANGE_BASELINE.with(|map| {
        map.borrow_mut().remove(&index);
    });
    value
}

pub(crate) fn clear(index: usize) {
    VALUES.with(|map| {
        map.borrow_mut().remove(&index);
    });
    CURSORS.with(|map| {
        map.borrow_mut().remove(&index);
    });
    SELECTIONS.with(|map| {
        map.borrow_mut().remove(&index);
    });
    CUSTOM_VALIDITY.with(|map| {
        map.borrow_mut().remove(&index);
    });
    CHANGE_BASELINE.with(|map| {
        map.borrow_mut().remove(&index);
    });
}

// =============================================================================
// Value
// =============================================================================

pub(crate) fn value_signal(index: usize) -> Option<Signal<String>> {
    VALUES.with(|map| map.borrow().get(&index).cloned())
}

/// Current internal value (empty when unregistered).
pub fn value(index: usize) -> String {
    value_signal(index).map(|signal| signal.get()).unwrap_or_default()
}

/// Set the internal value and mirror it into the `value` attribute through
/// the internal write path. Never dispatches attribute-change hooks.
pub(crate) fn set_value_internal(index: usize, new_value: &str) {
    if let Some(signal) = value_signal(index) {
        signal.set(new_value.to_string());
    }
    attributes::reflect(index, "value", new_value);
    let len = new_value.chars().count();
    set_cursor(index, cursor(index).min(len));
    clamp_selection(index, len);
}

/// Re-fit a stored selection to a new value length. A range collapsed by
/// the clamp is dropped.
fn clamp_selection(index: usize, len: usize) {
    SELECTIONS.with(|map| {
        let mut map = map.borrow_mut();
        if let Some((start, end)) = map.get(&index).copied() {
            let start = start.min(len);
            let end = end.min(len);
            if start == end {
                map.remove(&index);
            } else {
                map.insert(index, (start, end));
            }
        }
    });
}

/// Maximum character count from the `maxlength` attribute, if present and
/// well-formed.
pub(crate) fn max_length(index: usize) -> Option<usize> {
    attributes::parse_usize(index, "maxlength")
}

/// Truncate a value to an element's maxlength.
pub(crate) fn truncate(index: usize, raw: &str) -> String {
    match max_length(index) {
        Some(max) => raw.chars().take(max).collect(),
        None => raw.to_string(),
    }
}

// =============================================================================
// Cursor / Selection
// =============================================================================

pub fn cursor(index: usize) -> usize {
    CURSORS.with(|map| map.borrow().get(&index).copied().unwrap_or(0))
}

pub(crate) fn set_cursor(index: usize, position: usize) {
    CURSORS.with(|map| {
        map.borrow_mut().insert(index, position);
    });
}

/// Select a character range. Bounds are clamped to the value length.
pub fn set_selection(index: usize, start: usize, end: usize) {
    let len = value(index).chars().count();
    let start = start.min(len);
    let end = end.min(len).max(start);
    SELECTIONS.with(|map| {
        map.borrow_mut().insert(index, (start, end));
    });
    set_cursor(index, end);
}

pub fn selection(index: usize) -> Option<(usize, usize)> {
    SELECTIONS.with(|map| map.borrow().get(&index).copied())
}

pub(crate) fn clear_selection(index: usize) {
    SELECTIONS.with(|map| {
        map.borrow_mut().remove(&index);
    });
}

// =============================================================================
// Custom Validity
// =============================================================================

/// Set a custom validity message. An empty message clears it.
pub(crate) fn set_custom_validity(index: usize, message: &str) {
    CUSTOM_VALIDITY.with(|map| {
        let mut map = map.borrow_mut();
        if message.is_empty() {
            map.remove(&index);
        } else {
            map.insert(index, message.to_string());
        }
    });
}

pub(crate) fn custom_validity(index: usize) -> Option<String> {
    CUSTOM_VALIDITY.with(|map| map.borrow().get(&index).cloned())
}

// =============================================================================
// Change Detection
// =============================================================================

/// Record the value at focus gain; focus loss compares against it.
pub(crate) fn mark_baseline(index: usize) {
    let current = value(index);
    CHANGE_BASELINE.with(|map| {
        map.borrow_mut().insert(index, current);
    });
}

pub(crate) fn changed_since_baseline(index: usize) -> bool {
    let baseline = CHANGE_BASELINE.with(|map| map.borrow().get(&index).cloned());
    baseline.is_some_and(|baseline| baseline != value(index))
}

// =============================================================================
// Keystroke Editing
// =============================================================================

/// Outcome of applying a keystroke to an editable element.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The value changed; an input event should be emitted.
    Edited {
        value: String,
        operation: EditOperation,
    },
    /// The key was handled without changing the value (navigation, or an
    /// insert refused at maxlength).
    Consumed,
    /// Not an editing key.
    Ignored,
}

/// Apply a keystroke to an element's value. Pure with respect to events:
/// callers emit `ui-input` only on [`EditOutcome::Edited`].
pub(crate) fn apply_keystroke(
    index: usize,
    event: &KeyboardEvent,
    multiline: bool,
) -> EditOutcome {
    if !event.is_press() {
        return EditOutcome::Ignored;
    }

    let chars: Vec<char> = value(index).chars().collect();
    let position = cursor(index).min(chars.len());

    match event.key.as_str() {
        "ArrowLeft" => {
            clear_selection(index);
            set_cursor(index, position.saturating_sub(1));
            EditOutcome::Consumed
        }
        "ArrowRight" => {
            clear_selection(index);
            set_cursor(index, (position + 1).min(chars.len()));
            EditOutcome::Consumed
        }
        "Home" => {
            clear_selection(index);
            set_cursor(index, 0);
            EditOutcome::Consumed
        }
        "End" => {
            clear_selection(index);
            set_cursor(index, chars.len());
            EditOutcome::Consumed
        }
        "Backspace" => {
            if let Some((start, end)) = take_selection(index) {
                return delete_range(index, &chars, start, end, EditOperation::DeleteBackward);
            }
            if position == 0 {
                return EditOutcome::Consumed;
            }
            delete_range(index, &chars, position - 1, position, EditOperation::DeleteBackward)
        }
        "Delete" => {
            if let Some((start, end)) = take_selection(index) {
                return delete_range(index, &chars, start, end, EditOperation::DeleteForward);
            }
            if position >= chars.len() {
                return EditOutcome::Consumed;
            }
            delete_range(index, &chars, position, position + 1, EditOperation::DeleteForward)
        }
        "Enter" if multiline => insert_text(index, &chars, position, "\n"),
        key => {
            // Printable characters arrive as single-char keys
            let mut printable = key.chars();
            match (printable.next(), printable.next()) {
                (Some(ch), None) if !event.modifiers.ctrl && !event.modifiers.meta => {
                    insert_text(index, &chars, position, &ch.to_string())
                }
                _ => EditOutcome::Ignored,
            }
        }
    }
}

fn take_selection(index: usize) -> Option<(usize, usize)> {
    let len = value(index).chars().count();
    let range = selection(index)
        .map(|(start, end)| (start.min(len), end.min(len)))
        .filter(|(start, end)| start != end);
    clear_selection(index);
    range
}

fn delete_range(
    index: usize,
    chars: &[char],
    start: usize,
    end: usize,
    operation: EditOperation,
) -> EditOutcome {
    let mut next: String = chars[..start].iter().collect();
    next.extend(&chars[end.min(chars.len())..]);
    set_value_internal_at(index, &next, start);
    EditOutcome::Edited {
        value: next,
        operation,
    }
}

fn insert_text(index: usize, chars: &[char], position: usize, text: &str) -> EditOutcome {
    // Replace an active selection, if any; clamp against stale ranges
    let range = selection(index)
        .map(|(start, end)| (start.min(chars.len()), end.min(chars.len())))
        .filter(|(start, end)| start != end);
    let (start, end) = range.unwrap_or((position, position));
    let kept = chars.len() - (end - start);

    if let Some(max) = max_length(index) {
        if kept + text.chars().count() > max {
            // At the limit: key is consumed, value and selection unchanged,
            // no event
            return EditOutcome::Consumed;
        }
    }
    clear_selection(index);

    let mut next: String = chars[..start].iter().collect();
    next.push_str(text);
    next.extend(&chars[end.min(chars.len())..]);
    set_value_internal_at(index, &next, start + text.chars().count());
    EditOutcome::Edited {
        value: next,
        operation: EditOperation::Insert,
    }
}

fn set_value_internal_at(index: usize, new_value: &str, cursor_position: usize) {
    if let Some(signal) = value_signal(index) {
        signal.set(new_value.to_string());
    }
    attributes::reflect(index, "value", new_value);
    set_cursor(index, cursor_position);
}

/// Reset all editable state. For tests.
pub fn reset_editable_state() {
    VALUES.with(|map| map.borrow_mut().clear());
    CURSORS.with(|map| map.borrow_mut().clear());
    SELECTIONS.with(|map| map.borrow_mut().clear());
    CUSTOM_VALIDITY.with(|map| map.borrow_mut().clear());
    CHANGE_BASELINE.with(|map| map.borrow_mut().clear());
}
