//! Input - single-line editable text widget.
//!
//! The rendered control is always derived from the current attributes plus
//! the internal value. Typing goes through the shared editable store: every
//! accepted keystroke updates the value, mirrors it into the `value`
//! attribute (internal path, no hook dispatch) and emits `ui-input`
//! synchronously. Focus loss after edits emits `ui-change` before `ui-blur`.

use std::rc::Rc;

use crate::dom::events::{self, EventDetail, UiEvent};
use crate::dom::fragment::{self, Fragment};
use crate::engine::{Element, attributes, lifecycle, registry};
use crate::state::{focus, keyboard};
use crate::theme;
use crate::widgets::{editable, validation};

pub const TAG: &str = "ui-input";

pub const INPUT_EVENT: &str = "ui-input";
pub const CHANGE_EVENT: &str = "ui-change";
pub const FOCUS_EVENT: &str = "ui-focus";
pub const BLUR_EVENT: &str = "ui-blur";

pub const OBSERVED_ATTRIBUTES: &[&str] = &[
    "value",
    "label",
    "placeholder",
    "name",
    "prefix",
    "suffix",
    "disabled",
    "readonly",
    "required",
    "error",
    "minlength",
    "maxlength",
    "pattern",
    "tab-index",
];

// =============================================================================
// Construction
// =============================================================================

pub(crate) fn construct(index: usize) {
    let mut frag = Fragment::new("div");
    frag.set_attribute(Fragment::ROOT, "class", "input");

    let label = frag.append_child(Fragment::ROOT, "label");
    frag.set_part(label, "label");

    let row = frag.append_child(Fragment::ROOT, "div");
    let prefix = frag.append_child(row, "span");
    frag.set_part(prefix, "prefix");
    frag.set_hidden(prefix, true);
    let control = frag.append_child(row, "input");
    frag.set_part(control, "control");
    frag.set_attribute(control, "type", "text");
    frag.set_attribute(control, "tabindex", "0");
    let suffix = frag.append_child(row, "span");
    frag.set_part(suffix, "suffix");
    frag.set_hidden(suffix, true);

    theme::apply_control_defaults(&mut frag);
    fragment::install(index, frag);

    editable::register(index);
    attributes::set_observed(index, OBSERVED_ATTRIBUTES);

    lifecycle::register_hooks(
        index,
        lifecycle::LifecycleHooks {
            on_attach: Some(Rc::new(sync_all)),
            on_attribute_change: Some(Rc::new(|index, name, _, _| sync_attribute(index, name))),
            on_detach: None,
        },
    );

    let focus_cleanup = focus::register_callbacks(
        index,
        focus::FocusCallbacks {
            on_focus: Some(Rc::new(move || {
                editable::mark_baseline(index);
                let value = editable::value(index);
                let event = UiEvent::new(FOCUS_EVENT, EventDetail::Focus { value });
                events::dispatch(index, &event);
            })),
            on_blur: Some(Rc::new(move || {
                let value = editable::value(index);
                // Committed change first, then the blur notification
                if editable::changed_since_baseline(index) {
                    let change = UiEvent::new(
                        CHANGE_EVENT,
                        EventDetail::Change {
                            value: value.clone(),
                        },
                    );
                    events::dispatch(index, &change);
                }
                let blur = UiEvent::new(BLUR_EVENT, EventDetail::Blur { value });
                events::dispatch(index, &blur);
            })),
        },
    );

    let key_cleanup = keyboard::on_focused(index, move |event| handle_key(index, event));

    registry::on_destroy(index, move || {
        focus_cleanup();
        key_cleanup();
        editable::clear(index);
    });
}

fn handle_key(index: usize, event: &keyboard::KeyboardEvent) -> bool {
    // Suppressed: swallow the key with zero side effects
    if attributes::has(index, "disabled") || attributes::has(index, "readonly") {
        return true;
    }
    match editable::apply_keystroke(index, event, false) {
        editable::EditOutcome::Edited { value, operation } => {
            sync_value(index);
            let input = UiEvent::new(INPUT_EVENT, EventDetail::Input { value, operation });
            events::dispatch(index, &input);
            true
        }
        editable::EditOutcome::Consumed => true,
        editable::EditOutcome::Ignored => false,
    }
}

// =============================================================================
// Synchronization
// =============================================================================

fn sync_all(index: usize) {
    for name in OBSERVED_ATTRIBUTES {
        sync_attribute(index, name);
    }
}

fn sync_attribute(index: usize, name: &str) {
    match name {
        "value" => {
            // External value assignment: adopt it (truncated), no event
            let raw = attributes::get(index, "value").unwrap_or_default();
            let adopted = editable::truncate(index, &raw);
            editable::set_value_internal(index, &adopted);
            sync_value(index);
        }
        "label" => sync_optional_text(index, "label", "label"),
        "prefix" => sync_optional_text(index, "prefix", "prefix"),
        "suffix" => sync_optional_text(index, "suffix", "suffix"),
        "placeholder" | "name" => {
            let value = attributes::get(index, name);
            fragment::with_mut(index, |frag| {
                let Some(control) = frag.node_by_part("control") else { return };
                match &value {
                    Some(value) => frag.set_attribute(control, name, value),
                    None => frag.remove_attribute(control, name),
                }
            });
        }
        "tab-index" => {
            let value = attributes::get(index, "tab-index").unwrap_or_else(|| "0".to_string());
            fragment::with_mut(index, |frag| {
                if let Some(control) = frag.node_by_part("control") {
                    frag.set_attribute(control, "tabindex", &value);
                }
            });
        }
        "disabled" | "readonly" => sync_editing_state(index),
        "maxlength" => {
            // A tightened limit truncates the current value
            let current = editable::value(index);
            let truncated = editable::truncate(index, &current);
            if truncated != current {
                editable::set_value_internal(index, &truncated);
            }
            sync_value(index);
        }
        "required" | "minlength" | "pattern" | "error" => sync_value(index),
        _ => {}
    }
}

fn sync_optional_text(index: usize, attr: &str, part: &str) {
    let value = attributes::get(index, attr);
    fragment::with_mut(index, |frag| {
        let Some(node) = frag.node_by_part(part) else { return };
        match &value {
            Some(text) => {
                frag.set_text(node, text);
                frag.set_hidden(node, false);
            }
            None => {
                frag.set_text(node, "");
                frag.set_hidden(node, true);
            }
        }
    });
}

fn sync_editing_state(index: usize) {
    let disabled = attributes::has(index, "disabled");
    let readonly = attributes::has(index, "readonly");
    fragment::with_mut(index, |frag| {
        frag.set_attribute(
            Fragment::ROOT,
            "class",
            &editing_class(disabled, readonly),
        );
        if let Some(control) = frag.node_by_part("control") {
            frag.set_attribute(control, "aria-disabled", if disabled { "true" } else { "false" });
            frag.set_attribute(control, "aria-readonly", if readonly { "true" } else { "false" });
        }
    });
}

fn editing_class(disabled: bool, readonly: bool) -> String {
    let mut class = String::from("input");
    if disabled {
        class.push_str(" input--disabled");
    }
    if readonly {
        class.push_str(" input--readonly");
    }
    class
}

/// Re-derive the control's displayed value and validity projection.
fn sync_value(index: usize) {
    let value = editable::value(index);
    let validity = current_validity(index);
    fragment::with_mut(index, |frag| {
        if let Some(control) = frag.node_by_part("control") {
            frag.set_attribute(control, "value", &value);
            frag.set_attribute(
                control,
                "aria-invalid",
                if validity.is_valid() { "false" } else { "true" },
            );
        }
    });
}

/// Validity from declarative constraints, the programmatic custom message,
/// and the `error` attribute (which forces a custom failure).
fn current_validity(index: usize) -> validation::Validity {
    let constraints = validation::Constraints::from_attributes(index);
    let custom = editable::custom_validity(index).or_else(|| {
        attributes::has(index, "error").then(|| {
            let message = attributes::get(index, "error").unwrap_or_default();
            if message.is_empty() {
                "Invalid value".to_string()
            } else {
                message
            }
        })
    });
    validation::check(&editable::value(index), &constraints, custom.as_deref())
}

// =============================================================================
// Public API
// =============================================================================

/// Current value.
pub fn value(element: &Element) -> String {
    editable::value(element.index())
}

/// Assign a value programmatically. Truncated to maxlength, mirrored into
/// the `value` attribute, no `ui-input` emitted. Works while disabled.
pub fn set_value(element: &Element, value: &str) {
    let index = element.index();
    let adopted = editable::truncate(index, value);
    editable::set_value_internal(index, &adopted);
    sync_value(index);
}

/// Select the whole value.
pub fn select(element: &Element) {
    let index = element.index();
    let len = editable::value(index).chars().count();
    editable::set_selection(index, 0, len);
}

/// Select a character range of the value.
pub fn select_range(element: &Element, start: usize, end: usize) {
    editable::set_selection(element.index(), start, end);
}

/// Whether the current value satisfies all constraints.
pub fn check_validity(element: &Element) -> bool {
    current_validity(element.index()).is_valid()
}

/// Run a validity check and return the full result.
pub fn report_validity(element: &Element) -> validation::Validity {
    let validity = current_validity(element.index());
    sync_value(element.index());
    validity
}

/// Set a custom validity message; an empty string clears it. A non-empty
/// message wins over every declarative constraint.
pub fn set_custom_validity(element: &Element, message: &str) {
    editable::set_custom_validity(element.index(), message);
    sync_value(element.index());
}

/// Give the input focus. Never suppressed.
pub fn focus(element: &Element) {
    focus::focus(element.index());
}

/// Remove focus from the input if it holds it.
pub fn blur(element: &Element) {
    if focus::is_focused(element.index()) {
        focus::blur();
    }
}
