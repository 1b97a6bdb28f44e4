//! Textarea - multi-line editable text widget.
//!
//! Shares the editable store and event contract with the input widget, adds
//! newline editing, a live character counter with severity thresholds, an
//! optional auto-resize mode and an inline validation message.

use std::rc::Rc;

use crate::dom::events::{self, EventDetail, UiEvent};
use crate::dom::fragment::{self, Fragment};
use crate::engine::{Element, attributes, lifecycle, registry};
use crate::state::{focus, keyboard};
use crate::theme;
use crate::types::CounterSeverity;
use crate::widgets::{editable, validation};

pub const TAG: &str = "ui-textarea";

pub const INPUT_EVENT: &str = "ui-input";
pub const CHANGE_EVENT: &str = "ui-change";
pub const FOCUS_EVENT: &str = "ui-focus";
pub const BLUR_EVENT: &str = "ui-blur";

pub const OBSERVED_ATTRIBUTES: &[&str] = &[
    "value",
    "label",
    "placeholder",
    "rows",
    "auto-resize",
    "required",
    "minlength",
    "maxlength",
    "pattern",
    "disabled",
    "readonly",
    "tab-index",
];

const DEFAULT_ROWS: usize = 3;

// =============================================================================
// Construction
// =============================================================================

pub(crate) fn construct(index: usize) {
    let mut frag = Fragment::new("div");
    frag.set_attribute(Fragment::ROOT, "class", "textarea");

    let label = frag.append_child(Fragment::ROOT, "label");
    frag.set_part(label, "label");

    let control = frag.append_child(Fragment::ROOT, "textarea");
    frag.set_part(control, "control");
    frag.set_attribute(control, "tabindex", "0");

    let counter = frag.append_child(Fragment::ROOT, "span");
    frag.set_part(counter, "counter");

    let message = frag.append_child(Fragment::ROOT, "span");
    frag.set_part(message, "message");
    frag.set_hidden(message, true);

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
    if attributes::has(index, "disabled") || attributes::has(index, "readonly") {
        return true;
    }
    match editable::apply_keystroke(index, event, true) {
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
            let raw = attributes::get(index, "value").unwrap_or_default();
            let adopted = editable::truncate(index, &raw);
            editable::set_value_internal(index, &adopted);
            sync_value(index);
        }
        "label" => {
            let text = attributes::get(index, "label").unwrap_or_default();
            fragment::with_mut(index, |frag| {
                if let Some(label) = frag.node_by_part("label") {
                    frag.set_text(label, &text);
                }
            });
        }
        "placeholder" => {
            let value = attributes::get(index, "placeholder");
            fragment::with_mut(index, |frag| {
                let Some(control) = frag.node_by_part("control") else { return };
                match &value {
                    Some(value) => frag.set_attribute(control, "placeholder", value),
                    None => frag.remove_attribute(control, "placeholder"),
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
        "rows" | "auto-resize" => sync_height(index),
        "disabled" | "readonly" => {
            let disabled = attributes::has(index, "disabled");
            let readonly = attributes::has(index, "readonly");
            fragment::with_mut(index, |frag| {
                let Some(control) = frag.node_by_part("control") else { return };
                frag.set_attribute(control, "aria-disabled", if disabled { "true" } else { "false" });
                frag.set_attribute(control, "aria-readonly", if readonly { "true" } else { "false" });
            });
        }
        "maxlength" => {
            let current = editable::value(index);
            let truncated = editable::truncate(index, &current);
            if truncated != current {
                editable::set_value_internal(index, &truncated);
            }
            sync_value(index);
        }
        "required" | "minlength" | "pattern" => sync_value(index),
        _ => {}
    }
}

/// Re-derive everything that depends on the value: control text, counter,
/// validation message, height.
fn sync_value(index: usize) {
    let value = editable::value(index);
    let validity = current_validity(index);
    let (counter_text, counter_class) = counter_projection(index, &value);

    fragment::with_mut(index, |frag| {
        if let Some(control) = frag.node_by_part("control") {
            frag.set_text(control, &value);
            frag.set_attribute(
                control,
                "aria-invalid",
                if validity.is_valid() { "false" } else { "true" },
            );
        }
        if let Some(counter) = frag.node_by_part("counter") {
            frag.set_text(counter, &counter_text);
            frag.set_attribute(counter, "class", &counter_class);
        }
        if let Some(message) = frag.node_by_part("message") {
            match &validity.message {
                Some(text) => {
                    frag.set_text(message, text);
                    frag.set_hidden(message, false);
                }
                None => {
                    frag.set_text(message, "");
                    frag.set_hidden(message, true);
                }
            }
        }
    });
    sync_height(index);
}

fn counter_projection(index: usize, value: &str) -> (String, String) {
    let used = value.chars().count();
    match editable::max_length(index) {
        Some(max) => {
            let severity = CounterSeverity::from_usage(used, max);
            let mut class = String::from("counter");
            if let Some(suffix) = severity.class_suffix() {
                class.push_str(" counter--");
                class.push_str(suffix);
            }
            (format!("{used} / {max}"), class)
        }
        None => (used.to_string(), "counter".to_string()),
    }
}

fn rows(index: usize) -> usize {
    attributes::parse_usize_or(index, "rows", DEFAULT_ROWS)
}

/// Height is `rows` line-heights, or in auto-resize mode the line count of
/// the value (never below `rows`).
fn sync_height(index: usize) {
    let rows = rows(index);
    let height = if attributes::has(index, "auto-resize") {
        let lines = editable::value(index).split('\n').count();
        lines.max(rows)
    } else {
        rows
    };
    fragment::with_mut(index, |frag| {
        if let Some(control) = frag.node_by_part("control") {
            frag.set_style(control, "height", &format!("{height}lh"));
        }
    });
}

fn current_validity(index: usize) -> validation::Validity {
    let constraints = validation::Constraints::from_attributes(index);
    let custom = editable::custom_validity(index);
    validation::check(&editable::value(index), &constraints, custom.as_deref())
}

// =============================================================================
// Public API
// =============================================================================

/// Current value.
pub fn get_value(element: &Element) -> String {
    editable::value(element.index())
}

/// Assign a value programmatically. Truncated to maxlength, no `ui-input`.
pub fn set_value(element: &Element, value: &str) {
    let index = element.index();
    let adopted = editable::truncate(index, value);
    editable::set_value_internal(index, &adopted);
    sync_value(index);
}

/// Clear the value. Never suppressed.
pub fn clear(element: &Element) {
    set_value(element, "");
}

/// Whether the current value satisfies all constraints.
pub fn is_valid(element: &Element) -> bool {
    current_validity(element.index()).is_valid()
}

/// Character count of the current value.
pub fn character_count(element: &Element) -> usize {
    editable::value(element.index()).chars().count()
}

/// Characters left before maxlength, None when no limit is set.
pub fn remaining_characters(element: &Element) -> Option<usize> {
    let index = element.index();
    editable::max_length(index).map(|max| max.saturating_sub(character_count(element)))
}

/// Set a custom validity message; an empty string clears it.
pub fn set_custom_validity(element: &Element, message: &str) {
    editable::set_custom_validity(element.index(), message);
    sync_value(element.index());
}

/// Give the textarea focus. Never suppressed.
pub fn focus(element: &Element) {
    focus::focus(element.index());
}

/// Remove focus from the textarea if it holds it.
pub fn blur(element: &Element) {
    if focus::is_focused(element.index()) {
        focus::blur();
    }
}
