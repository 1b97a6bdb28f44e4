//! Button - activatable action widget.
//!
//! Variant, disabled and loading are pure attribute projections; activation
//! emits `ui-click` with the variant and kind in the detail. Disabled or
//! loading suppress activation entirely: the triggering interaction is
//! canceled and halted, and no side effect of any kind occurs.

use std::rc::Rc;

use crate::dom::events::{self, EventDetail, NativeEvent, UiEvent};
use crate::dom::fragment::{self, Fragment};
use crate::engine::{Element, attributes, lifecycle, registry};
use crate::state::{focus, keyboard};
use crate::theme;
use crate::types::{ButtonKind, ButtonVariant};

pub const TAG: &str = "ui-button";
pub const CLICK_EVENT: &str = "ui-click";

pub const OBSERVED_ATTRIBUTES: &[&str] = &["variant", "type", "label", "disabled", "loading"];

// =============================================================================
// Construction
// =============================================================================

/// Build the button's fragment and wire its hooks. Registered in the
/// definition registry under [`TAG`].
pub(crate) fn construct(index: usize) {
    let mut frag = Fragment::new("button");
    frag.set_part(Fragment::ROOT, "button");
    frag.set_attribute(Fragment::ROOT, "role", "button");
    frag.set_attribute(Fragment::ROOT, "tabindex", "0");

    let label = frag.append_child(Fragment::ROOT, "span");
    frag.set_part(label, "label");

    let spinner = frag.append_child(Fragment::ROOT, "span");
    frag.set_part(spinner, "spinner");
    frag.set_hidden(spinner, true);

    theme::apply_button_defaults(&mut frag);
    fragment::install(index, frag);

    attributes::set_observed(index, OBSERVED_ATTRIBUTES);
    lifecycle::register_hooks(
        index,
        lifecycle::LifecycleHooks {
            on_attach: Some(Rc::new(sync_all)),
            on_attribute_change: Some(Rc::new(|index, name, _, _| sync_attribute(index, name))),
            on_detach: None,
        },
    );

    // Enter and Space activate a focused button
    let key_cleanup = keyboard::on_focused(index, move |event| {
        if !event.is_press() {
            return false;
        }
        if event.key == "Enter" || event.key == " " {
            let mut native = NativeEvent::new();
            press(&Element::from_index(index), &mut native);
            return true;
        }
        false
    });
    registry::on_destroy(index, key_cleanup);
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
        "variant" | "disabled" | "loading" => sync_state(index),
        "label" => {
            let text = attributes::get(index, "label").unwrap_or_default();
            fragment::with_mut(index, |frag| {
                if let Some(label) = frag.node_by_part("label") {
                    frag.set_text(label, &text);
                }
            });
        }
        "type" => {
            let kind = ButtonKind::from_attr(attributes::get(index, "type").as_deref());
            fragment::with_mut(index, |frag| {
                frag.set_attribute(Fragment::ROOT, "type", kind.as_str());
            });
        }
        _ => {}
    }
}

/// Re-derive class, aria state and spinner visibility from the variant,
/// disabled and loading attributes.
fn sync_state(index: usize) {
    let variant = ButtonVariant::from_attr(attributes::get(index, "variant").as_deref());
    let disabled = attributes::has(index, "disabled");
    let loading = attributes::has(index, "loading");

    let mut class = format!("button button--{}", variant.as_str());
    if loading {
        class.push_str(" button--loading");
    }
    if disabled {
        class.push_str(" button--disabled");
    }

    fragment::with_mut(index, |frag| {
        frag.set_attribute(Fragment::ROOT, "class", &class);
        frag.set_attribute(Fragment::ROOT, "aria-disabled", if disabled { "true" } else { "false" });
        frag.set_attribute(Fragment::ROOT, "aria-busy", if loading { "true" } else { "false" });
        // Suppressed buttons leave the tab order
        frag.set_attribute(
            Fragment::ROOT,
            "tabindex",
            if disabled || loading { "-1" } else { "0" },
        );
        if let Some(spinner) = frag.node_by_part("spinner") {
            frag.set_hidden(spinner, !loading);
        }
    });
}

fn is_suppressed(index: usize) -> bool {
    attributes::has(index, "disabled") || attributes::has(index, "loading")
}

// =============================================================================
// Activation
// =============================================================================

/// Handle an activation interaction (pointer press, Enter, Space).
///
/// Suppressed (disabled or loading): cancels and halts the triggering
/// interaction and performs no other side effect. Otherwise emits
/// `ui-click` synchronously.
pub fn press(element: &Element, native: &mut NativeEvent) {
    let index = element.index();
    if is_suppressed(index) {
        native.prevent_default();
        native.stop_propagation();
        return;
    }
    if !lifecycle::is_connected(index) {
        return;
    }

    let variant = ButtonVariant::from_attr(attributes::get(index, "variant").as_deref());
    let kind = ButtonKind::from_attr(attributes::get(index, "type").as_deref());
    let event = UiEvent::new(CLICK_EVENT, EventDetail::Click { variant, kind });
    events::dispatch(index, &event);
}

/// Programmatic activation. Follows the same suppression rule as an
/// interaction: returns false without emitting when disabled or loading.
pub fn click(element: &Element) -> bool {
    if is_suppressed(element.index()) {
        return false;
    }
    let mut native = NativeEvent::new();
    press(element, &mut native);
    true
}

/// Give the button focus. Works regardless of disabled or loading.
pub fn focus(element: &Element) {
    focus::focus(element.index());
}

/// Remove focus from the button if it holds it.
pub fn blur(element: &Element) {
    if focus::is_focused(element.index()) {
        focus::blur();
    }
}
