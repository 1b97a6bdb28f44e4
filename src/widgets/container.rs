//! Container - layout widget with no events and no internal value.
//!
//! Every attribute is a pure projection onto the root node's styles, so the
//! container is the simplest expression of the synchronization protocol:
//! rendered state is a function of the attribute set, nothing else.

use std::rc::Rc;

use crate::dom::fragment::{self, Fragment};
use crate::engine::{attributes, lifecycle};
use crate::theme::{self, tokens};
use crate::types::LayoutMode;

pub const TAG: &str = "ui-container";

pub const OBSERVED_ATTRIBUTES: &[&str] = &[
    "layout",
    "direction",
    "align",
    "justify",
    "wrap",
    "gap",
    "padding",
    "columns",
    "min-column-width",
];

const DEFAULT_MIN_COLUMN_WIDTH: &str = "250px";

// =============================================================================
// Construction
// =============================================================================

pub(crate) fn construct(index: usize) {
    let mut frag = Fragment::new("div");
    frag.set_part(Fragment::ROOT, "container");
    theme::apply_container_defaults(&mut frag);
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
        "layout" | "columns" | "min-column-width" => apply_layout(index),
        "direction" => apply_passthrough(index, "direction", "flex-direction"),
        "align" => apply_passthrough(index, "align", "align-items"),
        "justify" => apply_passthrough(index, "justify", "justify-content"),
        "wrap" => apply_passthrough(index, "wrap", "flex-wrap"),
        "gap" => apply_gap(index),
        "padding" => apply_padding(index),
        _ => {}
    }
}

/// Display mode plus, in grid mode, the column template.
fn apply_layout(index: usize) {
    let mode = LayoutMode::from_attr(attributes::get(index, "layout").as_deref());
    let template = (mode == LayoutMode::Grid).then(|| grid_template(index));

    fragment::with_mut(index, |frag| {
        frag.set_attribute(
            Fragment::ROOT,
            "class",
            &format!("container container--{}", mode.as_css()),
        );
        frag.set_style(Fragment::ROOT, "display", mode.as_css());
        match &template {
            Some(template) => frag.set_style(Fragment::ROOT, "grid-template-columns", template),
            None => frag.remove_style(Fragment::ROOT, "grid-template-columns"),
        }
    });
}

/// A positive integer column count produces fixed equal columns; anything
/// else falls back to auto-fit with a minimum column width.
fn grid_template(index: usize) -> String {
    let columns = attributes::get(index, "columns").and_then(|raw| {
        raw.trim().parse::<usize>().ok().filter(|count| *count > 0)
    });
    match columns {
        Some(count) => format!("repeat({count}, 1fr)"),
        None => {
            let min = attributes::get(index, "min-column-width")
                .unwrap_or_else(|| DEFAULT_MIN_COLUMN_WIDTH.to_string());
            format!("repeat(auto-fit, minmax({min}, 1fr))")
        }
    }
}

fn apply_passthrough(index: usize, attr: &str, property: &str) {
    let value = attributes::get(index, attr);
    fragment::with_mut(index, |frag| match &value {
        Some(value) => frag.set_style(Fragment::ROOT, property, value),
        None => frag.remove_style(Fragment::ROOT, property),
    });
}

fn apply_gap(index: usize) {
    let value = attributes::get(index, "gap").map(|raw| normalize_length(&raw));
    fragment::with_mut(index, |frag| match &value {
        Some(value) => {
            frag.set_style(Fragment::ROOT, "gap", value);
            frag.set_custom_property(Fragment::ROOT, tokens::GAP, value);
        }
        None => {
            frag.remove_style(Fragment::ROOT, "gap");
            frag.set_custom_property(Fragment::ROOT, tokens::GAP, "0px");
        }
    });
}

fn apply_padding(index: usize) {
    let value = attributes::get(index, "padding").map(|raw| padding_value(&raw));
    fragment::with_mut(index, |frag| match &value {
        Some(value) => {
            frag.set_style(Fragment::ROOT, "padding", value);
            frag.set_custom_property(Fragment::ROOT, tokens::PADDING, value);
        }
        None => {
            frag.remove_style(Fragment::ROOT, "padding");
            frag.set_custom_property(Fragment::ROOT, tokens::PADDING, "0px");
        }
    });
}

/// Padding accepts the named scale first, then numbers as pixels, then any
/// CSS length verbatim.
fn padding_value(raw: &str) -> String {
    match named_size(raw) {
        Some(px) => px.to_string(),
        None => normalize_length(raw),
    }
}

fn named_size(raw: &str) -> Option<&'static str> {
    match raw {
        "xs" => Some("4px"),
        "sm" => Some("8px"),
        "md" => Some("16px"),
        "lg" => Some("24px"),
        "xl" => Some("32px"),
        _ => None,
    }
}

/// Bare numbers are pixel counts; everything else passes through verbatim.
fn normalize_length(raw: &str) -> String {
    if raw.trim().parse::<f64>().is_ok() {
        format!("{}px", raw.trim())
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Element, create_element, reset_registry};

    fn setup() -> Element {
        reset_registry();
        let element = create_element(TAG).unwrap();
        element.connect();
        element
    }

    fn root_style(index: usize, property: &str) -> Option<String> {
        fragment::with(index, |frag| {
            frag.style(Fragment::ROOT, property).map(str::to_string)
        })
        .flatten()
    }

    #[test]
    fn test_default_layout_is_block() {
        let element = setup();
        assert_eq!(root_style(element.index(), "display").as_deref(), Some("block"));
    }

    #[test]
    fn test_invalid_layout_falls_back_to_block() {
        let element = setup();
        element.set_attribute("layout", "circular");
        assert_eq!(root_style(element.index(), "display").as_deref(), Some("block"));
    }

    #[test]
    fn test_flex_passthroughs() {
        let element = setup();
        element.set_attribute("layout", "flex");
        element.set_attribute("direction", "column");
        element.set_attribute("align", "center");
        element.set_attribute("justify", "space-between");
        element.set_attribute("wrap", "wrap");

        let index = element.index();
        assert_eq!(root_style(index, "display").as_deref(), Some("flex"));
        assert_eq!(root_style(index, "flex-direction").as_deref(), Some("column"));
        assert_eq!(root_style(index, "align-items").as_deref(), Some("center"));
        assert_eq!(root_style(index, "justify-content").as_deref(), Some("space-between"));
        assert_eq!(root_style(index, "flex-wrap").as_deref(), Some("wrap"));
    }

    #[test]
    fn test_grid_fixed_columns() {
        let element = setup();
        element.set_attribute("layout", "grid");
        element.set_attribute("columns", "3");
        assert_eq!(
            root_style(element.index(), "grid-template-columns").as_deref(),
            Some("repeat(3, 1fr)")
        );
    }

    #[test]
    fn test_grid_auto_fit_fallback() {
        let element = setup();
        element.set_attribute("layout", "grid");
        assert_eq!(
            root_style(element.index(), "grid-template-columns").as_deref(),
            Some("repeat(auto-fit, minmax(250px, 1fr))")
        );

        // Zero and garbage column counts also fall back
        element.set_attribute("columns", "0");
        element.set_attribute("min-column-width", "10rem");
        assert_eq!(
            root_style(element.index(), "grid-template-columns").as_deref(),
            Some("repeat(auto-fit, minmax(10rem, 1fr))")
        );
    }

    #[test]
    fn test_template_cleared_outside_grid() {
        let element = setup();
        element.set_attribute("layout", "grid");
        element.set_attribute("columns", "2");
        element.set_attribute("layout", "flex");
        assert_eq!(root_style(element.index(), "grid-template-columns"), None);
    }

    #[test]
    fn test_gap_normalization() {
        let element = setup();
        element.set_attribute("gap", "12");
        assert_eq!(root_style(element.index(), "gap").as_deref(), Some("12px"));

        element.set_attribute("gap", "1.5rem");
        assert_eq!(root_style(element.index(), "gap").as_deref(), Some("1.5rem"));

        element.remove_attribute("gap");
        assert_eq!(root_style(element.index(), "gap"), None);
    }

    #[test]
    fn test_padding_scale() {
        let element = setup();
        let index = element.index();

        element.set_attribute("padding", "md");
        assert_eq!(root_style(index, "padding").as_deref(), Some("16px"));

        element.set_attribute("padding", "20");
        assert_eq!(root_style(index, "padding").as_deref(), Some("20px"));

        element.set_attribute("padding", "2em");
        assert_eq!(root_style(index, "padding").as_deref(), Some("2em"));
    }

    #[test]
    fn test_gap_exposed_as_custom_property() {
        let element = setup();
        element.set_attribute("gap", "8");
        let value = fragment::with(element.index(), |frag| {
            frag.custom_property(Fragment::ROOT, tokens::GAP)
                .map(str::to_string)
        })
        .flatten();
        assert_eq!(value.as_deref(), Some("8px"));
    }
}
