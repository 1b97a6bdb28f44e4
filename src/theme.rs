//! Theme Surface - the CSS custom properties widgets expose.
//!
//! Hosts restyle widgets through these properties (and the declared style
//! parts) without reaching into fragment internals. Each widget applies its
//! fallback values at construction so an unthemed tree still renders with
//! sane defaults.

use crate::dom::fragment::Fragment;

/// Custom property names, grouped by widget.
pub mod tokens {
    // Shared
    pub const FONT_FAMILY: &str = "--ui-font-family";
    pub const RADIUS: &str = "--ui-radius";

    // Button
    pub const BUTTON_BG: &str = "--ui-button-bg";
    pub const BUTTON_FG: &str = "--ui-button-fg";
    pub const BUTTON_PADDING: &str = "--ui-button-padding";

    // Editable controls
    pub const CONTROL_BG: &str = "--ui-control-bg";
    pub const CONTROL_FG: &str = "--ui-control-fg";
    pub const CONTROL_BORDER: &str = "--ui-control-border";
    pub const ERROR_COLOR: &str = "--ui-error-color";

    // Container
    pub const GAP: &str = "--ui-gap";
    pub const PADDING: &str = "--ui-padding";
}

fn apply_shared_defaults(fragment: &mut Fragment) {
    fragment.set_custom_property(Fragment::ROOT, tokens::FONT_FAMILY, "system-ui, sans-serif");
    fragment.set_custom_property(Fragment::ROOT, tokens::RADIUS, "4px");
}

pub(crate) fn apply_button_defaults(fragment: &mut Fragment) {
    apply_shared_defaults(fragment);
    fragment.set_custom_property(Fragment::ROOT, tokens::BUTTON_BG, "#2563eb");
    fragment.set_custom_property(Fragment::ROOT, tokens::BUTTON_FG, "#ffffff");
    fragment.set_custom_property(Fragment::ROOT, tokens::BUTTON_PADDING, "8px 16px");
}

pub(crate) fn apply_control_defaults(fragment: &mut Fragment) {
    apply_shared_defaults(fragment);
    fragment.set_custom_property(Fragment::ROOT, tokens::CONTROL_BG, "#ffffff");
    fragment.set_custom_property(Fragment::ROOT, tokens::CONTROL_FG, "#111827");
    fragment.set_custom_property(Fragment::ROOT, tokens::CONTROL_BORDER, "1px solid #d1d5db");
    fragment.set_custom_property(Fragment::ROOT, tokens::ERROR_COLOR, "#dc2626");
}

pub(crate) fn apply_container_defaults(fragment: &mut Fragment) {
    fragment.set_custom_property(Fragment::ROOT, tokens::GAP, "0px");
    fragment.set_custom_property(Fragment::ROOT, tokens::PADDING, "0px");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_defaults_present() {
        let mut fragment = Fragment::new("button");
        apply_button_defaults(&mut fragment);
        assert!(fragment.custom_property(Fragment::ROOT, tokens::BUTTON_BG).is_some());
        assert!(fragment.custom_property(Fragment::ROOT, tokens::RADIUS).is_some());
    }

    #[test]
    fn test_container_defaults_present() {
        let mut fragment = Fragment::new("div");
        apply_container_defaults(&mut fragment);
        assert_eq!(fragment.custom_property(Fragment::ROOT, tokens::GAP), Some("0px"));
    }
}
