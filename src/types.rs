//! Core types for ember-ui.
//!
//! Small enums shared across the widgets. Every `from_attr` parser is
//! forgiving: an unrecognized or absent value falls back to the documented
//! default instead of failing.

use serde::Serialize;

// =============================================================================
// Button
// =============================================================================

/// Semantic button variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    /// Primary action/emphasis (default).
    #[default]
    Primary,
    /// Secondary action.
    Secondary,
    /// Destructive action.
    Danger,
}

impl ButtonVariant {
    /// Parse from an attribute value (case-insensitive).
    /// Unrecognized values fall back to `Primary`.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("secondary") => Self::Secondary,
            Some("danger") => Self::Danger,
            _ => Self::Primary,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Danger => "danger",
        }
    }
}

/// Button behavior kind, mirroring the native `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    /// Plain button (default).
    #[default]
    Button,
    /// Form submission trigger.
    Submit,
    /// Form reset trigger.
    Reset,
}

impl ButtonKind {
    /// Parse from an attribute value (case-insensitive).
    /// Unrecognized values fall back to `Button`.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("submit") => Self::Submit,
            Some("reset") => Self::Reset,
            _ => Self::Button,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Submit => "submit",
            Self::Reset => "reset",
        }
    }
}

// =============================================================================
// Editing
// =============================================================================

/// The kind of edit a keystroke performed, carried on input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditOperation {
    /// A character was inserted at the cursor.
    Insert,
    /// The character before the cursor was removed (Backspace).
    DeleteBackward,
    /// The character after the cursor was removed (Delete).
    DeleteForward,
}

// =============================================================================
// Character counter
// =============================================================================

/// Visual severity of the character counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterSeverity {
    /// Below the warning threshold.
    #[default]
    Normal,
    /// At or above 90% of the maximum.
    Warning,
    /// At the maximum.
    Error,
}

impl CounterSeverity {
    /// Severity for `used` characters out of `max`.
    pub fn from_usage(used: usize, max: usize) -> Self {
        if max == 0 {
            return Self::Normal;
        }
        if used >= max {
            Self::Error
        } else if used * 10 >= max * 9 {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Class-name suffix for the counter node, if any.
    pub const fn class_suffix(&self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Warning => Some("warning"),
            Self::Error => Some("error"),
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Layout modes for the container widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Normal flow (default).
    #[default]
    Block,
    /// Flexbox.
    Flex,
    /// Grid.
    Grid,
}

impl LayoutMode {
    /// Parse from an attribute value (case-insensitive).
    /// Unrecognized values behave like an absent attribute (block).
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("flex") => Self::Flex,
            Some("grid") => Self::Grid,
            _ => Self::Block,
        }
    }

    /// CSS `display` value for this mode.
    pub const fn as_css(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Flex => "flex",
            Self::Grid => "grid",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        self.as_css()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_from_attr() {
        assert_eq!(ButtonVariant::from_attr(Some("danger")), ButtonVariant::Danger);
        assert_eq!(ButtonVariant::from_attr(Some("SECONDARY")), ButtonVariant::Secondary);
        // Unrecognized and absent fall back to primary
        assert_eq!(ButtonVariant::from_attr(Some("rainbow")), ButtonVariant::Primary);
        assert_eq!(ButtonVariant::from_attr(None), ButtonVariant::Primary);
    }

    #[test]
    fn test_kind_from_attr() {
        assert_eq!(ButtonKind::from_attr(Some("submit")), ButtonKind::Submit);
        assert_eq!(ButtonKind::from_attr(Some("reset")), ButtonKind::Reset);
        assert_eq!(ButtonKind::from_attr(Some("nope")), ButtonKind::Button);
        assert_eq!(ButtonKind::from_attr(None), ButtonKind::Button);
    }

    #[test]
    fn test_counter_severity_thresholds() {
        assert_eq!(CounterSeverity::from_usage(5, 10), CounterSeverity::Normal);
        assert_eq!(CounterSeverity::from_usage(8, 10), CounterSeverity::Normal);
        assert_eq!(CounterSeverity::from_usage(9, 10), CounterSeverity::Warning);
        assert_eq!(CounterSeverity::from_usage(10, 10), CounterSeverity::Error);
        assert_eq!(CounterSeverity::from_usage(12, 10), CounterSeverity::Error);
        // No maximum means no severity
        assert_eq!(CounterSeverity::from_usage(100, 0), CounterSeverity::Normal);
    }

    #[test]
    fn test_layout_mode_from_attr() {
        assert_eq!(LayoutMode::from_attr(Some("flex")), LayoutMode::Flex);
        assert_eq!(LayoutMode::from_attr(Some("Grid")), LayoutMode::Grid);
        // Unrecognized behaves like absent
        assert_eq!(LayoutMode::from_attr(Some("foo")), LayoutMode::Block);
        assert_eq!(LayoutMode::from_attr(None), LayoutMode::Block);
    }
}
