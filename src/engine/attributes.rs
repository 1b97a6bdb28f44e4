//! Attribute Store - per-element declarative configuration.
//!
//! Attributes are the only cross-boundary communication channel: string
//! values, or presence for boolean attributes. Two structurally distinct
//! write paths exist:
//!
//! - [`set`] / [`remove`] — the EXTERNAL path. Setting an attribute to its
//!   current value is a no-op. While the element is connected, a real change
//!   to an observed attribute dispatches the element's attribute-change
//!   hooks.
//! - [`reflect`] — the INTERNAL path (value mirroring). A widget that just
//!   applied a user edit reflects its value back into the attribute so
//!   external observers polling the attribute see current state. Reflect
//!   never dispatches hooks, so the change handler cannot re-enter the value
//!   assignment it was caused by.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

thread_local! {
    /// Attribute maps, keyed by element index.
    static ATTRIBUTES: RefCell<HashMap<usize, BTreeMap<String, String>>> =
        RefCell::new(HashMap::new());

    /// Observed attribute sets, registered by widget constructors.
    static OBSERVED: RefCell<HashMap<usize, &'static [&'static str]>> =
        RefCell::new(HashMap::new());
}

// =============================================================================
// Observed Set
// =============================================================================

/// Register the observed attribute set for an element.
pub fn set_observed(index: usize, names: &'static [&'static str]) {
    OBSERVED.with(|map| {
        map.borrow_mut().insert(index, names);
    });
}

/// Check whether an attribute is in the element's observed set.
pub fn is_observed(index: usize, name: &str) -> bool {
    OBSERVED.with(|map| {
        map.borrow()
            .get(&index)
            .is_some_and(|names| names.contains(&name))
    })
}

// =============================================================================
// External Write Path
// =============================================================================

/// Set an attribute (external mutation).
///
/// No-op when the value is unchanged. Dispatches attribute-change hooks when
/// the element is connected and the attribute is observed.
pub fn set(index: usize, name: &str, value: &str) {
    let old = get(index, name);
    if old.as_deref() == Some(value) {
        return;
    }
    ATTRIBUTES.with(|map| {
        map.borrow_mut()
            .entry(index)
            .or_default()
            .insert(name.to_string(), value.to_string());
    });
    dispatch_change(index, name, old.as_deref(), Some(value));
}

/// Remove an attribute (external mutation).
///
/// No-op when the attribute is already absent.
pub fn remove(index: usize, name: &str) {
    let old = ATTRIBUTES.with(|map| {
        map.borrow_mut()
            .get_mut(&index)
            .and_then(|attrs| attrs.remove(name))
    });
    let Some(old) = old else { return };
    dispatch_change(index, name, Some(&old), None);
}

fn dispatch_change(index: usize, name: &str, old: Option<&str>, new: Option<&str>) {
    if !super::lifecycle::is_connected(index) {
        return;
    }
    if !is_observed(index, name) {
        return;
    }
    tracing::trace!(index, name, "attribute changed");
    super::lifecycle::run_attribute_change(index, name, old, new);
}

// =============================================================================
// Internal Write Path (value mirroring)
// =============================================================================

/// Reflect a derived value back into an attribute (internal write).
///
/// Stores only; never dispatches attribute-change hooks.
pub fn reflect(index: usize, name: &str, value: &str) {
    ATTRIBUTES.with(|map| {
        map.borrow_mut()
            .entry(index)
            .or_default()
            .insert(name.to_string(), value.to_string());
    });
}

// =============================================================================
// Reads
// =============================================================================

/// Get an attribute value.
pub fn get(index: usize, name: &str) -> Option<String> {
    ATTRIBUTES.with(|map| {
        map.borrow()
            .get(&index)
            .and_then(|attrs| attrs.get(name).cloned())
    })
}

/// Check attribute presence (boolean attribute semantics).
pub fn has(index: usize, name: &str) -> bool {
    ATTRIBUTES.with(|map| {
        map.borrow()
            .get(&index)
            .is_some_and(|attrs| attrs.contains_key(name))
    })
}

/// Parse a numeric attribute. Malformed values read as absent.
pub fn parse_usize(index: usize, name: &str) -> Option<usize> {
    get(index, name).and_then(|raw| raw.trim().parse().ok())
}

/// Parse a numeric attribute with a documented default for absent or
/// malformed values.
pub fn parse_usize_or(index: usize, name: &str, default: usize) -> usize {
    parse_usize(index, name).unwrap_or(default)
}

// =============================================================================
// Cleanup
// =============================================================================

pub(crate) fn clear(index: usize) {
    ATTRIBUTES.with(|map| {
        map.borrow_mut().remove(&index);
    });
    OBSERVED.with(|map| {
        map.borrow_mut().remove(&index);
    });
}

pub(crate) fn reset() {
    ATTRIBUTES.with(|map| map.borrow_mut().clear());
    OBSERVED.with(|map| map.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::registry::reset_registry;

    fn setup() {
        reset_registry();
    }

    #[test]
    fn test_attribute_round_trip() {
        setup();

        set(0, "variant", "danger");
        assert_eq!(get(0, "variant"), Some("danger".to_string()));

        set(0, "variant", "primary");
        assert_eq!(get(0, "variant"), Some("primary".to_string()));

        remove(0, "variant");
        assert_eq!(get(0, "variant"), None);
        assert!(!has(0, "variant"));
    }

    #[test]
    fn test_boolean_presence() {
        setup();

        assert!(!has(0, "disabled"));
        set(0, "disabled", "");
        assert!(has(0, "disabled"));
        remove(0, "disabled");
        assert!(!has(0, "disabled"));
    }

    #[test]
    fn test_numeric_parse_fallback() {
        setup();

        set(0, "rows", "5");
        assert_eq!(parse_usize(0, "rows"), Some(5));

        set(0, "rows", "banana");
        assert_eq!(parse_usize(0, "rows"), None);
        assert_eq!(parse_usize_or(0, "rows", 3), 3);

        remove(0, "rows");
        assert_eq!(parse_usize_or(0, "rows", 3), 3);
    }

    #[test]
    fn test_reflect_does_not_dispatch() {
        use std::cell::Cell;
        use std::rc::Rc;

        setup();

        let index = crate::engine::registry::allocate_index(None);
        set_observed(index, &["value"]);

        let fired = Rc::new(Cell::new(0u32));
        let fired_clone = fired.clone();
        let _cleanup = crate::engine::lifecycle::register_hooks(
            index,
            crate::engine::lifecycle::LifecycleHooks {
                on_attribute_change: Some(Rc::new(move |_, _, _, _| {
                    fired_clone.set(fired_clone.get() + 1);
                })),
                ..Default::default()
            },
        );
        crate::engine::lifecycle::connect(index);

        // External write dispatches
        set(index, "value", "a");
        assert_eq!(fired.get(), 1);

        // Internal write never dispatches
        reflect(index, "value", "b");
        assert_eq!(fired.get(), 1);
        assert_eq!(get(index, "value"), Some("b".to_string()));

        // Unchanged external write is a no-op
        set(index, "value", "b");
        assert_eq!(fired.get(), 1);
    }
}
