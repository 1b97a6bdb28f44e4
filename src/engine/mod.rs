//! Element engine: instance registry, definitions, attributes, lifecycle.
//!
//! The engine owns the shared synchronization protocol all widgets uphold:
//! at any observation point after construction, the rendered state is a pure
//! function of the current attribute set and, for editable widgets, the
//! internal value.

pub mod attributes;
pub mod definitions;
pub mod lifecycle;
pub mod registry;

pub use definitions::{DefinitionRegistry, ElementConstructor, create_element, define, is_defined};
pub use lifecycle::{LifecycleHooks, Phase};
pub use registry::{
    allocate_index, get_allocated_count, get_allocated_indices, get_current_parent_index,
    get_id, get_index, get_parent_index, is_allocated, on_destroy, pop_parent_context,
    push_parent_context, release_index, reset_registry,
};

use crate::dom::events::{self, UiEvent};

// =============================================================================
// Element Handle
// =============================================================================

/// Handle to an element instance.
///
/// Cheap to copy; all state lives in the per-index stores. Methods on an
/// unmounted element are guarded no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    index: usize,
}

impl Element {
    pub(crate) fn from_index(index: usize) -> Self {
        Self { index }
    }

    /// The element's index in the instance registry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The tag name this element was created as.
    pub fn tag(&self) -> Option<String> {
        registry::get_tag(self.index)
    }

    // =========================================================================
    // Attributes (external mutation surface)
    // =========================================================================

    /// Set an attribute. No-op when the value is unchanged.
    pub fn set_attribute(&self, name: &str, value: &str) {
        attributes::set(self.index, name, value);
    }

    /// Remove an attribute. No-op when already absent.
    pub fn remove_attribute(&self, name: &str) {
        attributes::remove(self.index, name);
    }

    /// Read an attribute value.
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        attributes::get(self.index, name)
    }

    /// Check attribute presence (boolean attribute semantics).
    pub fn has_attribute(&self, name: &str) -> bool {
        attributes::has(self.index, name)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Connect the element: one full synchronization pass from current
    /// attributes, then interaction listeners are live.
    pub fn connect(&self) {
        lifecycle::connect(self.index);
    }

    /// Disconnect the element: listeners released, no further
    /// synchronization.
    pub fn disconnect(&self) {
        lifecycle::disconnect(self.index);
    }

    /// Whether the element is currently connected.
    pub fn is_connected(&self) -> bool {
        lifecycle::is_connected(self.index)
    }

    /// Disconnect and release the element (and its children), running
    /// registered destroy callbacks.
    pub fn unmount(self) {
        lifecycle::disconnect(self.index);
        registry::release_index(self.index);
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Listen for a named event on this element. Composed events dispatched
    /// by descendants also arrive here. Returns a cleanup function.
    pub fn on(&self, event_name: &str, callback: impl Fn(&UiEvent) + 'static) -> impl FnOnce() {
        events::listen(self.index, event_name, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        reset_registry();
    }

    #[test]
    fn test_attribute_round_trip_via_handle() {
        setup();

        let element = create_element(crate::widgets::button::TAG).unwrap();
        element.set_attribute("variant", "danger");
        assert_eq!(element.get_attribute("variant"), Some("danger".to_string()));

        element.remove_attribute("variant");
        assert!(!element.has_attribute("variant"));
    }

    #[test]
    fn test_lifecycle_via_handle() {
        setup();

        let element = create_element(crate::widgets::button::TAG).unwrap();
        assert!(!element.is_connected());
        element.connect();
        assert!(element.is_connected());
        element.disconnect();
        assert!(!element.is_connected());
    }

    #[test]
    fn test_unmount_releases_index() {
        setup();

        let element = create_element(crate::widgets::button::TAG).unwrap();
        let index = element.index();
        element.connect();
        element.unmount();
        assert!(!is_allocated(index));
    }
}
