//! Definition Registry - tag name to element constructor mapping.
//!
//! Registration is idempotent: defining a tag that is already present is a
//! guarded no-op that leaves the existing definition untouched. The registry
//! is an explicit collaborator rather than an ambient global - tests can use
//! an isolated [`DefinitionRegistry`] per run - while a thread-local default
//! instance (with the built-in widgets pre-registered) backs the free
//! functions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::Element;
use super::registry::allocate_index;

/// Element constructor: allocates the fragment and registers hooks for the
/// given index. Must not read attributes.
pub type ElementConstructor = Rc<dyn Fn(usize)>;

/// A registry of element definitions.
#[derive(Default)]
pub struct DefinitionRegistry {
    definitions: RefCell<HashMap<String, ElementConstructor>>,
}

impl DefinitionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a tag. Returns false (and keeps the existing definition) when
    /// the tag is already defined.
    pub fn define(&self, tag: &str, constructor: impl Fn(usize) + 'static) -> bool {
        let mut definitions = self.definitions.borrow_mut();
        if definitions.contains_key(tag) {
            tracing::debug!(tag, "tag already defined, keeping existing definition");
            return false;
        }
        tracing::debug!(tag, "defining element");
        definitions.insert(tag.to_string(), Rc::new(constructor));
        true
    }

    /// Check whether a tag is defined.
    pub fn is_defined(&self, tag: &str) -> bool {
        self.definitions.borrow().contains_key(tag)
    }

    /// All defined tags.
    pub fn defined_tags(&self) -> Vec<String> {
        self.definitions.borrow().keys().cloned().collect()
    }

    /// Create an element for a defined tag.
    ///
    /// Allocates an index (honoring the parent context stack) and runs the
    /// constructor. Returns None for unknown tags.
    pub fn create(&self, tag: &str) -> Option<Element> {
        let constructor = self.definitions.borrow().get(tag).cloned()?;
        let index = allocate_index(None);
        super::registry::set_tag(index, tag);
        constructor(index);
        Some(Element::from_index(index))
    }
}

// =============================================================================
// Default Registry
// =============================================================================

thread_local! {
    static DEFAULT_REGISTRY: DefinitionRegistry = {
        let registry = DefinitionRegistry::new();
        crate::widgets::register_builtin(&registry);
        registry
    };
}

/// Define a tag in the default registry. Idempotent.
pub fn define(tag: &str, constructor: impl Fn(usize) + 'static) -> bool {
    DEFAULT_REGISTRY.with(|registry| registry.define(tag, constructor))
}

/// Check whether a tag is defined in the default registry.
pub fn is_defined(tag: &str) -> bool {
    DEFAULT_REGISTRY.with(|registry| registry.is_defined(tag))
}

/// Create an element from the default registry.
pub fn create_element(tag: &str) -> Option<Element> {
    DEFAULT_REGISTRY.with(|registry| registry.create(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::registry::reset_registry;

    fn setup() {
        reset_registry();
    }

    #[test]
    fn test_define_is_idempotent() {
        setup();

        let registry = DefinitionRegistry::new();
        assert!(registry.define("x-widget", |_| {}));
        assert!(!registry.define("x-widget", |_| {}));
        assert!(registry.is_defined("x-widget"));
    }

    #[test]
    fn test_redefine_keeps_existing() {
        use std::cell::Cell;
        use std::rc::Rc;

        setup();

        let registry = DefinitionRegistry::new();
        let first = Rc::new(Cell::new(false));
        let second = Rc::new(Cell::new(false));

        let first_clone = first.clone();
        registry.define("x-widget", move |_| first_clone.set(true));
        let second_clone = second.clone();
        registry.define("x-widget", move |_| second_clone.set(true));

        registry.create("x-widget").unwrap();
        assert!(first.get());
        assert!(!second.get());
    }

    #[test]
    fn test_create_unknown_tag() {
        setup();

        let registry = DefinitionRegistry::new();
        assert!(registry.create("no-such-tag").is_none());
    }

    #[test]
    fn test_default_registry_has_builtins() {
        setup();

        assert!(is_defined(crate::widgets::button::TAG));
        assert!(is_defined(crate::widgets::input::TAG));
        assert!(is_defined(crate::widgets::textarea::TAG));
        assert!(is_defined(crate::widgets::container::TAG));
    }

    #[test]
    fn test_created_element_records_tag() {
        setup();

        let registry = DefinitionRegistry::new();
        registry.define("x-widget", |_| {});
        let element = registry.create("x-widget").unwrap();
        assert_eq!(element.tag(), Some("x-widget".to_string()));
    }
}
