//! Built-in widgets: button, input, textarea, container.
//!
//! Each widget module exposes its tag constant, observed attribute list and
//! a free-function API over [`Element`](crate::engine::Element) handles.
//! Constructors are registered through [`register_builtin`], which the
//! default definition registry calls on first use.

pub mod button;
pub mod container;
pub mod editable;
pub mod form;
pub mod input;
pub mod textarea;
pub mod validation;

use crate::engine::DefinitionRegistry;

/// Register the built-in widget definitions. Idempotent per registry.
pub fn register_builtin(registry: &DefinitionRegistry) {
    registry.define(button::TAG, button::construct);
    registry.define(input::TAG, input::construct);
    registry.define(textarea::TAG, textarea::construct);
    registry.define(container::TAG, container::construct);
}
