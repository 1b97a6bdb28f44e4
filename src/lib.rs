//! # ember-ui
//!
//! Attribute-driven UI element primitives: button, single-line input,
//! multi-line textarea and a layout container, built on a shared
//! synchronization protocol.
//!
//! The protocol, in one paragraph: attributes are the declarative
//! configuration surface, and at any point after construction the rendered
//! state is a pure function of the current attributes plus (for editable
//! widgets) the internal value. Setting an attribute to its current value is
//! a no-op. External attribute writes dispatch change hooks; internal value
//! mirroring never does, so a change handler can never re-enter the edit it
//! was caused by. Events emit synchronously.
//!
//! ```no_run
//! use ember_ui::engine::create_element;
//! use ember_ui::widgets::{button, input};
//!
//! let submit = create_element(button::TAG).unwrap();
//! submit.set_attribute("label", "Save");
//! submit.set_attribute("variant", "primary");
//! submit.connect();
//!
//! let name = create_element(input::TAG).unwrap();
//! name.set_attribute("required", "");
//! name.connect();
//!
//! let _cleanup = submit.on(button::CLICK_EVENT, move |_| {
//!     if input::check_validity(&name) {
//!         println!("submitting {}", input::value(&name));
//!     }
//! });
//! ```

pub mod dom;
pub mod engine;
pub mod state;
pub mod theme;
pub mod types;
pub mod widgets;

pub use dom::{EventDetail, Fragment, NativeEvent, UiEvent};
pub use engine::{DefinitionRegistry, Element, create_element, reset_registry};
pub use types::{ButtonKind, ButtonVariant, CounterSeverity, EditOperation, LayoutMode};
pub use widgets::form::Form;
pub use widgets::validation::{Validity, ValidityFlags};
