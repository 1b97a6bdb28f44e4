//! Shared interaction state: focus ownership and keyboard routing.

pub mod focus;
pub mod keyboard;

// focus()/blur() stay behind the module path so they cannot shadow the
// widgets' own focus/blur functions.
pub use focus::{FocusCallbacks, get_focused_index, has_focus, is_focused};
pub use keyboard::{KeyState, KeyboardEvent, Modifiers, dispatch_focused, on_focused};
