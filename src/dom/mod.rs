//! Host-facing surfaces: render fragments and custom events.

pub mod events;
pub mod fragment;

pub use events::{EventDetail, NativeEvent, UiEvent, dispatch, listen, listener_count};
pub use fragment::{Fragment, FragmentNode, NodeId};
