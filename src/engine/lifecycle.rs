//! Element Lifecycle - explicit state machine over the platform hooks.
//!
//! Each element moves through `Constructed → Connected → Disconnected`.
//! Widget constructors register [`LifecycleHooks`] with named transition
//! functions; [`connect`] runs one full synchronization pass via the attach
//! hooks, attribute changes while connected run the change hooks, and
//! [`disconnect`] runs the detach hooks after which no further
//! synchronization happens.
//!
//! Constructors must not read attributes - they only allocate the fragment
//! and register hooks. The first attribute read happens in the attach pass.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// =============================================================================
// Phase
// =============================================================================

/// Lifecycle phase of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Allocated, not yet part of the live tree. Attributes may be set but
    /// are not synchronized.
    #[default]
    Constructed,
    /// Part of the live tree; attribute changes synchronize.
    Connected,
    /// Removed from the live tree; no further synchronization.
    Disconnected,
}

// =============================================================================
// Hooks
// =============================================================================

/// Named transition functions bound by a widget constructor.
///
/// `Rc` so the registry can clone handlers out before invoking them,
/// releasing its borrow (hooks may trigger further attribute writes).
#[derive(Default)]
pub struct LifecycleHooks {
    /// Runs on connection: one full synchronization pass.
    pub on_attach: Option<Rc<dyn Fn(usize)>>,
    /// Runs per observed-attribute change while connected.
    /// Arguments: index, name, old value, new value.
    pub on_attribute_change: Option<Rc<dyn Fn(usize, &str, Option<&str>, Option<&str>)>>,
    /// Runs on disconnection.
    pub on_detach: Option<Rc<dyn Fn(usize)>>,
}

thread_local! {
    static PHASES: RefCell<HashMap<usize, Phase>> = RefCell::new(HashMap::new());
    static HOOKS: RefCell<HashMap<usize, Vec<LifecycleHooks>>> = RefCell::new(HashMap::new());
}

/// Get the lifecycle phase of an element.
pub fn phase(index: usize) -> Phase {
    PHASES.with(|map| map.borrow().get(&index).copied().unwrap_or_default())
}

/// Check whether an element is connected.
pub fn is_connected(index: usize) -> bool {
    phase(index) == Phase::Connected
}

/// Register lifecycle hooks for an element.
/// Returns a cleanup function to unregister.
pub fn register_hooks(index: usize, hooks: LifecycleHooks) -> impl FnOnce() {
    let hook_id = HOOKS.with(|reg| {
        let mut reg = reg.borrow_mut();
        let list = reg.entry(index).or_default();
        let id = list.len();
        list.push(hooks);
        id
    });

    move || {
        HOOKS.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(list) = reg.get_mut(&index) {
                if hook_id < list.len() {
                    list[hook_id] = LifecycleHooks::default();
                }
            }
        });
    }
}

// =============================================================================
// Transitions
// =============================================================================

/// Connect an element: transition to `Connected` and run the attach hooks
/// (the full synchronization pass).
pub fn connect(index: usize) {
    PHASES.with(|map| {
        map.borrow_mut().insert(index, Phase::Connected);
    });
    tracing::debug!(index, "element connected");

    let attach: Vec<Rc<dyn Fn(usize)>> = HOOKS.with(|reg| {
        reg.borrow()
            .get(&index)
            .map(|list| list.iter().filter_map(|h| h.on_attach.clone()).collect())
            .unwrap_or_default()
    });
    for hook in attach {
        hook(index);
    }
}

/// Disconnect an element: run the detach hooks and stop synchronizing.
pub fn disconnect(index: usize) {
    if phase(index) != Phase::Connected {
        return;
    }
    let detach: Vec<Rc<dyn Fn(usize)>> = HOOKS.with(|reg| {
        reg.borrow()
            .get(&index)
            .map(|list| list.iter().filter_map(|h| h.on_detach.clone()).collect())
            .unwrap_or_default()
    });
    for hook in detach {
        hook(index);
    }
    PHASES.with(|map| {
        map.borrow_mut().insert(index, Phase::Disconnected);
    });
    tracing::debug!(index, "element disconnected");
}

/// Run attribute-change hooks for a connected element.
pub(crate) fn run_attribute_change(
    index: usize,
    name: &str,
    old: Option<&str>,
    new: Option<&str>,
) {
    type ChangeHook = Rc<dyn Fn(usize, &str, Option<&str>, Option<&str>)>;
    let hooks: Vec<ChangeHook> = HOOKS.with(|reg| {
        reg.borrow()
            .get(&index)
            .map(|list| {
                list.iter()
                    .filter_map(|h| h.on_attribute_change.clone())
                    .collect()
            })
            .unwrap_or_default()
    });
    for hook in hooks {
        hook(index, name, old, new);
    }
}

// =============================================================================
// Cleanup
// =============================================================================

pub(crate) fn clear(index: usize) {
    PHASES.with(|map| {
        map.borrow_mut().remove(&index);
    });
    HOOKS.with(|map| {
        map.borrow_mut().remove(&index);
    });
}

pub(crate) fn reset() {
    PHASES.with(|map| map.borrow_mut().clear());
    HOOKS.with(|map| map.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::registry::reset_registry;
    use std::cell::Cell;

    fn setup() {
        reset_registry();
    }

    #[test]
    fn test_phase_transitions() {
        setup();

        assert_eq!(phase(0), Phase::Constructed);
        connect(0);
        assert_eq!(phase(0), Phase::Connected);
        disconnect(0);
        assert_eq!(phase(0), Phase::Disconnected);
    }

    #[test]
    fn test_attach_runs_on_connect() {
        setup();

        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();
        let _cleanup = register_hooks(
            0,
            LifecycleHooks {
                on_attach: Some(Rc::new(move |_| ran_clone.set(true))),
                ..Default::default()
            },
        );

        assert!(!ran.get());
        connect(0);
        assert!(ran.get());
    }

    #[test]
    fn test_detach_runs_once() {
        setup();

        let count = Rc::new(Cell::new(0u32));
        let count_clone = count.clone();
        let _cleanup = register_hooks(
            0,
            LifecycleHooks {
                on_detach: Some(Rc::new(move |_| count_clone.set(count_clone.get() + 1))),
                ..Default::default()
            },
        );

        connect(0);
        disconnect(0);
        disconnect(0); // already disconnected - no-op
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unregistered_hooks_do_not_run() {
        setup();

        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();
        let cleanup = register_hooks(
            0,
            LifecycleHooks {
                on_attach: Some(Rc::new(move |_| ran_clone.set(true))),
                ..Default::default()
            },
        );

        cleanup();
        connect(0);
        assert!(!ran.get());
    }
}
