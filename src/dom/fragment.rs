//! Render Fragment - the element-owned node tree.
//!
//! Each element allocates its fragment once at construction and mutates it
//! in place on every synchronization pass; the node structure is never
//! recreated. Externally the fragment is reachable only through declared
//! style parts and CSS custom properties (the styling encapsulation
//! boundary).
//!
//! Every setter is change-guarded and bumps a mutation counter only on a
//! real change, which makes "setting an attribute to its current value
//! triggers no re-render" directly observable in tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// Index of a node within its fragment.
pub type NodeId = usize;

// =============================================================================
// Node
// =============================================================================

/// A single node in a fragment.
#[derive(Debug, Default)]
pub struct FragmentNode {
    /// Element tag ("button", "div", ...).
    pub tag: String,
    /// Declared style part name, if exposed.
    part: Option<String>,
    /// Text content.
    text: String,
    /// DOM attributes (class, role, aria-*, ...).
    attributes: BTreeMap<String, String>,
    /// Inline styles.
    styles: BTreeMap<String, String>,
    /// CSS custom properties (`--ui-*`).
    custom_properties: BTreeMap<String, String>,
    /// Hidden flag.
    hidden: bool,
    /// Child node ids.
    children: Vec<NodeId>,
}

// =============================================================================
// Fragment
// =============================================================================

/// An element-owned node tree.
pub struct Fragment {
    nodes: Vec<FragmentNode>,
    mutations: u64,
}

impl Fragment {
    /// Id of the root node.
    pub const ROOT: NodeId = 0;

    /// Create a fragment with a root node of the given tag.
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![FragmentNode {
                tag: root_tag.to_string(),
                ..Default::default()
            }],
            mutations: 0,
        }
    }

    /// Append a child node. Structure is built once at construction.
    pub fn append_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(FragmentNode {
            tag: tag.to_string(),
            ..Default::default()
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Declare a node as a named style part.
    pub fn set_part(&mut self, id: NodeId, part: &str) {
        self.nodes[id].part = Some(part.to_string());
    }

    /// Find a node by its declared part name.
    pub fn node_by_part(&self, part: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.part.as_deref() == Some(part))
    }

    /// Child node ids of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Number of in-place mutations applied since construction.
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    // =========================================================================
    // Text
    // =========================================================================

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if self.nodes[id].text == text {
            return;
        }
        self.nodes[id].text = text.to_string();
        self.mutations += 1;
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id].text
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if self.nodes[id].attributes.get(name).map(String::as_str) == Some(value) {
            return;
        }
        self.nodes[id]
            .attributes
            .insert(name.to_string(), value.to_string());
        self.mutations += 1;
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if self.nodes[id].attributes.remove(name).is_some() {
            self.mutations += 1;
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id].attributes.get(name).map(String::as_str)
    }

    // =========================================================================
    // Styles
    // =========================================================================

    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        if self.nodes[id].styles.get(property).map(String::as_str) == Some(value) {
            return;
        }
        self.nodes[id]
            .styles
            .insert(property.to_string(), value.to_string());
        self.mutations += 1;
    }

    pub fn remove_style(&mut self, id: NodeId, property: &str) {
        if self.nodes[id].styles.remove(property).is_some() {
            self.mutations += 1;
        }
    }

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.nodes[id].styles.get(property).map(String::as_str)
    }

    // =========================================================================
    // Custom Properties (the theming surface)
    // =========================================================================

    pub fn set_custom_property(&mut self, id: NodeId, name: &str, value: &str) {
        if self.nodes[id].custom_properties.get(name).map(String::as_str) == Some(value) {
            return;
        }
        self.nodes[id]
            .custom_properties
            .insert(name.to_string(), value.to_string());
        self.mutations += 1;
    }

    pub fn remove_custom_property(&mut self, id: NodeId, name: &str) {
        if self.nodes[id].custom_properties.remove(name).is_some() {
            self.mutations += 1;
        }
    }

    pub fn custom_property(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id].custom_properties.get(name).map(String::as_str)
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if self.nodes[id].hidden == hidden {
            return;
        }
        self.nodes[id].hidden = hidden;
        self.mutations += 1;
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.nodes[id].hidden
    }
}

// =============================================================================
// Per-Element Store
// =============================================================================

thread_local! {
    static FRAGMENTS: RefCell<HashMap<usize, Fragment>> = RefCell::new(HashMap::new());
}

/// Install the fragment for an element. Called once at construction.
pub fn install(index: usize, fragment: Fragment) {
    FRAGMENTS.with(|map| {
        map.borrow_mut().insert(index, fragment);
    });
}

/// Read an element's fragment. Returns None for a missing fragment
/// (guarded no-op, never a fault).
pub fn with<R>(index: usize, f: impl FnOnce(&Fragment) -> R) -> Option<R> {
    FRAGMENTS.with(|map| map.borrow().get(&index).map(f))
}

/// Mutate an element's fragment in place. Returns None for a missing
/// fragment.
pub fn with_mut<R>(index: usize, f: impl FnOnce(&mut Fragment) -> R) -> Option<R> {
    FRAGMENTS.with(|map| map.borrow_mut().get_mut(&index).map(f))
}

/// Mutation count for an element's fragment (0 when missing).
pub fn mutation_count(index: usize) -> u64 {
    with(index, Fragment::mutation_count).unwrap_or(0)
}

pub(crate) fn clear(index: usize) {
    FRAGMENTS.with(|map| {
        map.borrow_mut().remove(&index);
    });
}

pub(crate) fn reset() {
    FRAGMENTS.with(|map| map.borrow_mut().clear());
}
