//! Form - a named-value collection over editable widgets.
//!
//! Groups editable elements for submission: named, non-disabled members
//! contribute `(name, value)` pairs, and the group is valid only when every
//! member is.

use std::cell::RefCell;

use crate::engine::{Element, attributes, registry};
use crate::widgets::{editable, validation};

/// A group of editable elements collected for submission.
#[derive(Default)]
pub struct Form {
    members: RefCell<Vec<usize>>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element to the group.
    pub fn add(&self, element: &Element) {
        let mut members = self.members.borrow_mut();
        if !members.contains(&element.index()) {
            members.push(element.index());
        }
    }

    /// Remove an element from the group.
    pub fn remove(&self, element: &Element) {
        self.members.borrow_mut().retain(|member| *member != element.index());
    }

    /// `(name, value)` pairs from named, non-disabled, still-mounted
    /// members, in insertion order.
    pub fn submission_payload(&self) -> Vec<(String, String)> {
        self.members
            .borrow()
            .iter()
            .filter(|&&index| registry::is_allocated(index))
            .filter(|&&index| !attributes::has(index, "disabled"))
            .filter_map(|&index| {
                attributes::get(index, "name").map(|name| (name, editable::value(index)))
            })
            .collect()
    }

    /// Whether every member satisfies its constraints.
    pub fn check_validity(&self) -> bool {
        self.validation_messages().is_empty()
    }

    /// Failure messages from invalid members, in insertion order.
    pub fn validation_messages(&self) -> Vec<String> {
        self.members
            .borrow()
            .iter()
            .filter(|&&index| registry::is_allocated(index))
            .filter_map(|&index| {
                let constraints = validation::Constraints::from_attributes(index);
                let custom = editable::custom_validity(index);
                validation::check(&editable::value(index), &constraints, custom.as_deref()).message
            })
            .collect()
    }
}
