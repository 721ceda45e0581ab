//! Ordered element sequence of the funnel being edited.
//!
//! Order is rendering order. The list offers the structural mutations the
//! builder needs: add, update, delete and single-element reorder.
//!
//! `update` and `delete` report whether anything changed instead of failing
//! on an unknown id, so callers that care can tell "updated" from "not
//! found" while the list itself keeps the permissive no-op behaviour.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementPatch, ElementType, FunnelElement};
use crate::error::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementList {
    elements: Vec<FunnelElement>,
}

impl ElementList {
    pub fn new() -> Self {
        Self::default()
    }

    /// The starter content shown when the builder opens without a funnel.
    pub fn demo() -> Self {
        Self::from(vec![
            FunnelElement::with_content(ElementType::Header, "Welcome to Our Product"),
            FunnelElement::with_content(
                ElementType::Text,
                "This amazing product will solve all your problems.",
            ),
            FunnelElement::with_content(ElementType::Button, "Sign Up Now"),
        ])
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FunnelElement> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[FunnelElement] {
        &self.elements
    }

    pub fn get(&self, id: &ElementId) -> Option<&FunnelElement> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn position(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.position(id).is_some()
    }

    /// Append a new element of `element_type` with placeholder content.
    pub fn add(&mut self, element_type: ElementType) -> &FunnelElement {
        self.push(FunnelElement::new(element_type))
    }

    /// Append an already constructed element.
    pub fn push(&mut self, element: FunnelElement) -> &FunnelElement {
        self.elements.push(element);
        let last = self.elements.len() - 1;
        &self.elements[last]
    }

    /// Apply `patch` to the element with `id`. Returns `false` (and leaves the
    /// list untouched) when no such element exists.
    pub fn update(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        match self.elements.iter_mut().find(|e| &e.id == id) {
            Some(element) => {
                patch.apply_to(element);
                true
            }
            None => false,
        }
    }

    /// Remove the element with `id`. Returns `false` when it was not present.
    pub fn delete(&mut self, id: &ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| &e.id != id);
        self.elements.len() != before
    }

    /// Move the element at `from` so that it ends up at index `to`.
    ///
    /// This is a remove-then-insert move, not a swap: elements between the
    /// two positions shift by one and keep their relative order.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        let len = self.elements.len();
        if from >= len || to >= len {
            return Err(CoreError::Validation(format!(
                "Reorder indices out of range: from {from}, to {to}, length {len}"
            )));
        }
        if from != to {
            let moved = self.elements.remove(from);
            self.elements.insert(to, moved);
        }
        Ok(())
    }

    /// Apply the result of a drag gesture.
    ///
    /// A drop with no destination, or one outside the list, is a cancelled
    /// drag: nothing changes and `false` is returned.
    pub fn apply_drop(&mut self, source: usize, destination: Option<usize>) -> bool {
        match destination {
            Some(to) => self.reorder(source, to).is_ok(),
            None => false,
        }
    }

    /// Build a list from client-supplied elements, rejecting repeated ids.
    pub fn try_from_vec(elements: Vec<FunnelElement>) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(elements.len());
        for element in &elements {
            if !seen.insert(&element.id) {
                return Err(CoreError::Validation(format!(
                    "Duplicate element id: {}",
                    element.id
                )));
            }
        }
        Ok(Self { elements })
    }

    pub fn into_vec(self) -> Vec<FunnelElement> {
        self.elements
    }
}

impl From<Vec<FunnelElement>> for ElementList {
    fn from(elements: Vec<FunnelElement>) -> Self {
        Self { elements }
    }
}

impl<'a> IntoIterator for &'a ElementList {
    type Item = &'a FunnelElement;
    type IntoIter = std::slice::Iter<'a, FunnelElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
