//! Per-element edit buffers.
//!
//! Activating edit mode on an element seeds a text buffer with its current
//! content. Committing writes the buffer back through
//! [`ElementList::update`]; cancelling drops the buffer without touching the
//! list. Any number of elements may be in edit mode at the same time.

use std::collections::HashMap;

use crate::element::{ElementId, ElementPatch, FunnelElement};
use crate::element_list::ElementList;

#[derive(Debug, Clone, Default)]
pub struct EditSessions {
    buffers: HashMap<ElementId, String>,
}

impl EditSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self, id: &ElementId) -> bool {
        self.buffers.contains_key(id)
    }

    pub fn buffer(&self, id: &ElementId) -> Option<&str> {
        self.buffers.get(id).map(String::as_str)
    }

    /// Ids of all elements currently in edit mode.
    pub fn editing(&self) -> impl Iterator<Item = &ElementId> {
        self.buffers.keys()
    }

    /// Enter edit mode, seeding the buffer with the element's content.
    /// Re-entering an element already in edit mode keeps its pending buffer.
    pub fn begin(&mut self, element: &FunnelElement) -> &str {
        self.buffers
            .entry(element.id.clone())
            .or_insert_with(|| element.content.clone())
    }

    /// Replace the pending text. Returns `false` if the element is not being
    /// edited.
    pub fn set_buffer(&mut self, id: &ElementId, text: impl Into<String>) -> bool {
        match self.buffers.get_mut(id) {
            Some(buffer) => {
                *buffer = text.into();
                true
            }
            None => false,
        }
    }

    /// Leave edit mode without applying the buffer.
    pub fn cancel(&mut self, id: &ElementId) -> bool {
        self.buffers.remove(id).is_some()
    }

    /// The Edit/Cancel button: begin editing, or cancel if already editing.
    /// Returns whether the element is in edit mode afterwards.
    pub fn toggle(&mut self, element: &FunnelElement) -> bool {
        if self.cancel(&element.id) {
            false
        } else {
            self.begin(element);
            true
        }
    }

    /// Apply the pending buffer to `list` and leave edit mode.
    ///
    /// Returns `false` when there was no buffer or the element no longer
    /// exists in the list; the buffer is discarded either way.
    pub fn commit(&mut self, id: &ElementId, list: &mut ElementList) -> bool {
        match self.buffers.remove(id) {
            Some(text) => list.update(id, &ElementPatch::content(text)),
            None => false,
        }
    }

    /// Drop buffers of elements that are no longer in `list`.
    pub fn retain_existing(&mut self, list: &ElementList) {
        self.buffers.retain(|id, _| list.contains(id));
    }

    pub fn clear(&mut self) {
        self.buffers.clear();
    }
}
