//! The funnel aggregate: a named, ordered list of elements.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::advisory::FunnelTemplate;
use crate::element_list::ElementList;
use crate::types::{DbId, Timestamp};

/// Name given to a freshly created, unsaved funnel.
pub const DEFAULT_FUNNEL_NAME: &str = "New Funnel";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funnel {
    /// Assigned by the funnel service on first save; `None` while unsaved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub elements: ElementList,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Funnel {
    /// An unsaved funnel with no elements, both timestamps set to `now`.
    pub fn draft(now: Timestamp) -> Self {
        Self {
            id: None,
            name: DEFAULT_FUNNEL_NAME.to_string(),
            description: String::new(),
            elements: ElementList::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Replace the element list and refresh `updated_at`.
    pub fn set_elements(&mut self, elements: ElementList) {
        self.elements = elements;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Replace name and elements with those of a generated template.
    /// Every template element gets a fresh id.
    pub fn apply_template(&mut self, template: &FunnelTemplate) {
        self.name = template.name.clone();
        self.set_elements(template.to_elements());
    }
}
