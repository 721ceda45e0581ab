//! Funnel element types and their default content.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Opaque element identifier, generated client-side when the element is added.
///
/// Stable for the element's lifetime; used as the key for update, delete and
/// edit-buffer lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh UUID v4 based id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of content block. Determines rendering and default content.
///
/// Serialised as a lowercase string. Any string outside the known set
/// deserialises to [`ElementType::Unknown`] so stored funnels written by a
/// newer client still load and render through the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum ElementType {
    Header,
    Text,
    Image,
    Button,
    Form,
    Video,
    Unknown,
}

impl ElementType {
    /// Element types offered by the builder toolbox, in display order.
    pub const PALETTE: [ElementType; 6] = [
        ElementType::Header,
        ElementType::Text,
        ElementType::Image,
        ElementType::Button,
        ElementType::Form,
        ElementType::Video,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Header => "header",
            ElementType::Text => "text",
            ElementType::Image => "image",
            ElementType::Button => "button",
            ElementType::Form => "form",
            ElementType::Video => "video",
            ElementType::Unknown => "unknown",
        }
    }

    /// Parse a type name, case-insensitively. Unrecognised names map to
    /// [`ElementType::Unknown`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "header" => ElementType::Header,
            "text" => ElementType::Text,
            "image" => ElementType::Image,
            "button" => ElementType::Button,
            "form" => ElementType::Form,
            "video" => ElementType::Video,
            _ => ElementType::Unknown,
        }
    }

    /// Placeholder content for a freshly added element.
    pub fn default_content(self) -> String {
        format!("New {} element", self.as_str())
    }
}

impl From<String> for ElementType {
    fn from(value: String) -> Self {
        ElementType::parse(&value)
    }
}

impl From<ElementType> for &'static str {
    fn from(value: ElementType) -> Self {
        value.as_str()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One content block within a funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelElement {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub content: String,
}

impl FunnelElement {
    /// Create an element with a fresh id and the type's placeholder content.
    pub fn new(element_type: ElementType) -> Self {
        Self::with_content(element_type, element_type.default_content())
    }

    pub fn with_content(element_type: ElementType, content: impl Into<String>) -> Self {
        Self {
            id: ElementId::generate(),
            element_type,
            content: content.into(),
        }
    }
}

/// Partial update of an element's mutable fields. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, rename = "type")]
    pub element_type: Option<ElementType>,
}

impl ElementPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            element_type: None,
        }
    }

    /// Patches may only switch an element to one of the palette types.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.element_type == Some(ElementType::Unknown) {
            return Err(CoreError::Validation("Unknown element type".to_string()));
        }
        Ok(())
    }

    pub(crate) fn apply_to(&self, element: &mut FunnelElement) {
        if let Some(content) = &self.content {
            element.content = content.clone();
        }
        if let Some(element_type) = self.element_type {
            element.element_type = element_type;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_content_names_the_type() {
        assert_eq!(ElementType::Header.default_content(), "New header element");
        assert_eq!(ElementType::Video.default_content(), "New video element");
    }

    #[test]
    fn parse_is_case_insensitive_and_total() {
        assert_eq!(ElementType::parse("BUTTON"), ElementType::Button);
        assert_eq!(ElementType::parse(" form "), ElementType::Form);
        assert_eq!(ElementType::parse("carousel"), ElementType::Unknown);
        assert_eq!(ElementType::parse(""), ElementType::Unknown);
    }

    #[test]
    fn palette_excludes_unknown() {
        assert_eq!(ElementType::PALETTE.len(), 6);
        assert!(!ElementType::PALETTE.contains(&ElementType::Unknown));
    }

    #[test]
    fn patch_to_unknown_type_is_invalid() {
        let patch: ElementPatch = serde_json::from_str(r#"{"type":"carousel"}"#).unwrap();
        assert!(matches!(patch.validate(), Err(CoreError::Validation(_))));
        assert!(ElementPatch::content("hi").validate().is_ok());
    }

    #[test]
    fn new_elements_get_distinct_ids() {
        let a = FunnelElement::new(ElementType::Text);
        let b = FunnelElement::new(ElementType::Text);
        assert_ne!(a.id, b.id);
        assert_eq!(a.content, "New text element");
    }

    #[test]
    fn element_serialises_type_field_lowercase() {
        let element = FunnelElement {
            id: ElementId::from("abc"),
            element_type: ElementType::Header,
            content: "Hello".into(),
        };
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["type"], "header");
        assert_eq!(json["content"], "Hello");
    }

    #[test]
    fn unrecognised_type_deserialises_to_unknown() {
        let json = serde_json::json!({"id": "x", "type": "heading", "content": "Hi"});
        let element: FunnelElement = serde_json::from_value(json).unwrap();
        assert_eq!(element.element_type, ElementType::Unknown);
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut element = FunnelElement::with_content(ElementType::Text, "before");
        let id = element.id.clone();

        ElementPatch::default().apply_to(&mut element);
        assert_eq!(element.content, "before");

        ElementPatch::content("after").apply_to(&mut element);
        assert_eq!(element.content, "after");
        assert_eq!(element.element_type, ElementType::Text);
        assert_eq!(element.id, id);
    }
}
