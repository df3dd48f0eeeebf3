use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{bbox::Bbox, labels::ElementKind};

/// Stable identifier of a detected element.
///
/// Assigned before layout and used to join the layout tree with the
/// extracted properties afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A detected design element: one box with a kind and a class id.
///
/// The grouping predicates key on `class_id`; `kind` travels along for the
/// export layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub id: ElementId,
    pub kind: ElementKind,
    pub class_id: u32,
    pub bbox: Bbox,
    /// Detector confidence, only consulted by overlap suppression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Element {
    /// A new element with a fresh id and the kind's detector class id.
    pub fn new(kind: ElementKind, bbox: Bbox) -> Self {
        let class_id = kind.class_id().unwrap_or_default();
        Self {
            id: ElementId::new(),
            kind,
            class_id,
            bbox,
            score: None,
        }
    }

    pub fn with_id(mut self, id: ElementId) -> Self {
        self.id = id;
        self
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_new() {
        let image = Element::new(ElementKind::Image, Bbox::from_corners(0.0, 0.0, 1.0, 1.0));
        assert_eq!(image.class_id, 5);
        assert_eq!(image.score, None);

        let other = Element::new(
            ElementKind::from("toggle"),
            Bbox::from_corners(0.0, 0.0, 1.0, 1.0),
        );
        assert_eq!(other.class_id, 0);
        assert_ne!(image.id, other.id);
    }

    #[test]
    fn test_element_deserialize() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000007",
            "kind": "radiobutton",
            "class_id": 2,
            "bbox": [0, 25, 100, 45],
            "score": 0.9
        }"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.id, ElementId::from_u128(7));
        assert_eq!(element.kind, ElementKind::RadioButton);
        assert_eq!(element.bbox, Bbox::from_corners(0.0, 25.0, 100.0, 45.0));
        assert_eq!(element.score, Some(0.9));

        // Missing ids are generated
        let element: Element =
            serde_json::from_str(r#"{"kind": "image", "class_id": 5, "bbox": [0, 0, 1, 1]}"#)
                .unwrap();
        assert_eq!(element.score, None);
        assert_ne!(element.id, ElementId::from_u128(0));
    }
}
