use serde::{Deserialize, Serialize};

use crate::consts::{CHOICE_CLASS, IMAGE_CLASS};

/// Kind of a detected card element, as tagged by the object detector.
///
/// Tags the engine does not know survive as [`ElementKind::Unknown`] so that
/// detector upgrades never fail ingestion.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Textbox,
    RadioButton,
    Checkbox,
    ActionSet,
    Image,
    RichText,
    Unknown(String),
}

impl ElementKind {
    /// The detector tag of this kind.
    pub fn name(&self) -> &str {
        match self {
            ElementKind::Textbox => "textbox",
            ElementKind::RadioButton => "radiobutton",
            ElementKind::Checkbox => "checkbox",
            ElementKind::ActionSet => "actionset",
            ElementKind::Image => "image",
            ElementKind::RichText => "richtextbox",
            ElementKind::Unknown(tag) => tag.as_str(),
        }
    }

    /// Class id the detector assigns to this kind, if it is a known one.
    ///
    /// Rich text is detected as a text box.
    pub fn class_id(&self) -> Option<u32> {
        match self {
            ElementKind::Textbox | ElementKind::RichText => Some(1),
            ElementKind::RadioButton => Some(CHOICE_CLASS),
            ElementKind::Checkbox => Some(3),
            ElementKind::ActionSet => Some(4),
            ElementKind::Image => Some(IMAGE_CLASS),
            ElementKind::Unknown(_) => None,
        }
    }
}

impl From<&str> for ElementKind {
    fn from(tag: &str) -> Self {
        match tag {
            "textbox" => ElementKind::Textbox,
            "radiobutton" => ElementKind::RadioButton,
            "checkbox" => ElementKind::Checkbox,
            "actionset" => ElementKind::ActionSet,
            "image" => ElementKind::Image,
            "richtextbox" => ElementKind::RichText,
            other => ElementKind::Unknown(other.to_string()),
        }
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        ElementKind::from(tag.as_str())
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.name().to_string()
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        for kind in [
            ElementKind::Textbox,
            ElementKind::RadioButton,
            ElementKind::Checkbox,
            ElementKind::ActionSet,
            ElementKind::Image,
            ElementKind::RichText,
        ] {
            assert_eq!(ElementKind::from(kind.name()), kind);
        }

        let other = ElementKind::from("toggle");
        assert_eq!(other, ElementKind::Unknown("toggle".to_string()));
        assert_eq!(other.name(), "toggle");
        assert_eq!(other.class_id(), None);
    }

    #[test]
    fn test_kind_class_ids() {
        assert_eq!(ElementKind::Image.class_id(), Some(IMAGE_CLASS));
        assert_eq!(ElementKind::RadioButton.class_id(), Some(CHOICE_CLASS));
        assert_eq!(ElementKind::RichText.class_id(), ElementKind::Textbox.class_id());
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&ElementKind::RadioButton).unwrap();
        assert_eq!(json, "\"radiobutton\"");
        let kind: ElementKind = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(kind, ElementKind::Image);
    }
}
