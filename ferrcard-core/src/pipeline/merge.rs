use std::collections::{BTreeSet, HashMap};

use snafu::ensure;

use crate::{
    error::{LayoutError, PropertyMergeMismatchSnafu},
    layout::{
        element::ElementId,
        export::{LayoutNodeView, Properties},
        tree::LayoutTree,
    },
};

/// A layout tree joined with the properties of its elements.
#[derive(Clone, Debug)]
pub struct CardLayout {
    pub tree: LayoutTree,
    pub properties: HashMap<ElementId, Properties>,
}

impl CardLayout {
    pub fn to_nodes(&self) -> Vec<LayoutNodeView> {
        self.tree.to_nodes_with(Some(&self.properties))
    }
}

/// Joins `tree` with `properties` by element id.
///
/// Every element of the tree needs exactly one record and every record
/// needs an element; otherwise both sides of the mismatch are reported.
pub fn merge_properties(
    tree: LayoutTree,
    properties: HashMap<ElementId, Properties>,
) -> Result<CardLayout, LayoutError> {
    let layout_ids: BTreeSet<ElementId> = tree.elements().iter().map(|e| e.id).collect();
    let property_ids: BTreeSet<ElementId> = properties.keys().copied().collect();

    let missing_properties: Vec<ElementId> =
        layout_ids.difference(&property_ids).copied().collect();
    let missing_layout: Vec<ElementId> = property_ids.difference(&layout_ids).copied().collect();
    ensure!(
        missing_properties.is_empty() && missing_layout.is_empty(),
        PropertyMergeMismatchSnafu {
            missing_properties,
            missing_layout,
        }
    );

    Ok(CardLayout { tree, properties })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::{bbox::Bbox, labels::ElementKind},
        arrange::generate_layout,
        grouping::config::GroupingConfig,
        layout::element::Element,
    };

    fn tree(ids: &[u128]) -> LayoutTree {
        let elements: Vec<Element> = ids
            .iter()
            .map(|id| {
                let y = *id as f32 * 100.0;
                Element::new(ElementKind::Textbox, Bbox::from_corners(0.0, y, 50.0, y + 20.0))
                    .with_id(ElementId::from_u128(*id))
            })
            .collect();
        generate_layout(&elements, &GroupingConfig::default()).unwrap()
    }

    fn properties(ids: &[u128]) -> HashMap<ElementId, Properties> {
        ids.iter()
            .map(|id| {
                let mut record = Properties::new();
                record.insert("text".to_string(), serde_json::json!(format!("text {id}")));
                (ElementId::from_u128(*id), record)
            })
            .collect()
    }

    #[test]
    fn test_merge_matching() {
        let card = merge_properties(tree(&[1, 2]), properties(&[1, 2])).unwrap();
        let nodes = serde_json::to_value(card.to_nodes()).unwrap();
        assert_eq!(nodes[0]["properties"]["text"], "text 1");
        assert_eq!(nodes[1]["properties"]["text"], "text 2");
    }

    #[test]
    fn test_merge_missing_properties() {
        let err = merge_properties(tree(&[1, 2, 3]), properties(&[1, 3])).unwrap_err();
        match err {
            LayoutError::PropertyMergeMismatch {
                missing_properties,
                missing_layout,
            } => {
                assert_eq!(missing_properties, vec![ElementId::from_u128(2)]);
                assert!(missing_layout.is_empty());
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_merge_orphan_properties() {
        let err = merge_properties(tree(&[1]), properties(&[1, 4, 5])).unwrap_err();
        match err {
            LayoutError::PropertyMergeMismatch {
                missing_properties,
                missing_layout,
            } => {
                assert!(missing_properties.is_empty());
                assert_eq!(
                    missing_layout,
                    vec![ElementId::from_u128(4), ElementId::from_u128(5)]
                );
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_merge_empty() {
        let card = merge_properties(LayoutTree::new(), HashMap::new()).unwrap();
        assert!(card.to_nodes().is_empty());
    }
}
