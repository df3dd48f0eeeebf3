use std::{collections::HashMap, fmt::Write};

use serde::{Deserialize, Serialize};

use crate::{
    analysis::{bbox::Bbox, labels::ElementKind},
    layout::{
        element::ElementId,
        tree::{LayoutTree, NodeId, NodeKind},
    },
};

/// Property record extracted for one element (text, colors, sizes...).
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Nested, serializable view of a layout node.
///
/// This is the structure the card export layer consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum LayoutNodeView {
    Item {
        uuid: ElementId,
        kind: ElementKind,
        class: u32,
        coordinates: Bbox,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<Properties>,
    },
    #[serde(rename = "columnset")]
    ColumnSet {
        row: Vec<LayoutNodeView>,
        coordinates: Bbox,
    },
    Column {
        column: Items,
        coordinates: Bbox,
    },
    ImageSet {
        imageset: Items,
        coordinates: Bbox,
    },
    ChoiceSet {
        choiceset: Items,
        coordinates: Bbox,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Items {
    pub items: Vec<LayoutNodeView>,
}

impl LayoutTree {
    /// The nested view of the whole tree, roots in order.
    pub fn to_nodes(&self) -> Vec<LayoutNodeView> {
        self.to_nodes_with(None)
    }

    /// The nested view, attaching each item's properties when given.
    pub fn to_nodes_with(
        &self,
        properties: Option<&HashMap<ElementId, Properties>>,
    ) -> Vec<LayoutNodeView> {
        self.roots()
            .iter()
            .map(|id| self.view(*id, properties))
            .collect()
    }

    fn view(
        &self,
        id: NodeId,
        properties: Option<&HashMap<ElementId, Properties>>,
    ) -> LayoutNodeView {
        let node = self.node(id);
        let coordinates = node.bbox;
        let children = || {
            node.children
                .iter()
                .map(|child| self.view(*child, properties))
                .collect::<Vec<_>>()
        };

        match &node.kind {
            NodeKind::Item(element) => LayoutNodeView::Item {
                uuid: element.id,
                kind: element.kind.clone(),
                class: element.class_id,
                coordinates,
                properties: properties.and_then(|props| props.get(&element.id).cloned()),
            },
            NodeKind::Row => LayoutNodeView::ColumnSet {
                row: children(),
                coordinates,
            },
            NodeKind::Column => LayoutNodeView::Column {
                column: Items { items: children() },
                coordinates,
            },
            NodeKind::ImageSet => LayoutNodeView::ImageSet {
                imageset: Items { items: children() },
                coordinates,
            },
            NodeKind::ChoiceSet => LayoutNodeView::ChoiceSet {
                choiceset: Items { items: children() },
                coordinates,
            },
        }
    }

    /// Indented outline of the tree, one node per line.
    ///
    /// Items print as `item(<class id>)`, containers by name, with one tab
    /// per nesting level.
    pub fn debug_layout(&self) -> String {
        let mut out = String::new();
        for root in self.roots() {
            self.write_outline(&mut out, *root, 0);
        }
        out
    }

    fn write_outline(&self, out: &mut String, id: NodeId, depth: usize) {
        let node = self.node(id);
        for _ in 0..depth {
            out.push('\t');
        }
        match &node.kind {
            NodeKind::Item(element) => {
                let _ = writeln!(out, "item({})", element.class_id);
            }
            kind => {
                let _ = writeln!(out, "{}", kind.name());
            }
        }
        for child in &node.children {
            self.write_outline(out, *child, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::element::Element;

    fn sample_tree() -> (LayoutTree, ElementId) {
        let mut tree = LayoutTree::new();
        let title = Element::new(ElementKind::Textbox, Bbox::from_corners(0.0, 0.0, 100.0, 20.0))
            .with_id(ElementId::from_u128(1));
        let title_id = title.id;
        let left = tree.push_item(
            Element::new(ElementKind::Image, Bbox::from_corners(0.0, 30.0, 40.0, 70.0))
                .with_id(ElementId::from_u128(2)),
        );
        let right = tree.push_item(
            Element::new(ElementKind::Textbox, Bbox::from_corners(50.0, 30.0, 100.0, 50.0))
                .with_id(ElementId::from_u128(3)),
        );
        let title = tree.push_item(title);
        let left = tree.push_container(NodeKind::Column, vec![left]).unwrap();
        let right = tree.push_container(NodeKind::Column, vec![right]).unwrap();
        let row = tree.push_container(NodeKind::Row, vec![right, left]).unwrap();
        tree.set_roots(vec![title, row]);
        (tree, title_id)
    }

    #[test]
    fn test_debug_layout() {
        let (tree, _) = sample_tree();
        assert_eq!(
            tree.debug_layout(),
            "item(1)\nrow\n\tcolumn\n\t\titem(5)\n\tcolumn\n\t\titem(1)\n"
        );
    }

    #[test]
    fn test_nodes_json() {
        let (tree, title_id) = sample_tree();
        let mut props = HashMap::new();
        let mut record = Properties::new();
        record.insert("text".to_string(), serde_json::json!("Title"));
        props.insert(title_id, record);

        let value = serde_json::to_value(tree.to_nodes_with(Some(&props))).unwrap();
        assert_eq!(value[0]["object"], "item");
        assert_eq!(value[0]["kind"], "textbox");
        assert_eq!(value[0]["properties"]["text"], "Title");
        assert_eq!(value[1]["object"], "columnset");
        assert_eq!(
            value[1]["coordinates"],
            serde_json::json!([0.0, 30.0, 100.0, 70.0])
        );
        assert_eq!(value[1]["row"][0]["object"], "column");
        assert_eq!(value[1]["row"][0]["column"]["items"][0]["class"], 5);
        assert!(value[1]["row"][1]["column"]["items"][0].get("properties").is_none());

        let parsed: Vec<LayoutNodeView> = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, tree.to_nodes_with(Some(&props)));
    }
}
