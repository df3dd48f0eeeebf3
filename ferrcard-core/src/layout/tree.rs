use std::cmp::Ordering;

use crate::{
    analysis::bbox::{Axis, Bbox},
    error::LayoutError,
    layout::element::{Element, ElementId},
};

/// Index of a node inside its [`LayoutTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Wraps exactly one element.
    Item(Element),
    /// Horizontal container of at least two columns ("column-set").
    Row,
    /// Vertical container.
    Column,
    ImageSet,
    ChoiceSet,
}

impl NodeKind {
    /// Axis the children of this node are ordered along.
    pub fn order_axis(&self) -> Axis {
        match self {
            NodeKind::Row | NodeKind::ImageSet => Axis::X,
            NodeKind::Item(_) | NodeKind::Column | NodeKind::ChoiceSet => Axis::Y,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Item(_) => "item",
            NodeKind::Row => "row",
            NodeKind::Column => "column",
            NodeKind::ImageSet => "imageset",
            NodeKind::ChoiceSet => "choiceset",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub bbox: Bbox,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Item(element) => Some(element),
            _ => None,
        }
    }
}

/// Arena holding the layout tree.
///
/// Nodes are only ever appended. Nodes detached while the tree is rearranged
/// stay in the arena but are no longer reachable from the roots, and every
/// traversal starts from the roots.
#[derive(Clone, Debug, Default)]
pub struct LayoutTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn set_roots(&mut self, roots: Vec<NodeId>) {
        self.roots = roots;
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn push_item(&mut self, element: Element) -> NodeId {
        let bbox = element.bbox;
        self.push(Node {
            kind: NodeKind::Item(element),
            bbox,
            children: Vec::new(),
        })
    }

    /// Appends a container over `children`, computing its box and ordering
    /// its children.
    pub fn push_container(
        &mut self,
        kind: NodeKind,
        children: Vec<NodeId>,
    ) -> Result<NodeId, LayoutError> {
        let bbox = Bbox::union_all(children.iter().map(|child| &self.node(*child).bbox))?;
        let id = self.push(Node {
            kind,
            bbox,
            children,
        });
        self.sort_children(id);
        Ok(id)
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Recomputes a container's box from its current children and re-orders
    /// them along the container's axis.
    pub fn refresh(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let node = self.node(id);
        if let NodeKind::Item(_) = node.kind {
            return Ok(());
        }
        let bbox = Bbox::union_all(node.children.iter().map(|child| &self.node(*child).bbox))?;
        self.node_mut(id).bbox = bbox;
        self.sort_children(id);
        Ok(())
    }

    fn sort_children(&mut self, id: NodeId) {
        let axis = self.node(id).kind.order_axis();
        let mut children = std::mem::take(&mut self.node_mut(id).children);
        self.sort_nodes(&mut children, axis);
        self.node_mut(id).children = children;
    }

    /// Sorts `ids` by box position along `axis`.
    ///
    /// Ties fall back to the other axis, then to the smallest element id in
    /// each subtree, so the order never depends on the input order.
    pub fn sort_nodes(&self, ids: &mut [NodeId], axis: Axis) {
        ids.sort_by(|a, b| self.position_cmp(*a, *b, axis));
    }

    fn position_cmp(&self, a: NodeId, b: NodeId, axis: Axis) -> Ordering {
        let (box_a, box_b) = (self.node(a).bbox, self.node(b).bbox);
        let (primary, secondary) = match axis {
            Axis::X => (Axis::X, Axis::Y),
            Axis::Y => (Axis::Y, Axis::X),
        };

        box_a
            .range(primary)
            .0
            .total_cmp(&box_b.range(primary).0)
            .then_with(|| box_a.range(secondary).0.total_cmp(&box_b.range(secondary).0))
            .then_with(|| self.first_element_id(a).cmp(&self.first_element_id(b)))
    }

    /// The smallest element id in the subtree of `id`.
    pub fn first_element_id(&self, id: NodeId) -> Option<ElementId> {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Item(element) => Some(element.id),
            _ => node
                .children
                .iter()
                .filter_map(|child| self.first_element_id(*child))
                .min(),
        }
    }

    /// Every element reachable from the roots, in depth-first order.
    pub fn elements(&self) -> Vec<&Element> {
        let mut elements = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if let Some(element) = node.element() {
                elements.push(element);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        elements
    }

    /// Every node reachable from the roots, in depth-first order.
    pub fn reachable(&self) -> Vec<NodeId> {
        let mut reachable = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            reachable.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::labels::ElementKind;

    fn item(tree: &mut LayoutTree, id: u128, bbox: [f32; 4]) -> NodeId {
        tree.push_item(
            Element::new(ElementKind::Textbox, Bbox::from(bbox)).with_id(ElementId::from_u128(id)),
        )
    }

    #[test]
    fn test_push_container_bbox_and_order() {
        let mut tree = LayoutTree::new();
        let lower = item(&mut tree, 1, [10.0, 50.0, 40.0, 60.0]);
        let upper = item(&mut tree, 2, [0.0, 0.0, 30.0, 20.0]);

        let column = tree.push_container(NodeKind::Column, vec![lower, upper]).unwrap();
        let node = tree.node(column);
        assert_eq!(node.bbox, Bbox::from_corners(0.0, 0.0, 40.0, 60.0));
        assert_eq!(node.children, vec![upper, lower]);

        let row = tree.push_container(NodeKind::Row, vec![lower, upper]).unwrap();
        assert_eq!(tree.node(row).children, vec![upper, lower]);

        assert!(matches!(
            tree.push_container(NodeKind::Column, Vec::new()),
            Err(LayoutError::EmptyInput)
        ));
    }

    #[test]
    fn test_sort_ties_on_element_id() {
        let mut tree = LayoutTree::new();
        let b = item(&mut tree, 9, [0.0, 0.0, 10.0, 10.0]);
        let a = item(&mut tree, 3, [0.0, 0.0, 10.0, 10.0]);
        let c = item(&mut tree, 5, [0.0, 0.0, 10.0, 10.0]);

        let mut ids = vec![b, a, c];
        tree.sort_nodes(&mut ids, Axis::Y);
        assert_eq!(ids, vec![a, c, b]);
    }

    #[test]
    fn test_refresh_and_traversal() {
        let mut tree = LayoutTree::new();
        let first = item(&mut tree, 1, [0.0, 0.0, 10.0, 10.0]);
        let second = item(&mut tree, 2, [0.0, 20.0, 10.0, 30.0]);
        let column = tree.push_container(NodeKind::Column, vec![first]).unwrap();
        tree.set_roots(vec![column]);

        tree.node_mut(column).children.push(second);
        tree.refresh(column).unwrap();
        assert_eq!(tree.node(column).bbox, Bbox::from_corners(0.0, 0.0, 10.0, 30.0));

        let ids: Vec<ElementId> = tree.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![ElementId::from_u128(1), ElementId::from_u128(2)]);
        assert_eq!(tree.reachable(), vec![column, first, second]);
        assert_eq!(tree.first_element_id(column), Some(ElementId::from_u128(1)));
    }
}
