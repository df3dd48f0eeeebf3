use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::{
    error::LayoutError,
    grouping::{
        conditions::{column_condition, row_condition},
        config::GroupingConfig,
        engine::group_by_condition,
    },
    layout::{
        element::{Element, ElementId},
        tree::{LayoutTree, NodeId, NodeKind},
    },
};

/// Outcome of arranging one list of elements.
#[derive(Debug)]
pub enum Grouping {
    /// The nodes emitted for the list, boxes and order final.
    Nested(Vec<NodeId>),
    /// The list regrouped into the very column group that produced it.
    /// The caller lays the group out as plain items instead.
    Repeated,
}

/// Builds the row/column skeleton of a layout into a [`LayoutTree`].
pub struct RowColumnBuilder<'a> {
    tree: &'a mut LayoutTree,
    config: &'a GroupingConfig,
}

impl<'a> RowColumnBuilder<'a> {
    pub fn new(tree: &'a mut LayoutTree, config: &'a GroupingConfig) -> Self {
        Self { tree, config }
    }

    /// Arranges `elements` and returns the top-level nodes, unsorted.
    pub fn build(mut self, elements: &[Element]) -> Result<Vec<NodeId>, LayoutError> {
        match self.arrange(elements, None)? {
            Grouping::Nested(nodes) => Ok(nodes),
            Grouping::Repeated => Ok(self.items(elements)),
        }
    }

    /// One call frame: bands, then columns per band, recursing into every
    /// column group of more than one element.
    ///
    /// `previous` is the column group this frame was called for.
    fn arrange(
        &mut self,
        elements: &[Element],
        previous: Option<&[Element]>,
    ) -> Result<Grouping, LayoutError> {
        let config = self.config;
        let bands = group_by_condition(elements, |a, b| row_condition(a, b, config));
        trace!("{} element(s) form {} band(s)", elements.len(), bands.len());

        let mut emitted = Vec::with_capacity(bands.len());
        for band in bands {
            if let [element] = band.as_slice() {
                emitted.push(self.tree.push_item(element.clone()));
                continue;
            }

            let groups = group_by_condition(&band, |a, b| column_condition(a, b, config));
            let mut columns = Vec::with_capacity(groups.len());
            for group in groups {
                let children = if let [element] = group.as_slice() {
                    vec![self.tree.push_item(element.clone())]
                } else {
                    if previous.is_some_and(|previous| same_members(previous, &group)) {
                        return Ok(Grouping::Repeated);
                    }
                    match self.arrange(&group, Some(group.as_slice()))? {
                        Grouping::Nested(children) => children,
                        Grouping::Repeated => {
                            debug!("column of {} element(s) repeats, flattening", group.len());
                            self.items(&group)
                        }
                    }
                };
                columns.push(self.tree.push_container(NodeKind::Column, children)?);
            }

            match columns.as_slice() {
                [column] => {
                    // A single column adds nothing over its content.
                    let children = self.tree.node(*column).children.clone();
                    emitted.extend(children);
                }
                _ => emitted.push(self.tree.push_container(NodeKind::Row, columns)?),
            }
        }

        Ok(Grouping::Nested(emitted))
    }

    fn items(&mut self, elements: &[Element]) -> Vec<NodeId> {
        elements
            .iter()
            .map(|element| self.tree.push_item(element.clone()))
            .collect()
    }
}

fn same_members(previous: &[Element], current: &[Element]) -> bool {
    let ids = |elements: &[Element]| elements.iter().map(|e| e.id).collect::<BTreeSet<ElementId>>();
    previous.len() == current.len() && ids(previous) == ids(current)
}
