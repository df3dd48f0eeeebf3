use tracing::debug;

use crate::{
    error::LayoutError,
    grouping::{
        conditions::{choiceset_condition, imageset_condition},
        config::GroupingConfig,
        engine::group_indices,
    },
    layout::{
        element::Element,
        tree::{LayoutTree, NodeId, NodeKind},
    },
};

type SetCondition = fn(&Element, &Element, &GroupingConfig) -> bool;

/// Which sibling items collapse into which set container.
#[derive(Clone)]
pub struct SetRule {
    pub class_id: u32,
    pub kind: NodeKind,
    pub condition: SetCondition,
}

impl SetRule {
    pub fn images(config: &GroupingConfig) -> Self {
        Self {
            class_id: config.image_class,
            kind: NodeKind::ImageSet,
            condition: imageset_condition,
        }
    }

    pub fn choices(config: &GroupingConfig) -> Self {
        Self {
            class_id: config.choice_class,
            kind: NodeKind::ChoiceSet,
            condition: choiceset_condition,
        }
    }
}

/// Collapses runs of sibling images into image-sets, then runs of sibling
/// choices into choice-sets, first inside every column and then at the root.
pub fn group_sets(tree: &mut LayoutTree, config: &GroupingConfig) -> Result<(), LayoutError> {
    for rule in [SetRule::images(config), SetRule::choices(config)] {
        let roots = tree.roots().to_vec();
        for root in &roots {
            if tree.node(*root).kind == NodeKind::Row {
                collapse_in_row(tree, *root, &rule, config)?;
            }
        }

        let roots = collapse(tree, roots, &rule, config)?;
        tree.set_roots(roots);
    }
    Ok(())
}

fn collapse_in_row(
    tree: &mut LayoutTree,
    row: NodeId,
    rule: &SetRule,
    config: &GroupingConfig,
) -> Result<(), LayoutError> {
    for column in tree.node(row).children.clone() {
        let children = tree.node(column).children.clone();
        let children = collapse(tree, children, rule, config)?;

        for child in &children {
            if tree.node(*child).kind == NodeKind::Row {
                collapse_in_row(tree, *child, rule, config)?;
            }
        }

        tree.node_mut(column).children = children;
        tree.refresh(column)?;
    }
    tree.refresh(row)
}

/// Replaces every group of two or more matching items among `siblings` with
/// one set container. Non-item siblings are left alone.
fn collapse(
    tree: &mut LayoutTree,
    siblings: Vec<NodeId>,
    rule: &SetRule,
    config: &GroupingConfig,
) -> Result<Vec<NodeId>, LayoutError> {
    let candidates: Vec<NodeId> = siblings
        .iter()
        .copied()
        .filter(|id| {
            tree.node(*id)
                .element()
                .is_some_and(|element| element.class_id == rule.class_id)
        })
        .collect();
    if candidates.len() < 2 {
        return Ok(siblings);
    }

    let groups = {
        let elements: Vec<&Element> = candidates
            .iter()
            .filter_map(|id| tree.node(*id).element())
            .collect();
        group_indices(elements.len(), |i, j| {
            (rule.condition)(elements[i], elements[j], config)
        })
    };

    let mut grouped = Vec::new();
    let mut sets = Vec::new();
    for group in groups.into_iter().filter(|group| group.len() > 1) {
        let members: Vec<NodeId> = group.into_iter().map(|i| candidates[i]).collect();
        grouped.extend(members.iter().copied());
        sets.push(members);
    }

    let mut kept: Vec<NodeId> = siblings
        .into_iter()
        .filter(|id| !grouped.contains(id))
        .collect();
    for members in sets {
        debug!("collapsing {} item(s) into a {}", members.len(), rule.kind.name());
        kept.push(tree.push_container(rule.kind.clone(), members)?);
    }
    Ok(kept)
}
