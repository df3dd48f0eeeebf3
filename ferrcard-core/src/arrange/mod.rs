pub mod containers;
pub mod rows;

use tracing::{debug, instrument};

use crate::{
    analysis::bbox::Axis,
    error::LayoutError,
    grouping::config::GroupingConfig,
    layout::{element::Element, tree::LayoutTree},
    pipeline::ingest::validate,
};

use self::{containers::group_sets, rows::RowColumnBuilder};

/// Turns a flat list of elements into a layout tree.
///
/// Rows and columns are built first, then sibling images and choices are
/// collapsed into sets, and the roots end up ordered by their top edge.
/// An empty input yields an empty tree.
///
/// # Errors
/// [`LayoutError::InvalidBox`] or [`LayoutError::DuplicateElement`] before
/// any grouping runs.
#[instrument(skip_all, fields(elements = elements.len()))]
pub fn generate_layout(
    elements: &[Element],
    config: &GroupingConfig,
) -> Result<LayoutTree, LayoutError> {
    validate(elements)?;

    let mut tree = LayoutTree::new();
    let roots = RowColumnBuilder::new(&mut tree, config).build(elements)?;
    tree.set_roots(roots);

    group_sets(&mut tree, config)?;

    let mut roots = tree.roots().to_vec();
    tree.sort_nodes(&mut roots, Axis::Y);
    tree.set_roots(roots);

    debug!("layout has {} top-level node(s)", tree.roots().len());
    Ok(tree)
}
