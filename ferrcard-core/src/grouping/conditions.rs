//! Pairwise membership tests for each grouping stage.
//!
//! Every ratio goes through [`GroupingConfig::ratio`] before it is compared,
//! so the active threshold profile applies uniformly.

use crate::{
    analysis::bbox::{Anchor, Axis},
    grouping::config::GroupingConfig,
    layout::element::Element,
};

fn is_image(element: &Element, config: &GroupingConfig) -> bool {
    element.class_id == config.image_class
}

/// Whether two elements belong to the same horizontal band.
///
/// Holds when the top edges nearly line up, when the vertical ranges
/// overlap, or when the pair is stacked closely with overlapping horizontal
/// ranges.
pub fn row_condition(a: &Element, b: &Element, config: &GroupingConfig) -> bool {
    let offset = config.ratio(a.bbox.offset_ratio(&b.bbox, Axis::Y, Anchor::Extent));
    if offset <= config.y_min_difference {
        return true;
    }

    // Both inclusive tests are symmetric, so the image operand needs no
    // special placement.
    if a.bbox.vertically_inclusive(&b.bbox) {
        return true;
    }

    config.ratio(a.bbox.gap_ratio(&b.bbox, Axis::Y)) < config.y_max_min_difference
        && a.bbox.horizontally_inclusive(&b.bbox)
}

/// Whether two members of one band belong to the same column of its row.
pub fn column_condition(a: &Element, b: &Element, config: &GroupingConfig) -> bool {
    let side_by_side_images = is_image(a, config)
        && is_image(b, config)
        && config.ratio(a.bbox.offset_ratio(&b.bbox, Axis::Y, Anchor::Extent))
            <= config.y_min_difference
        && config.ratio(a.bbox.gap_ratio(&b.bbox, Axis::X)) <= config.xmax_xmin_difference;
    let primary = side_by_side_images || a.bbox.horizontally_inclusive(&b.bbox);

    if let Some(overlap) = a.bbox.overlap(&b.bbox) {
        // Overlapping boxes: the axis with the larger relative overlap wins.
        let width = a.bbox.width().max(b.bbox.width());
        let height = a.bbox.height().max(b.bbox.height());
        if overlap.width / width >= overlap.height / height {
            return true;
        }
    }

    // Stacked choices stay in one column so they can form a choice-set.
    primary && (a.bbox.vertically_inclusive(&b.bbox) || choiceset_condition(a, b, config))
}

/// Whether two images sit side by side closely enough to form an image-set.
pub fn imageset_condition(a: &Element, b: &Element, config: &GroupingConfig) -> bool {
    is_image(a, config)
        && is_image(b, config)
        && config.ratio(a.bbox.offset_ratio(&b.bbox, Axis::Y, Anchor::Position))
            <= config.y_min_difference
        && config.ratio(a.bbox.gap_ratio(&b.bbox, Axis::X)) <= config.xmax_xmin_difference
}

/// Whether two choices are stacked closely enough to form a choice-set.
pub fn choiceset_condition(a: &Element, b: &Element, config: &GroupingConfig) -> bool {
    a.class_id == config.choice_class
        && b.class_id == config.choice_class
        && config.ratio(a.bbox.gap_ratio(&b.bbox, Axis::Y))
            <= config.choiceset_ymax_ymin_difference
        && config.ratio(a.bbox.offset_ratio(&b.bbox, Axis::Y, Anchor::Position))
            <= config.choiceset_y_min_difference
}
