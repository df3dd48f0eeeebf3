use std::collections::HashSet;

use snafu::ensure;
use tracing::debug;

use crate::{
    error::{DuplicateElementSnafu, InvalidBoxSnafu, LayoutError},
    grouping::config::GroupingConfig,
    layout::element::Element,
};

/// Rejects boxes the geometry cannot handle and repeated ids.
pub fn validate(elements: &[Element]) -> Result<(), LayoutError> {
    let mut seen = HashSet::with_capacity(elements.len());
    for element in elements {
        ensure!(
            element.bbox.is_valid(),
            InvalidBoxSnafu {
                id: element.id,
                bbox: element.bbox,
            }
        );
        ensure!(seen.insert(element.id), DuplicateElementSnafu { id: element.id });
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct Suppressed {
    pub kept: Vec<Element>,
    pub dropped: Vec<Element>,
}

/// Drops the weaker element of every pair of overlapping detections.
///
/// Elements are ranked by score, then by area, then by id; an element is
/// dropped when it overlaps (per [`crate::analysis::bbox::Bbox::intersects`])
/// any higher ranked element that was kept. Missing scores rank lowest.
pub fn suppress_overlaps(mut elements: Vec<Element>, config: &GroupingConfig) -> Suppressed {
    if elements.len() < 2 {
        return Suppressed {
            kept: elements,
            dropped: Vec::new(),
        };
    }

    elements.sort_by(|a, b| {
        let score = |e: &Element| e.score.unwrap_or(f32::NEG_INFINITY);
        score(b)
            .total_cmp(&score(a))
            .then_with(|| b.bbox.area().total_cmp(&a.bbox.area()))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut suppressed = Suppressed::default();
    for element in elements {
        let overlapping = suppressed.kept.iter().find(|kept| {
            kept.bbox
                .intersects(&element.bbox, config.iou_threshold, config.containment_ratio)
                .hit
        });
        match overlapping {
            Some(kept) => {
                debug!("element {} overlaps {}, dropping it", element.id, kept.id);
                suppressed.dropped.push(element);
            }
            None => suppressed.kept.push(element),
        }
    }
    suppressed
}
