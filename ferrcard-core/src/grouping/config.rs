use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::{
    consts::*,
    error::{JsonSnafu, LayoutError},
};

/// Threshold tunings the layout engine has shipped with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdProfile {
    /// Ratios are compared at full precision.
    #[default]
    Legacy,
    /// Ratios are rounded to two decimals before comparing, which lets
    /// pairs sitting right on a threshold group together.
    Revised,
}

/// Thresholds and class ids used by the grouping predicates.
#[derive(Clone, Debug, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default)]
#[serde(default)]
pub struct GroupingConfig {
    pub y_min_difference: f32,
    pub y_max_min_difference: f32,
    pub xmax_xmin_difference: f32,
    pub choiceset_ymax_ymin_difference: f32,
    pub choiceset_y_min_difference: f32,
    pub iou_threshold: f32,
    pub containment_ratio: f32,
    pub image_class: u32,
    pub choice_class: u32,
    pub profile: ThresholdProfile,
    /// Drop the weaker of two overlapping detections before grouping.
    pub suppress_overlaps: bool,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            y_min_difference: Y_MIN_DIFFERENCE,
            y_max_min_difference: Y_MAX_MIN_DIFFERENCE,
            xmax_xmin_difference: XMAX_XMIN_DIFFERENCE,
            choiceset_ymax_ymin_difference: CHOICESET_YMAX_YMIN_DIFFERENCE,
            choiceset_y_min_difference: CHOICESET_Y_MIN_DIFFERENCE,
            iou_threshold: IOU_THRESHOLD,
            containment_ratio: CONTAINMENT_RATIO,
            image_class: IMAGE_CLASS,
            choice_class: CHOICE_CLASS,
            profile: ThresholdProfile::Legacy,
            suppress_overlaps: false,
        }
    }
}

impl GroupingConfig {
    /// Default thresholds under the given profile.
    pub fn with_profile(profile: ThresholdProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Parses a (possibly partial) JSON threshold table; missing keys keep
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(json).context(JsonSnafu {
            stage: "grouping-config",
        })
    }

    /// A ratio as the active profile compares it.
    pub fn ratio(&self, value: f32) -> f32 {
        match self.profile {
            ThresholdProfile::Legacy => value,
            ThresholdProfile::Revised => {
                let scale = 10f32.powi(RATIO_ROUNDING_DIGITS);
                (value * scale).round() / scale
            }
        }
    }
}
