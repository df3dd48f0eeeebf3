/// Maximum leading-edge offset ratio for two boxes to share a row, an
/// image-set, or the image/image column fast path.
///
/// The ratio compares how far apart the two top edges are against the
/// vertical span the pair covers, so it is scale-invariant.
pub const Y_MIN_DIFFERENCE: f32 = 0.15;

/// Upper bound on the vertical gap ratio for the "horizontally inclusive"
/// route into the same row.
pub const Y_MAX_MIN_DIFFERENCE: f32 = 0.3;

/// Maximum horizontal gap ratio between two images that may share an
/// image-set or a column.
pub const XMAX_XMIN_DIFFERENCE: f32 = 0.5;

/// Maximum vertical gap ratio between two stacked choices of one choice-set.
pub const CHOICESET_YMAX_YMIN_DIFFERENCE: f32 = 0.5;

/// Maximum leading-edge offset ratio between two choices of one choice-set.
///
/// Choices are stacked, so this is much looser than [`Y_MIN_DIFFERENCE`].
pub const CHOICESET_Y_MIN_DIFFERENCE: f32 = 0.7;

/// IoU above which two boxes count as overlapping.
pub const IOU_THRESHOLD: f32 = 0.5;

/// Fraction of the smaller box that must be covered for two boxes to count
/// as overlapping when the IoU alone is too low.
pub const CONTAINMENT_RATIO: f32 = 0.5;

/// Detector class id of images.
pub const IMAGE_CLASS: u32 = 5;

/// Detector class id of choices (radio buttons).
pub const CHOICE_CLASS: u32 = 2;

/// Decimal places the revised threshold profile rounds ratios to before
/// comparing them against a threshold.
pub const RATIO_ROUNDING_DIGITS: i32 = 2;
