use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// A 2D axis-aligned bounding box in pixel coordinates.
///
/// Image coordinates are used throughout: the origin is the top-left corner
/// and `y` grows downward, so `min` is the top-left corner and `max` the
/// bottom-right one.
///
/// Boxes serialize as the `[xmin, ymin, xmax, ymax]` quadruple the detector
/// emits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Bbox {
    /// The minimum point of the bounding box (top-left corner).
    pub min: Vec2,
    /// The maximum point of the bounding box (bottom-right corner).
    pub max: Vec2,
}

/// One of the two layout axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// How [`Bbox::offset_ratio`] picks the span it divides by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Distance from the shorter box's leading edge to the longer box's
    /// trailing edge. Used when matching rows and columns.
    Extent,
    /// Distance from the upper box's leading edge to the lower box's trailing
    /// edge. Used when matching image-sets and choice-sets.
    Position,
}

/// Outcome of [`Bbox::intersects`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// Whether the two boxes count as overlapping.
    pub hit: bool,
    pub area_a: f32,
    pub area_b: f32,
}

/// Overlap rectangle size reported by [`Bbox::overlap`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overlap {
    pub width: f32,
    pub height: f32,
}

impl From<[f32; 4]> for Bbox {
    fn from([xmin, ymin, xmax, ymax]: [f32; 4]) -> Self {
        Self::from_corners(xmin, ymin, xmax, ymax)
    }
}

impl From<Bbox> for [f32; 4] {
    fn from(bbox: Bbox) -> Self {
        [bbox.min.x, bbox.min.y, bbox.max.x, bbox.max.y]
    }
}

impl Bbox {
    /// Creates a new bounding box from the detector's corner quadruple.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use ferrcard_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::from_corners(10.0, 20.0, 50.0, 80.0);
    /// assert_eq!(bbox.min, Vec2::new(10.0, 20.0));
    /// assert_eq!(bbox.max, Vec2::new(50.0, 80.0));
    /// ```
    pub fn from_corners(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self {
            min: Vec2::new(xmin, ymin),
            max: Vec2::new(xmax, ymax),
        }
    }

    /// Whether every coordinate is finite and `max` is not before `min` on
    /// either axis.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.max.cmpge(self.min).all()
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// The `(min, max)` range of the box on one axis.
    pub fn range(&self, axis: Axis) -> (f32, f32) {
        match axis {
            Axis::X => (self.min.x, self.max.x),
            Axis::Y => (self.min.y, self.max.y),
        }
    }

    /// Calculates the area of the bounding box.
    ///
    /// # Example
    /// ```
    /// use ferrcard_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::from_corners(0.0, 0.0, 4.0, 3.0);
    /// assert_eq!(bbox.area(), 12.0);
    /// ```
    pub fn area(&self) -> f32 {
        let length = self.max - self.min;

        length.x * length.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Calculates the area of intersection between this bounding box and another.
    ///
    /// Returns 0.0 when the overlap rectangle has no positive width or height.
    pub fn intersection(&self, other: &Self) -> f32 {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);

        if max.x > min.x && max.y > min.y {
            (max.x - min.x) * (max.y - min.y)
        } else {
            0.
        }
    }

    /// Intersection over Union (IoU) between this bounding box and another.
    ///
    /// # Formula
    /// IoU = Intersection Area / (Area1 + Area2 - Intersection Area)
    pub fn iou(&self, other: &Self) -> f32 {
        let intersection_area = self.intersection(other);
        let union_area = self.area() + other.area() - intersection_area;

        if union_area > 0.0 {
            intersection_area / union_area
        } else {
            0.0
        }
    }

    /// The smallest box enclosing both this bounding box and another.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The smallest box enclosing every box of `boxes`.
    ///
    /// Container boxes are always recomputed through this, so a container
    /// never drifts from the union of its children.
    ///
    /// # Errors
    /// [`LayoutError::EmptyInput`] when `boxes` yields nothing.
    ///
    /// # Example
    /// ```
    /// use ferrcard_core::analysis::bbox::Bbox;
    /// let boxes = [
    ///     Bbox::from_corners(0.0, 0.0, 100.0, 20.0),
    ///     Bbox::from_corners(10.0, 22.0, 90.0, 40.0),
    /// ];
    /// let union = Bbox::union_all(boxes.iter()).unwrap();
    /// assert_eq!(union, Bbox::from_corners(0.0, 0.0, 100.0, 40.0));
    /// assert!(Bbox::union_all(std::iter::empty::<&Bbox>()).is_err());
    /// ```
    pub fn union_all<'a, I>(boxes: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = &'a Bbox>,
    {
        boxes
            .into_iter()
            .copied()
            .reduce(|acc, bbox| acc.union(&bbox))
            .ok_or(LayoutError::EmptyInput)
    }

    /// Decides whether two boxes overlap enough to be the same thing.
    ///
    /// No hit when the overlap rectangle has a non-positive width or height.
    /// Otherwise the boxes hit when the union area is zero, when the IoU
    /// reaches `iou_threshold`, or when the intersection covers at least
    /// `containment_ratio` of the smaller box. Both areas are reported
    /// whenever the overlap rectangle exists.
    pub fn intersects(
        &self,
        other: &Self,
        iou_threshold: f32,
        containment_ratio: f32,
    ) -> Intersection {
        let area_a = self.area();
        let area_b = other.area();
        let Some(overlap) = self.overlap(other) else {
            return Intersection {
                hit: false,
                area_a,
                area_b,
            };
        };

        let intersection_area = overlap.width * overlap.height;
        let union_area = area_a + area_b - intersection_area;
        let hit = union_area == 0.0
            || self.iou(other) >= iou_threshold
            || intersection_area / area_a.min(area_b) >= containment_ratio;

        Intersection {
            hit,
            area_a,
            area_b,
        }
    }

    /// The permissive overlap test: any overlap rectangle with a positive
    /// width and height counts, and its size is reported.
    pub fn overlap(&self, other: &Self) -> Option<Overlap> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);

        if max.x - min.x <= 0.0 || max.y - min.y <= 0.0 {
            return None;
        }

        Some(Overlap {
            width: max.x - min.x,
            height: max.y - min.y,
        })
    }

    /// Whether the two ranges on `axis` are nested or interleaved.
    ///
    /// Touching ranges count. The test is symmetric.
    pub fn inclusive(&self, other: &Self, axis: Axis) -> bool {
        let (a_min, a_max) = self.range(axis);
        let (b_min, b_max) = other.range(axis);

        a_min <= b_max && b_min <= a_max
    }

    pub fn horizontally_inclusive(&self, other: &Self) -> bool {
        self.inclusive(other, Axis::X)
    }

    pub fn vertically_inclusive(&self, other: &Self) -> bool {
        self.inclusive(other, Axis::Y)
    }

    /// Scale-free distance between two boxes on one axis.
    ///
    /// The gap between the near edges (0 when the ranges overlap) divided by
    /// half the distance between the two midpoints. Returns 0 when the
    /// midpoints coincide.
    ///
    /// # Example
    /// ```
    /// use ferrcard_core::analysis::bbox::{Axis, Bbox};
    /// let top = Bbox::from_corners(0.0, 0.0, 100.0, 20.0);
    /// let below = Bbox::from_corners(10.0, 22.0, 90.0, 40.0);
    /// // gap 2, midpoints 10 and 31
    /// assert!((top.gap_ratio(&below, Axis::Y) - 2.0 / 10.5).abs() < 1e-6);
    /// ```
    pub fn gap_ratio(&self, other: &Self, axis: Axis) -> f32 {
        let (a_min, a_max) = self.range(axis);
        let (b_min, b_max) = other.range(axis);

        let gap = if a_max < b_min {
            b_min - a_max
        } else if b_max < a_min {
            a_min - b_max
        } else {
            0.0
        };

        let half_distance = (self.center() - other.center()).abs() / 2.0;
        let half_distance = match axis {
            Axis::X => half_distance.x,
            Axis::Y => half_distance.y,
        };

        if half_distance > 0.0 {
            gap / half_distance
        } else {
            0.0
        }
    }

    /// Difference of the two leading edges on `axis`, relative to a reference
    /// span picked by `anchor`. Returns 0 when the span is empty.
    pub fn offset_ratio(&self, other: &Self, axis: Axis, anchor: Anchor) -> f32 {
        let (a_min, a_max) = self.range(axis);
        let (b_min, b_max) = other.range(axis);

        let offset = (a_min - b_min).abs();
        let span = match anchor {
            Anchor::Extent => {
                if a_max - a_min >= b_max - b_min {
                    (b_min - a_max).abs()
                } else {
                    (a_min - b_max).abs()
                }
            }
            Anchor::Position => {
                if a_min < b_min {
                    (a_min - b_max).abs()
                } else {
                    (b_min - a_max).abs()
                }
            }
        };

        if span > 0.0 { offset / span } else { 0.0 }
    }
}
