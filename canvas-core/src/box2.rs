//! Immutable axis-aligned box.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Vec2;

/// An axis-aligned box with `min <= max` on both axes.
///
/// The invariant is established by [`Box2::new`], which sorts its corners per
/// axis. All containment and intersection tests are inclusive, so boxes that
/// only touch along an edge still intersect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBox2")]
pub struct Box2 {
    min: Vec2,
    max: Vec2,
}

/// Unsorted wire form, so deserialized boxes go through [`Box2::new`] too.
#[derive(Deserialize)]
struct RawBox2 {
    min: Vec2,
    max: Vec2,
}

impl From<RawBox2> for Box2 {
    fn from(raw: RawBox2) -> Self {
        Self::new(raw.min, raw.max)
    }
}

impl Box2 {
    /// Create a box spanning two arbitrary corners.
    #[must_use]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a box of `size` centered on `center`.
    #[must_use]
    pub fn from_center_and_size(center: Vec2, size: Vec2) -> Self {
        let half = size.half();
        Self::new(center - half, center + half)
    }

    /// Create a box from its top-left corner and size.
    #[must_use]
    pub fn from_origin_and_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin, origin + size)
    }

    /// Minimum (top-left) corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Maximum (bottom-right) corner.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max).half()
    }

    /// Whether the box has zero width or height.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let size = self.size();
        size.x == 0.0 || size.y == 0.0
    }

    /// The four corners, clockwise from `min` in a y-down frame.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    /// Map both corners through `func`, e.g. to move between screen and world space.
    ///
    /// Only valid for transforms that keep axis alignment (translate and scale).
    #[must_use]
    pub fn apply(&self, func: impl Fn(Vec2) -> Vec2) -> Self {
        Self::new(func(self.min), func(self.max))
    }

    /// Shift the box by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Grow the box by `amount` in total on each axis, keeping its center.
    #[must_use]
    pub fn inflate(&self, amount: Vec2) -> Self {
        Self::from_center_and_size(self.center(), self.size() + amount)
    }

    /// Axis-aligned bounds of this box rotated by `angle` radians about `pivot`.
    #[must_use]
    pub fn rotated_about(&self, pivot: Vec2, angle: f64) -> Self {
        if angle == 0.0 {
            return *self;
        }
        let [first, rest @ ..] = self.corners().map(|c| c.rotate_about(pivot, angle));
        let (min, max) = rest
            .iter()
            .fold((first, first), |(lo, hi), &c| (lo.min(c), hi.max(c)));
        Self { min, max }
    }

    /// Whether `point` lies inside or on the boundary.
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.min.less_than_eq(point) && self.max.greater_than_eq(point)
    }

    /// Whether `other` lies entirely inside this box (shared edges allowed).
    #[must_use]
    pub fn contains_box(&self, other: &Self) -> bool {
        self.min.less_than_eq(other.min) && self.max.greater_than_eq(other.max)
    }

    /// Whether the boxes overlap or touch. Containment counts as intersection.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.less_than_eq(other.max) && self.max.greater_than_eq(other.min)
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Overlapping region of both boxes.
    ///
    /// Disjoint boxes produce the box between their nearest corners; check
    /// [`Box2::intersects`] first when that matters.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Restrict `point` to lie within the box.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        self.min.max(point.min(self.max))
    }
}

impl fmt::Display for Box2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Box2({}, {})", self.min, self.max)
    }
}
