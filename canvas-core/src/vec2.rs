//! Immutable 2D vector.
//!
//! Every operation returns a new value. Angles are in radians throughout the
//! crate; convert at the boundary with [`f64::to_radians`].

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::{CanvasError, CanvasResult};

/// World units per millimeter of design space.
pub const UNITS_PER_MM: f64 = 5.0;

/// A 2D vector or point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vec2 {
    /// Create a vector from its components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// A vector with both components set to `v`.
    #[must_use]
    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v)
    }

    /// Unit vector pointing at `angle` radians.
    #[must_use]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Vector of length `radius` pointing at `angle` radians.
    #[must_use]
    pub fn from_polar(radius: f64, angle: f64) -> Self {
        Self::from_angle(angle).scale(radius)
    }

    /// Multiply both components by `scalar`.
    #[must_use]
    pub fn scale(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }

    /// Half of this vector. Infallible shorthand for `div(2.0)`.
    #[must_use]
    pub fn half(self) -> Self {
        self.scale(0.5)
    }

    /// Divide both components by `divisor`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DivisionByZero`] if `divisor` is zero.
    #[allow(clippy::should_implement_trait)] // fallible, so not `std::ops::Div`
    pub fn div(self, divisor: f64) -> CanvasResult<Self> {
        if divisor == 0.0 {
            return Err(CanvasError::DivisionByZero { op: "Vec2::div" });
        }
        Ok(Self::new(self.x / divisor, self.y / divisor))
    }

    /// Remainder of both components by `divisor` (sign follows the dividend).
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DivisionByZero`] if `divisor` is zero.
    pub fn modulo(self, divisor: f64) -> CanvasResult<Self> {
        if divisor == 0.0 {
            return Err(CanvasError::DivisionByZero { op: "Vec2::modulo" });
        }
        Ok(Self::new(self.x % divisor, self.y % divisor))
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction. The zero vector stays zero.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Self::zero();
        }
        self.scale(1.0 / len)
    }

    /// Rotate counter-clockwise (in a y-up frame) by `angle` radians about the origin.
    #[must_use]
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Rotate by `angle` radians about `pivot`.
    #[must_use]
    pub fn rotate_about(self, pivot: Self, angle: f64) -> Self {
        (self - pivot).rotate(angle) + pivot
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    #[must_use]
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Angle of this vector from the positive x axis, in radians.
    #[must_use]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Per-axis minimum.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Per-axis maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Both components strictly less than `other`'s.
    #[must_use]
    pub fn less_than(self, other: Self) -> bool {
        self.x < other.x && self.y < other.y
    }

    /// Both components less than or equal to `other`'s.
    #[must_use]
    pub fn less_than_eq(self, other: Self) -> bool {
        self.x <= other.x && self.y <= other.y
    }

    /// Both components strictly greater than `other`'s.
    #[must_use]
    pub fn greater_than(self, other: Self) -> bool {
        self.x > other.x && self.y > other.y
    }

    /// Both components greater than or equal to `other`'s.
    #[must_use]
    pub fn greater_than_eq(self, other: Self) -> bool {
        self.x >= other.x && self.y >= other.y
    }

    /// Interpret this vector as millimeters and convert to world units.
    #[must_use]
    pub fn mm(self) -> Self {
        self.scale(UNITS_PER_MM)
    }

    /// Convert world units back to millimeters.
    #[must_use]
    pub fn to_mm(self) -> Self {
        self.scale(1.0 / UNITS_PER_MM)
    }

    /// Both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-9;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn test_named_constructors() {
        assert_eq!(Vec2::zero(), Vec2::new(0.0, 0.0));
        assert_eq!(Vec2::uniform(3.0), Vec2::new(3.0, 3.0));
        assert_eq!(Vec2::default(), Vec2::zero());
    }

    #[test]
    fn test_arithmetic_returns_new_values() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 5.0);
        let sum = a + b;
        assert_eq!(sum, Vec2::new(4.0, 7.0));
        // Operands are untouched.
        assert_eq!(a, Vec2::new(1.0, 2.0));
        assert_eq!(b - a, Vec2::new(2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }

    #[test]
    fn test_div_by_zero_is_error() {
        let v = Vec2::new(1.0, 1.0);
        assert!(matches!(
            v.div(0.0),
            Err(CanvasError::DivisionByZero { op: "Vec2::div" })
        ));
        assert!(v.modulo(0.0).is_err());
        assert_eq!(v.div(2.0).expect("nonzero"), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_modulo_keeps_dividend_sign() {
        let v = Vec2::new(7.0, -7.0).modulo(5.0).expect("nonzero");
        assert_eq!(v, Vec2::new(2.0, -2.0));
    }

    #[test]
    fn test_normalize() {
        assert!(approx(Vec2::new(3.0, 4.0).normalize(), Vec2::new(0.6, 0.8)));
        assert_eq!(Vec2::zero().normalize(), Vec2::zero());
    }

    #[test]
    fn test_rotate_radians() {
        let r = Vec2::new(1.0, 0.0).rotate(FRAC_PI_2);
        assert!(approx(r, Vec2::new(0.0, 1.0)));

        let about = Vec2::new(2.0, 1.0).rotate_about(Vec2::new(1.0, 1.0), FRAC_PI_2);
        assert!(approx(about, Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_products_and_distance() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.dot(b) - 11.0).abs() < EPSILON);
        assert!((a.cross(b) + 2.0).abs() < EPSILON);
        assert!((Vec2::zero().distance(Vec2::new(3.0, 4.0)) - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_comparisons_are_conjunctive() {
        let a = Vec2::new(0.0, 5.0);
        let b = Vec2::new(1.0, 4.0);
        assert!(!a.less_than_eq(b));
        assert!(!b.less_than_eq(a));
        assert!(a.less_than_eq(a));
        assert!(!a.less_than(a));
        assert!(Vec2::new(2.0, 2.0).greater_than(Vec2::new(1.0, 1.0)));
        assert_eq!(a.min(b), Vec2::new(0.0, 4.0));
        assert_eq!(a.max(b), Vec2::new(1.0, 5.0));
    }

    #[test]
    fn test_design_units() {
        assert_eq!(Vec2::new(10.0, 2.0).mm(), Vec2::new(50.0, 10.0));
        assert!(approx(Vec2::new(50.0, 10.0).to_mm(), Vec2::new(10.0, 2.0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Vec2::new(1.5, -2.0).to_string(), "(1.5, -2)");
    }
}
