//! Planar geometry in lot-local metres.
//!
//! The lot is a flat, local Cartesian frame (x east, y north, metres), so
//! plain `f64` vectors are enough.  Headings are radians measured
//! counter-clockwise from +x.

use std::f64::consts::{PI, TAU};
use std::ops::{Add, Mul, Neg, Sub};

// ── Point2 ────────────────────────────────────────────────────────────────────

/// A point (or free vector) in the lot frame.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `heading`.
    #[inline]
    pub fn from_heading(heading: f64) -> Self {
        Self::new(heading.cos(), heading.sin())
    }

    #[inline]
    pub fn dot(self, other: Point2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Point2) -> f64 {
        (self - other).norm()
    }

    /// Heading of this vector (`atan2(y, x)`).
    #[inline]
    pub fn heading(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Rotate 90° counter-clockwise.
    #[inline]
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2 {
    type Output = Point2;
    #[inline]
    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;
    #[inline]
    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;
    #[inline]
    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point2 {
    type Output = Point2;
    #[inline]
    fn neg(self) -> Point2 {
        Point2::new(-self.x, -self.y)
    }
}

impl std::fmt::Display for Point2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// ── Pose ──────────────────────────────────────────────────────────────────────

/// A position plus heading.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Point2,
    pub heading:  f64,
}

impl Pose {
    #[inline]
    pub const fn new(position: Point2, heading: f64) -> Self {
        Self { position, heading }
    }

    /// Unit vector along the heading.
    #[inline]
    pub fn direction(&self) -> Point2 {
        Point2::from_heading(self.heading)
    }

    /// `true` once `p` lies on or beyond the line through this pose that is
    /// perpendicular to its heading.
    #[inline]
    pub fn is_passed_by(&self, p: Point2) -> bool {
        (p - self.position).dot(self.direction()) >= 0.0
    }
}

// ── Angles ────────────────────────────────────────────────────────────────────

/// Wrap `angle` into (−π, π].
///
/// The result differs from the input by an integer multiple of 2π.  Inputs
/// far outside the range are pre-reduced with `%` so each wrapping loop runs
/// at most once; non-finite input returns NaN.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = if angle.abs() > 2.0 * TAU { angle % TAU } else { angle };
    while a > PI {
        a -= TAU;
    }
    while a <= -PI {
        a += TAU;
    }
    a
}
