//! Points on the unit sphere
//!
//! A [`Point`] is a thin wrapper over [`glam::DVec3`]. Constructors that come
//! from projections do not normalize; callers that need unit length call
//! [`Point::normalize`].

use glam::DVec3;
use std::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 3D vector that usually lies on the unit sphere
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point(pub DVec3);

impl Point {
    /// Create a point from raw coordinates without normalizing
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point(DVec3::new(x, y, z))
    }

    /// Create a unit-length point from raw coordinates
    ///
    /// # Example
    ///
    /// ```
    /// use rust_s2_cells::Point;
    ///
    /// let p = Point::from_coords(3.0, 0.0, 4.0);
    /// assert!((p.norm() - 1.0).abs() < 1e-15);
    /// ```
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Point::new(x, y, z).normalize()
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn z(&self) -> f64 {
        self.0.z
    }

    /// Component by axis index (0 = x, 1 = y, 2 = z)
    #[inline]
    pub fn get(&self, axis: usize) -> f64 {
        self.0[axis]
    }

    #[inline]
    pub fn dot(&self, other: Point) -> f64 {
        self.0.dot(other.0)
    }

    #[inline]
    pub fn cross(&self, other: Point) -> Point {
        Point(self.0.cross(other.0))
    }

    #[inline]
    pub fn norm2(&self) -> f64 {
        self.0.length_squared()
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.0.length()
    }

    /// Scale to unit length; the zero vector is returned unchanged
    pub fn normalize(&self) -> Point {
        let n = self.norm();
        if n == 0.0 {
            return *self;
        }
        Point(self.0 * (1.0 / n))
    }

    /// Angle between two vectors in radians, in `[0, π]`
    ///
    /// Uses `atan2(|a×b|, a·b)`, which stays accurate for nearly parallel
    /// and nearly antipodal vectors. Inputs need not be unit length.
    pub fn angle(&self, other: Point) -> f64 {
        self.cross(other).norm().atan2(self.dot(other))
    }

    /// Index of the component with the largest absolute value
    ///
    /// Ties resolve toward z, then y.
    pub fn largest_abs_component(&self) -> usize {
        let a = self.0.abs();
        if a.x > a.y {
            if a.x > a.z {
                0
            } else {
                2
            }
        } else if a.y > a.z {
            1
        } else {
            2
        }
    }

    /// A unit vector orthogonal to this one
    pub fn ortho(&self) -> Point {
        let temp = match self.largest_abs_component() {
            1 => Point::new(1.0, 0.0, 0.0),
            2 => Point::new(0.0, 1.0, 0.0),
            _ => Point::new(0.0, 0.0, 1.0),
        };
        self.cross(temp).normalize()
    }

    /// Component-wise absolute value
    #[inline]
    pub fn abs(&self) -> Point {
        Point(self.0.abs())
    }

    /// True if the angle between the two points is at most `max_error` radians
    pub fn approx_eq(&self, other: Point, max_error: f64) -> bool {
        self.angle(other) <= max_error
    }
}

impl From<DVec3> for Point {
    fn from(v: DVec3) -> Self {
        Point(v)
    }
}

impl From<Point> for DVec3 {
    fn from(p: Point) -> Self {
        p.0
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point(-self.0)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point(self.0 * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_keeps_zero() {
        let zero = Point::new(0.0, 0.0, 0.0);
        assert_eq!(zero.normalize(), zero);

        let p = Point::new(0.0, 2.0, 0.0).normalize();
        assert_eq!(p, Point::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_angle() {
        let x = Point::new(1.0, 0.0, 0.0);
        let y = Point::new(0.0, 1.0, 0.0);
        assert!((x.angle(y) - FRAC_PI_2).abs() < 1e-15);
        assert!((x.angle(-x) - PI).abs() < 1e-15);
        assert_eq!(x.angle(x), 0.0);
    }

    #[test]
    fn test_largest_abs_component() {
        assert_eq!(Point::new(-3.0, 1.0, 2.0).largest_abs_component(), 0);
        assert_eq!(Point::new(0.1, -5.0, 2.0).largest_abs_component(), 1);
        assert_eq!(Point::new(0.1, 0.2, -0.3).largest_abs_component(), 2);
    }

    #[test]
    fn test_ortho() {
        for p in [
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, -1.0, 0.0),
            Point::from_coords(1.0, 2.0, 3.0),
        ] {
            let o = p.ortho();
            assert!(p.dot(o).abs() < 1e-15);
            assert!((o.norm() - 1.0).abs() < 1e-15);
        }
    }
}
