//! Spherical caps
//!
//! A cap is the part of the sphere cut off by a plane: every point within
//! some angle of an axis. It is stored as the axis and the height
//! `1 - cos(angle)`, which makes point containment a dot product.

use std::f64::consts::{FRAC_PI_2, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Rect;
use crate::cell::Cell;
use crate::geometry::{ieee_remainder, LatLng, Point, R1Interval, S1Interval};

/// Factor that rounds a height up past any error in its computation
const ROUND_UP: f64 = 1.0 + 1.0 / (1u64 << 52) as f64;

/// A spherical cap: axis plus height
///
/// Negative height is the empty cap; height 2 or more is the whole sphere.
///
/// # Example
///
/// ```
/// use rust_s2_cells::{Cap, LatLng};
///
/// let center = LatLng::from_degrees(48.85, 2.35).to_point();
/// let cap = Cap::from_axis_angle(center, 0.01);
/// assert!(cap.contains_point(center));
/// assert!(!cap.contains_point(LatLng::from_degrees(40.0, 2.35).to_point()));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cap {
    axis: Point,
    height: f64,
}

impl Cap {
    /// Cap from a unit-length axis and a height in `[0, 2]`
    pub fn from_axis_height(axis: Point, height: f64) -> Self {
        Cap { axis, height }
    }

    /// Cap of all points within `angle` radians of `axis`
    pub fn from_axis_angle(axis: Point, angle: f64) -> Self {
        let d = (0.5 * angle.min(PI)).sin();
        Cap {
            axis,
            height: 2.0 * d * d,
        }
    }

    /// Cap with the given surface area in steradians
    pub fn from_axis_area(axis: Point, area: f64) -> Self {
        Cap {
            axis,
            height: area / (2.0 * PI),
        }
    }

    /// Cap containing the single point `p`
    pub fn from_point(p: Point) -> Self {
        Cap { axis: p, height: 0.0 }
    }

    pub fn empty() -> Self {
        Cap {
            axis: Point::new(1.0, 0.0, 0.0),
            height: -1.0,
        }
    }

    pub fn full() -> Self {
        Cap {
            axis: Point::new(1.0, 0.0, 0.0),
            height: 2.0,
        }
    }

    #[inline]
    pub fn axis(&self) -> Point {
        self.axis
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn area(&self) -> f64 {
        2.0 * PI * self.height.max(0.0)
    }

    /// Opening angle in radians; negative for the empty cap
    pub fn angle(&self) -> f64 {
        if self.is_empty() {
            return -1.0;
        }
        2.0 * (0.5 * self.height).min(1.0).sqrt().asin()
    }

    pub fn is_valid(&self) -> bool {
        (self.axis.norm2() - 1.0).abs() <= 5e-15 && self.height <= 2.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.height < 0.0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.height >= 2.0
    }

    /// The closure of the set of points not in this cap
    pub fn complement(&self) -> Cap {
        let height = if self.is_full() {
            -1.0
        } else {
            2.0 - self.height.max(0.0)
        };
        Cap {
            axis: -self.axis,
            height,
        }
    }

    pub fn contains_cap(&self, other: &Cap) -> bool {
        if self.is_full() || other.is_empty() {
            return true;
        }
        self.angle() >= self.axis.angle(other.axis) + other.angle()
    }

    /// True if the interiors of the two caps share a point
    pub fn interior_intersects(&self, other: &Cap) -> bool {
        !self.complement().contains_cap(other)
    }

    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        (self.axis - p).norm2() <= 2.0 * self.height
    }

    pub fn interior_contains_point(&self, p: Point) -> bool {
        self.is_full() || (self.axis - p).norm2() < 2.0 * self.height
    }

    /// Grow the cap to include `p`, keeping the axis
    ///
    /// An empty cap becomes the single point `p`.
    pub fn add_point(&self, p: Point) -> Cap {
        if self.is_empty() {
            return Cap::from_point(p);
        }
        let dist2 = (self.axis - p).norm2();
        Cap {
            axis: self.axis,
            height: self.height.max(ROUND_UP * 0.5 * dist2),
        }
    }

    /// Grow the cap to include `other`, keeping the axis
    pub fn add_cap(&self, other: &Cap) -> Cap {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let angle = self.axis.angle(other.axis) + other.angle();
        if angle >= PI {
            return Cap {
                axis: self.axis,
                height: 2.0,
            };
        }
        let d = (0.5 * angle).sin();
        Cap {
            axis: self.axis,
            height: self.height.max(ROUND_UP * 2.0 * d * d),
        }
    }

    /// Smallest latitude/longitude rectangle containing the cap
    pub fn rect_bound(&self) -> Rect {
        if self.is_empty() {
            return Rect::empty();
        }
        let axis = LatLng::from_point(self.axis);
        let cap_angle = self.angle();

        let mut all_longitudes = false;
        let mut lat_lo = axis.lat - cap_angle;
        let mut lat_hi = axis.lat + cap_angle;
        if lat_lo <= -FRAC_PI_2 {
            lat_lo = -FRAC_PI_2;
            all_longitudes = true;
        }
        if lat_hi >= FRAC_PI_2 {
            lat_hi = FRAC_PI_2;
            all_longitudes = true;
        }

        let mut lng = S1Interval::full();
        if !all_longitudes {
            // The longitude span is the angle A at the pole of the spherical
            // triangle (pole, axis, tangent point), from the sine rule.
            let sin_a = (self.height * (2.0 - self.height)).sqrt();
            let sin_c = axis.lat.cos();
            if sin_a <= sin_c {
                let angle_a = (sin_a / sin_c).asin();
                lng = S1Interval::new(
                    ieee_remainder(axis.lng - angle_a, 2.0 * PI),
                    ieee_remainder(axis.lng + angle_a, 2.0 * PI),
                );
            }
        }
        Rect::new(R1Interval::new(lat_lo, lat_hi), lng)
    }

    /// True if the cap contains every point of `cell`
    pub fn contains_cell(&self, cell: &Cell) -> bool {
        let vertices = cell.vertices();
        if !vertices.iter().all(|v| self.contains_point(*v)) {
            return false;
        }
        // All four vertices are inside; the cell can still poke out if the
        // complement reaches into it across an edge.
        !self.complement().intersects_cell(cell, &vertices)
    }

    /// False only if the cap and `cell` are certainly disjoint
    pub fn may_intersect_cell(&self, cell: &Cell) -> bool {
        let vertices = cell.vertices();
        if vertices.iter().any(|v| self.contains_point(*v)) {
            return true;
        }
        self.intersects_cell(cell, &vertices)
    }

    /// Intersection test for the case where no vertex of `cell` is in the cap
    fn intersects_cell(&self, cell: &Cell, vertices: &[Point; 4]) -> bool {
        // A cap this large containing no vertex cannot reach the cell's
        // interior without containing a vertex.
        if self.height >= 1.0 || self.is_empty() {
            return false;
        }
        if cell.contains_point(self.axis) {
            return true;
        }

        let sin2_angle = self.height * (2.0 - self.height);
        for k in 0..4 {
            let edge = cell.edge_raw(k);
            let dot = self.axis.dot(edge);
            if dot > 0.0 {
                // The axis is on the interior side of this edge.
                continue;
            }
            if dot * dot > sin2_angle * edge.norm2() {
                return false;
            }
            // The closest point of the great circle to the axis lies between
            // the edge endpoints iff `dir` separates them.
            let dir = edge.cross(self.axis);
            if dir.dot(vertices[k]) < 0.0 && dir.dot(vertices[(k + 1) & 3]) > 0.0 {
                return true;
            }
        }
        false
    }

    /// True if axes agree within `max_error` radians and heights within `max_error`
    pub fn approx_eq(&self, other: &Cap, max_error: f64) -> bool {
        (self.axis.approx_eq(other.axis, max_error) && (self.height - other.height).abs() <= max_error)
            || (self.is_empty() && other.height <= max_error)
            || (other.is_empty() && self.height <= max_error)
            || (self.is_full() && other.height >= 2.0 - max_error)
            || (other.is_full() && self.height >= 2.0 - max_error)
    }
}
