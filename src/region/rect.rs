//! Latitude/longitude rectangles

use std::f64::consts::{FRAC_PI_2, PI};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Cap;
use crate::cell::Cell;
use crate::geometry::{
    ieee_remainder, robust_cross_prod, simple_crossing, LatLng, Point, R1Interval, S1Interval,
};

/// A closed rectangle in latitude/longitude space
///
/// The latitude range is a plain interval; the longitude range is an arc that
/// may cross the antimeridian. A rectangle is empty when its latitude range
/// is empty.
///
/// # Example
///
/// ```
/// use rust_s2_cells::{LatLng, Rect};
///
/// // 10° square straddling the antimeridian.
/// let rect = Rect::from_lat_lng(LatLng::from_degrees(-5.0, 175.0), LatLng::from_degrees(5.0, -175.0));
/// assert!(rect.is_inverted());
/// assert!(rect.contains_lat_lng(LatLng::from_degrees(0.0, 180.0)));
/// assert!(!rect.contains_lat_lng(LatLng::from_degrees(0.0, 0.0)));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    lat: R1Interval,
    lng: S1Interval,
}

impl Rect {
    pub fn new(lat: R1Interval, lng: S1Interval) -> Self {
        Rect { lat, lng }
    }

    /// Rectangle with corners `lo` (south-west) and `hi` (north-east)
    pub fn from_lat_lng(lo: LatLng, hi: LatLng) -> Self {
        Rect {
            lat: R1Interval::new(lo.lat, hi.lat),
            lng: S1Interval::new(lo.lng, hi.lng),
        }
    }

    /// Smallest rectangle containing both points
    pub fn from_point_pair(p1: LatLng, p2: LatLng) -> Self {
        Rect {
            lat: R1Interval::from_point_pair(p1.lat, p2.lat),
            lng: S1Interval::from_point_pair(p1.lng, p2.lng),
        }
    }

    /// Rectangle centred on `center` with full extents `size`
    pub fn from_center_size(center: LatLng, size: LatLng) -> Self {
        Rect::from_point(center).expanded(LatLng::from_radians(0.5 * size.lat, 0.5 * size.lng))
    }

    pub fn from_point(p: LatLng) -> Self {
        Rect::from_lat_lng(p, p)
    }

    pub fn empty() -> Self {
        Rect {
            lat: R1Interval::empty(),
            lng: S1Interval::empty(),
        }
    }

    pub fn full() -> Self {
        Rect {
            lat: Rect::full_lat(),
            lng: S1Interval::full(),
        }
    }

    /// The latitude range `[-π/2, π/2]`
    pub fn full_lat() -> R1Interval {
        R1Interval::new(-FRAC_PI_2, FRAC_PI_2)
    }

    /// The longitude range `[-π, π]`
    pub fn full_lng() -> S1Interval {
        S1Interval::full()
    }

    #[inline]
    pub fn lat(&self) -> R1Interval {
        self.lat
    }

    #[inline]
    pub fn lng(&self) -> S1Interval {
        self.lng
    }

    pub fn is_valid(&self) -> bool {
        self.lat.lo.abs() <= FRAC_PI_2
            && self.lat.hi.abs() <= FRAC_PI_2
            && self.lng.is_valid()
            && self.lat.is_empty() == self.lng.is_empty()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lat == Rect::full_lat() && self.lng.is_full()
    }

    /// True if the longitude range crosses the antimeridian
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.lng.is_inverted()
    }

    pub fn lo(&self) -> LatLng {
        LatLng::from_radians(self.lat.lo, self.lng.lo)
    }

    pub fn hi(&self) -> LatLng {
        LatLng::from_radians(self.lat.hi, self.lng.hi)
    }

    /// Corner `k` in counter-clockwise order starting from the south-west
    pub fn vertex(&self, k: usize) -> LatLng {
        match k & 3 {
            0 => self.lo(),
            1 => LatLng::from_radians(self.lat.lo, self.lng.hi),
            2 => self.hi(),
            _ => LatLng::from_radians(self.lat.hi, self.lng.lo),
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::from_radians(self.lat.center(), self.lng.center())
    }

    /// Latitude and longitude extents
    pub fn size(&self) -> LatLng {
        LatLng::from_radians(self.lat.length(), self.lng.length())
    }

    /// Surface area in steradians
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.lng.length() * (self.lat.hi.sin() - self.lat.lo.sin()).abs()
    }

    pub fn contains_lat_lng(&self, ll: LatLng) -> bool {
        self.lat.contains(ll.lat) && self.lng.contains(ll.lng)
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.contains_lat_lng(LatLng::from_point(p))
    }

    pub fn interior_contains_lat_lng(&self, ll: LatLng) -> bool {
        self.lat.interior_contains(ll.lat) && self.lng.interior_contains(ll.lng)
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.lat.contains_interval(&other.lat) && self.lng.contains_interval(&other.lng)
    }

    pub fn intersects_rect(&self, other: &Rect) -> bool {
        self.lat.intersects(&other.lat) && self.lng.intersects(&other.lng)
    }

    /// Exact test: true if the rectangle and `cell` share any point
    pub fn intersects_cell(&self, cell: &Cell) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.contains_point(cell.center()) {
            return true;
        }
        if cell.contains_point(self.center().to_point()) {
            return true;
        }
        if !self.intersects_rect(&cell.rect_bound()) {
            return false;
        }

        let vertices = cell.vertices();
        let lat_lngs = vertices.map(LatLng::from_point);
        if lat_lngs.iter().any(|ll| self.contains_lat_lng(*ll)) {
            return true;
        }

        // No vertex is inside, so any intersection crosses a rectangle edge.
        for k in 0..4 {
            let edge_lng = S1Interval::from_point_pair(lat_lngs[k].lng, lat_lngs[(k + 1) & 3].lng);
            if !self.lng.intersects(&edge_lng) {
                continue;
            }
            let a = vertices[k];
            let b = vertices[(k + 1) & 3];
            if edge_lng.contains(self.lng.lo) && intersects_lng_edge(a, b, &self.lat, self.lng.lo) {
                return true;
            }
            if edge_lng.contains(self.lng.hi) && intersects_lng_edge(a, b, &self.lat, self.lng.hi) {
                return true;
            }
            if intersects_lat_edge(a, b, self.lat.lo, &self.lng)
                || intersects_lat_edge(a, b, self.lat.hi, &self.lng)
            {
                return true;
            }
        }
        false
    }

    /// True if the rectangle contains every point of `cell`
    ///
    /// Conservative: tests against the cell's rectangle bound.
    pub fn contains_cell(&self, cell: &Cell) -> bool {
        self.contains_rect(&cell.rect_bound())
    }

    /// False only if the rectangle and `cell` are certainly disjoint
    pub fn may_intersect_cell(&self, cell: &Cell) -> bool {
        self.intersects_rect(&cell.rect_bound())
    }

    pub fn add_point(&self, ll: LatLng) -> Rect {
        Rect {
            lat: self.lat.add_point(ll.lat),
            lng: self.lng.add_point(ll.lng),
        }
    }

    /// Grow by `margin` on each side, clamping latitude to the poles
    pub fn expanded(&self, margin: LatLng) -> Rect {
        if self.is_empty() {
            return *self;
        }
        Rect {
            lat: self.lat.expanded(margin.lat).intersection(&Rect::full_lat()),
            lng: self.lng.expanded(margin.lng),
        }
    }

    /// Widen the longitude range to full if the rectangle touches a pole
    pub fn polar_closure(&self) -> Rect {
        if self.lat.lo == -FRAC_PI_2 || self.lat.hi == FRAC_PI_2 {
            return Rect {
                lat: self.lat,
                lng: S1Interval::full(),
            };
        }
        *self
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            lat: self.lat.union(&other.lat),
            lng: self.lng.union(&other.lng),
        }
    }

    pub fn intersection(&self, other: &Rect) -> Rect {
        let lat = self.lat.intersection(&other.lat);
        let lng = self.lng.intersection(&other.lng);
        if lat.is_empty() || lng.is_empty() {
            return Rect::empty();
        }
        Rect { lat, lng }
    }

    /// A cap containing the rectangle
    ///
    /// The smaller of a cap around the nearer pole and a cap around the
    /// rectangle's centre through its four corners.
    pub fn cap_bound(&self) -> Cap {
        if self.is_empty() {
            return Cap::empty();
        }
        let (pole_z, pole_angle) = if self.lat.lo + self.lat.hi < 0.0 {
            (-1.0, FRAC_PI_2 + self.lat.hi)
        } else {
            (1.0, FRAC_PI_2 - self.lat.lo)
        };
        let pole_cap = Cap::from_axis_angle(Point::new(0.0, 0.0, pole_z), pole_angle);

        // A centre cap only helps when the longitude span is under 180°.
        let lng_span = self.lng.hi - self.lng.lo;
        if ieee_remainder(lng_span, 2.0 * PI) >= 0.0 && lng_span < 2.0 * PI {
            let mut mid_cap = Cap::from_point(self.center().to_point());
            for k in 0..4 {
                mid_cap = mid_cap.add_point(self.vertex(k).to_point());
            }
            if mid_cap.height() < pole_cap.height() {
                return mid_cap;
            }
        }
        pole_cap
    }
}

/// True if edge `ab` crosses the meridian segment at `lng` spanning `lat`
fn intersects_lng_edge(a: Point, b: Point, lat: &R1Interval, lng: f64) -> bool {
    simple_crossing(
        a,
        b,
        LatLng::from_radians(lat.lo, lng).to_point(),
        LatLng::from_radians(lat.hi, lng).to_point(),
    )
}

/// True if edge `ab` crosses the parallel at `lat` within the longitude range `lng`
fn intersects_lat_edge(a: Point, b: Point, lat: f64, lng: &S1Interval) -> bool {
    // Frame with z normal to the edge's great circle (pointing north), x at
    // its northernmost point and y completing the right-handed set.
    let mut z = robust_cross_prod(a, b).normalize();
    if z.z() < 0.0 {
        z = -z;
    }
    let y = robust_cross_prod(z, Point::new(0.0, 0.0, 1.0)).normalize();
    let x = y.cross(z);

    let sin_lat = lat.sin();
    if sin_lat.abs() >= x.z() {
        // The great circle never reaches this latitude.
        return false;
    }

    let cos_theta = sin_lat / x.z();
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let theta = sin_theta.atan2(cos_theta);
    let ab_theta = S1Interval::from_point_pair(
        a.dot(y).atan2(a.dot(x)),
        b.dot(y).atan2(b.dot(x)),
    );

    if ab_theta.contains(theta) {
        let isect = x * cos_theta + y * sin_theta;
        if lng.contains(isect.y().atan2(isect.x())) {
            return true;
        }
    }
    if ab_theta.contains(-theta) {
        let isect = x * cos_theta - y * sin_theta;
        if lng.contains(isect.y().atan2(isect.x())) {
            return true;
        }
    }
    false
}
