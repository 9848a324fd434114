//! Geometry primitives on the unit sphere
//!
//! Points, latitude/longitude pairs, one-dimensional intervals, and the small
//! set of spherical predicates (robust cross product, crossing tests, triangle
//! area) that cell geometry and the region types are built from.

mod interval;
mod latlng;
mod point;

pub use interval::{R1Interval, S1Interval};
pub use latlng::LatLng;
pub use point::Point;

/// Machine epsilon for `f64`
pub const DBL_EPSILON: f64 = f64::EPSILON;

/// IEEE 754 remainder: `x - n*y` where `n` is `x/y` rounded to nearest, ties to even
///
/// Unlike `%`, the result lies in `[-|y|/2, |y|/2]`.
pub fn ieee_remainder(x: f64, y: f64) -> f64 {
    x - (x / y).round_ties_even() * y
}

/// A vector orthogonal to both `a` and `b`, non-zero even when `a == ±b`
///
/// `a` and `b` are expected to be unit length. Computing `(b+a) × (b-a)`
/// keeps the result orthogonal even when the inputs differ only in their
/// last bits.
pub fn robust_cross_prod(a: Point, b: Point) -> Point {
    let x = (b + a).cross(b - a);
    if x != Point::new(0.0, 0.0, 0.0) {
        return x;
    }
    a.ortho()
}

/// True if `a`, `b`, `c` are strictly counter-clockwise
///
/// Evaluated as `(c×a)·b` so that `abc` and `cba` are never both reported CCW.
pub fn simple_ccw(a: Point, b: Point, c: Point) -> bool {
    c.cross(a).dot(b) > 0.0
}

/// True if edge `ab` crosses edge `cd` at a point interior to both
///
/// Edges that share a vertex, or that are degenerate, do not cross.
pub fn simple_crossing(a: Point, b: Point, c: Point, d: Point) -> bool {
    let ab = a.cross(b);
    let acb = -ab.dot(c);
    let bda = ab.dot(d);
    if acb * bda <= 0.0 {
        return false;
    }
    let cd = c.cross(d);
    let cbd = -cd.dot(b);
    let dac = cd.dot(a);
    acb * cbd > 0.0 && acb * dac > 0.0
}

/// Area of the spherical triangle `abc` in steradians
///
/// Uses l'Huilier's theorem, which is stable for both large and tiny
/// triangles, and switches to [`girard_area`] for long thin triangles where
/// l'Huilier loses precision. The result is always non-negative.
pub fn area(a: Point, b: Point, c: Point) -> f64 {
    let sa = b.angle(c);
    let sb = c.angle(a);
    let sc = a.angle(b);
    let s = 0.5 * (sa + sb + sc);
    if s >= 3e-4 {
        let s2 = s * s;
        let dmin = s - sa.max(sb.max(sc));
        if dmin < 1e-2 * s * s2 * s2 {
            let girard = girard_area(a, b, c);
            if dmin < s * (0.1 * girard) {
                return girard;
            }
        }
    }
    4.0 * (((0.5 * s).tan()
        * (0.5 * (s - sa)).tan()
        * (0.5 * (s - sb)).tan()
        * (0.5 * (s - sc)).tan())
    .max(0.0)
    .sqrt())
    .atan()
}

/// Area of the spherical triangle `abc` by Girard's formula
///
/// Faster than [`area`] but inaccurate for very small triangles. Written in
/// terms of edge-plane angles, so `a == b == c` yields zero without a
/// special case.
pub fn girard_area(a: Point, b: Point, c: Point) -> f64 {
    let ab = a.cross(b);
    let bc = b.cross(c);
    let ac = a.cross(c);
    (ab.angle(ac) - ab.angle(bc) + bc.angle(ac)).max(0.0)
}
