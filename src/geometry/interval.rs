//! Closed intervals on the real line and on the unit circle
//!
//! [`R1Interval`] bounds latitudes and face coordinates. [`S1Interval`] bounds
//! longitudes and may wrap across the antimeridian (`lo > hi`).

use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ieee_remainder;

/// A closed interval `[lo, hi]` of real numbers; empty when `lo > hi`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct R1Interval {
    pub lo: f64,
    pub hi: f64,
}

impl R1Interval {
    #[inline]
    pub const fn new(lo: f64, hi: f64) -> Self {
        R1Interval { lo, hi }
    }

    /// The canonical empty interval
    #[inline]
    pub const fn empty() -> Self {
        R1Interval { lo: 1.0, hi: 0.0 }
    }

    #[inline]
    pub const fn from_point(p: f64) -> Self {
        R1Interval { lo: p, hi: p }
    }

    /// Smallest interval containing both points, in either order
    pub fn from_point_pair(p1: f64, p2: f64) -> Self {
        if p1 <= p2 {
            R1Interval::new(p1, p2)
        } else {
            R1Interval::new(p2, p1)
        }
    }

    /// Endpoint by index: 0 is `lo`, anything else is `hi`
    #[inline]
    pub fn bound(&self, i: usize) -> f64 {
        if i == 0 {
            self.lo
        } else {
            self.hi
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    #[inline]
    pub fn center(&self) -> f64 {
        0.5 * (self.lo + self.hi)
    }

    /// Negative for empty intervals
    #[inline]
    pub fn length(&self) -> f64 {
        self.hi - self.lo
    }

    #[inline]
    pub fn contains(&self, p: f64) -> bool {
        p >= self.lo && p <= self.hi
    }

    #[inline]
    pub fn interior_contains(&self, p: f64) -> bool {
        p > self.lo && p < self.hi
    }

    pub fn contains_interval(&self, y: &R1Interval) -> bool {
        if y.is_empty() {
            return true;
        }
        y.lo >= self.lo && y.hi <= self.hi
    }

    pub fn interior_contains_interval(&self, y: &R1Interval) -> bool {
        if y.is_empty() {
            return true;
        }
        y.lo > self.lo && y.hi < self.hi
    }

    pub fn intersects(&self, y: &R1Interval) -> bool {
        if self.lo <= y.lo {
            y.lo <= self.hi && y.lo <= y.hi
        } else {
            self.lo <= y.hi && self.lo <= self.hi
        }
    }

    pub fn interior_intersects(&self, y: &R1Interval) -> bool {
        y.lo < self.hi && self.lo < y.hi && self.lo < self.hi && y.lo <= y.hi
    }

    pub fn union(&self, y: &R1Interval) -> R1Interval {
        if self.is_empty() {
            return *y;
        }
        if y.is_empty() {
            return *self;
        }
        R1Interval::new(self.lo.min(y.lo), self.hi.max(y.hi))
    }

    pub fn intersection(&self, y: &R1Interval) -> R1Interval {
        R1Interval::new(self.lo.max(y.lo), self.hi.min(y.hi))
    }

    pub fn add_point(&self, p: f64) -> R1Interval {
        if self.is_empty() {
            R1Interval::from_point(p)
        } else {
            R1Interval::new(self.lo.min(p), self.hi.max(p))
        }
    }

    /// Grow both ends by `radius`; empty intervals stay empty
    pub fn expanded(&self, radius: f64) -> R1Interval {
        if self.is_empty() {
            return *self;
        }
        R1Interval::new(self.lo - radius, self.hi + radius)
    }

    /// Closest point of the interval to `p`; the interval must be non-empty
    pub fn clamp_point(&self, p: f64) -> f64 {
        self.lo.max(self.hi.min(p))
    }
}

/// A closed arc of the unit circle, stored as endpoint angles in `[-π, π]`
///
/// The arc runs counter-clockwise from `lo` to `hi`; `lo > hi` means it wraps
/// through ±π. `-π` is stored as `π` except in the full interval `[-π, π]`.
/// The empty interval is `[π, -π]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct S1Interval {
    pub lo: f64,
    pub hi: f64,
}

impl S1Interval {
    /// Create an interval, normalizing a lone `-π` endpoint to `π`
    pub fn new(lo: f64, hi: f64) -> Self {
        let mut lo = lo;
        let mut hi = hi;
        if lo == -PI && hi != PI {
            lo = PI;
        }
        if hi == -PI && lo != PI {
            hi = PI;
        }
        S1Interval { lo, hi }
    }

    #[inline]
    pub const fn empty() -> Self {
        S1Interval { lo: PI, hi: -PI }
    }

    #[inline]
    pub const fn full() -> Self {
        S1Interval { lo: -PI, hi: PI }
    }

    pub fn from_point(p: f64) -> Self {
        let p = if p == -PI { PI } else { p };
        S1Interval { lo: p, hi: p }
    }

    /// Shortest arc containing both angles
    pub fn from_point_pair(p1: f64, p2: f64) -> Self {
        let p1 = if p1 == -PI { PI } else { p1 };
        let p2 = if p2 == -PI { PI } else { p2 };
        if positive_distance(p1, p2) <= PI {
            S1Interval { lo: p1, hi: p2 }
        } else {
            S1Interval { lo: p2, hi: p1 }
        }
    }

    #[inline]
    pub fn bound(&self, i: usize) -> f64 {
        if i == 0 {
            self.lo
        } else {
            self.hi
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lo.abs() <= PI
            && self.hi.abs() <= PI
            && !(self.lo == -PI && self.hi != PI)
            && !(self.hi == -PI && self.lo != PI)
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.hi - self.lo == 2.0 * PI
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lo - self.hi == 2.0 * PI
    }

    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.lo > self.hi
    }

    /// Midpoint of the arc, in `[-π, π]`
    pub fn center(&self) -> f64 {
        let c = 0.5 * (self.lo + self.hi);
        if !self.is_inverted() {
            return c;
        }
        if c <= 0.0 {
            c + PI
        } else {
            c - PI
        }
    }

    /// Arc length in radians; negative for the empty interval
    pub fn length(&self) -> f64 {
        let mut len = self.hi - self.lo;
        if len >= 0.0 {
            return len;
        }
        len += 2.0 * PI;
        if len > 0.0 {
            len
        } else {
            -1.0
        }
    }

    /// Containment test for `p` already known to be in `(-π, π]`
    fn fast_contains(&self, p: f64) -> bool {
        if self.is_inverted() {
            (p >= self.lo || p <= self.hi) && !self.is_empty()
        } else {
            p >= self.lo && p <= self.hi
        }
    }

    pub fn contains(&self, p: f64) -> bool {
        let p = if p == -PI { PI } else { p };
        self.fast_contains(p)
    }

    pub fn interior_contains(&self, p: f64) -> bool {
        let p = if p == -PI { PI } else { p };
        if self.is_inverted() {
            p > self.lo || p < self.hi
        } else {
            (p > self.lo && p < self.hi) || self.is_full()
        }
    }

    pub fn contains_interval(&self, y: &S1Interval) -> bool {
        if self.is_inverted() {
            if y.is_inverted() {
                return y.lo >= self.lo && y.hi <= self.hi;
            }
            (y.lo >= self.lo || y.hi <= self.hi) && !self.is_empty()
        } else {
            if y.is_inverted() {
                return self.is_full() || y.is_empty();
            }
            y.lo >= self.lo && y.hi <= self.hi
        }
    }

    pub fn intersects(&self, y: &S1Interval) -> bool {
        if self.is_empty() || y.is_empty() {
            return false;
        }
        if self.is_inverted() {
            return y.is_inverted() || y.lo <= self.hi || y.hi >= self.lo;
        }
        if y.is_inverted() {
            return y.lo <= self.hi || y.hi >= self.lo;
        }
        y.lo <= self.hi && y.hi >= self.lo
    }

    /// Smallest arc containing both intervals
    pub fn union(&self, y: &S1Interval) -> S1Interval {
        if y.is_empty() {
            return *self;
        }
        if self.fast_contains(y.lo) {
            if self.fast_contains(y.hi) {
                if self.contains_interval(y) {
                    return *self;
                }
                return S1Interval::full();
            }
            return S1Interval { lo: self.lo, hi: y.hi };
        }
        if self.fast_contains(y.hi) {
            return S1Interval { lo: y.lo, hi: self.hi };
        }
        if self.is_empty() || y.fast_contains(self.lo) {
            return *y;
        }
        let dlo = positive_distance(y.hi, self.lo);
        let dhi = positive_distance(self.hi, y.lo);
        if dlo < dhi {
            S1Interval { lo: y.lo, hi: self.hi }
        } else {
            S1Interval { lo: self.lo, hi: y.hi }
        }
    }

    /// Smallest arc containing the intersection; may be larger when the two
    /// intervals overlap at both ends
    pub fn intersection(&self, y: &S1Interval) -> S1Interval {
        if y.is_empty() {
            return S1Interval::empty();
        }
        if self.fast_contains(y.lo) {
            if self.fast_contains(y.hi) {
                if y.length() < self.length() {
                    return *y;
                }
                return *self;
            }
            return S1Interval { lo: y.lo, hi: self.hi };
        }
        if self.fast_contains(y.hi) {
            return S1Interval { lo: self.lo, hi: y.hi };
        }
        if y.fast_contains(self.lo) {
            return *self;
        }
        S1Interval::empty()
    }

    /// Extend the arc by the shorter way round to include `p`
    pub fn add_point(&self, p: f64) -> S1Interval {
        if p.abs() > PI {
            return *self;
        }
        let p = if p == -PI { PI } else { p };
        if self.fast_contains(p) {
            return *self;
        }
        if self.is_empty() {
            return S1Interval::from_point(p);
        }
        let dlo = positive_distance(p, self.lo);
        let dhi = positive_distance(self.hi, p);
        if dlo < dhi {
            S1Interval { lo: p, hi: self.hi }
        } else {
            S1Interval { lo: self.lo, hi: p }
        }
    }

    /// Grow both ends by `radius`, becoming full when the ends would meet
    pub fn expanded(&self, radius: f64) -> S1Interval {
        if self.is_empty() {
            return *self;
        }
        if self.length() + 2.0 * radius >= 2.0 * PI - 1e-15 {
            return S1Interval::full();
        }
        let mut lo = ieee_remainder(self.lo - radius, 2.0 * PI);
        let hi = ieee_remainder(self.hi + radius, 2.0 * PI);
        if lo <= -PI {
            lo = PI;
        }
        S1Interval { lo, hi }
    }
}

/// Counter-clockwise distance from `a` to `b`, in `[0, 2π)`
fn positive_distance(a: f64, b: f64) -> f64 {
    let d = b - a;
    if d >= 0.0 {
        return d;
    }
    (b + PI) - (a - PI)
}
