//! Latitude/longitude coordinates in radians

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{ieee_remainder, Point};

/// A latitude/longitude pair in radians
///
/// Valid values have latitude in `[-π/2, π/2]` and longitude in `[-π, π]`.
/// Conversion to and from [`Point`] is exact up to floating-point rounding.
///
/// # Example
///
/// ```
/// use rust_s2_cells::LatLng;
///
/// let ll = LatLng::from_degrees(37.5, -122.25);
/// let back = LatLng::from_point(ll.to_point());
/// assert!((back.lat_degrees() - 37.5).abs() < 1e-12);
/// assert!((back.lng_degrees() + 122.25).abs() < 1e-12);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLng {
    /// Latitude in radians
    pub lat: f64,
    /// Longitude in radians
    pub lng: f64,
}

impl LatLng {
    #[inline]
    pub const fn from_radians(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    pub fn from_degrees(lat: f64, lng: f64) -> Self {
        LatLng {
            lat: lat.to_radians(),
            lng: lng.to_radians(),
        }
    }

    /// Latitude and longitude of the direction of `p`; `p` need not be unit length
    pub fn from_point(p: Point) -> Self {
        LatLng {
            lat: p.z().atan2((p.x() * p.x() + p.y() * p.y()).sqrt()),
            lng: p.y().atan2(p.x()),
        }
    }

    /// Unit-length point for this coordinate
    pub fn to_point(&self) -> Point {
        let cos_lat = self.lat.cos();
        Point::new(
            self.lng.cos() * cos_lat,
            self.lng.sin() * cos_lat,
            self.lat.sin(),
        )
    }

    #[inline]
    pub fn lat_degrees(&self) -> f64 {
        self.lat.to_degrees()
    }

    #[inline]
    pub fn lng_degrees(&self) -> f64 {
        self.lng.to_degrees()
    }

    pub fn is_valid(&self) -> bool {
        self.lat.abs() <= FRAC_PI_2 && self.lng.abs() <= PI
    }

    /// Clamp latitude to `[-π/2, π/2]` and wrap longitude into `[-π, π]`
    pub fn normalized(&self) -> LatLng {
        LatLng {
            lat: self.lat.clamp(-FRAC_PI_2, FRAC_PI_2),
            lng: ieee_remainder(self.lng, 2.0 * PI),
        }
    }

    /// Great-circle angle to `other` in radians (haversine form)
    pub fn distance(&self, other: LatLng) -> f64 {
        let dlat = (0.5 * (other.lat - self.lat)).sin();
        let dlng = (0.5 * (other.lng - self.lng)).sin();
        let x = dlat * dlat + dlng * dlng * self.lat.cos() * other.lat.cos();
        2.0 * x.min(1.0).sqrt().asin()
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.9}, {:.9})", self.lat_degrees(), self.lng_degrees())
    }
}

impl From<Point> for LatLng {
    fn from(p: Point) -> Self {
        LatLng::from_point(p)
    }
}

impl From<LatLng> for Point {
    fn from(ll: LatLng) -> Self {
        ll.to_point()
    }
}
