//! Per-level cell size metrics
//!
//! A metric measures one kind of cell size (angular width, edge length,
//! area) as `deriv * 2^(-dim * level)`. `dim` is 1 for lengths and 2 for
//! areas. The derivatives below are the bounds for the quadratic projection.

use std::f64::consts::{PI, SQRT_2};

use crate::cellid::MAX_LEVEL;

/// A cell size measure that halves (lengths) or quarters (areas) per level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    /// 1 for lengths, 2 for areas
    pub dim: u8,
    /// Value of the metric at level 0
    pub deriv: f64,
}

/// Minimum angular distance between opposite edges of any cell
pub const MIN_WIDTH: Metric = Metric::new(1, 2.0 * SQRT_2 / 3.0);
/// Average angular width
pub const AVG_WIDTH: Metric = Metric::new(1, 1.434_523_672_886_099_389);
/// Maximum angular width
pub const MAX_WIDTH: Metric = Metric::new(1, 1.704_897_179_199_218_452);

/// Minimum edge length
pub const MIN_EDGE: Metric = Metric::new(1, 2.0 * SQRT_2 / 3.0);
/// Average edge length
pub const AVG_EDGE: Metric = Metric::new(1, 1.459_213_746_386_106_062);
/// Maximum edge length
pub const MAX_EDGE: Metric = Metric::new(1, 1.704_897_179_199_218_452);

/// Maximum diagonal length
pub const MAX_DIAG: Metric = Metric::new(1, 2.438_654_594_434_021_032);

/// Minimum cell area
pub const MIN_AREA: Metric = Metric::new(2, 8.0 * SQRT_2 / 9.0);
/// Average cell area: the sphere split evenly across the six faces
pub const AVG_AREA: Metric = Metric::new(2, 4.0 * PI / 6.0);
/// Maximum cell area
pub const MAX_AREA: Metric = Metric::new(2, 2.635_799_256_963_161_491);

impl Metric {
    pub const fn new(dim: u8, deriv: f64) -> Self {
        Metric { dim, deriv }
    }

    /// Value of the metric for cells at `level`
    pub fn value(&self, level: u8) -> f64 {
        self.deriv * 2f64.powi(-(self.dim as i32) * level as i32)
    }

    /// Smallest level whose metric value is at most `value`
    ///
    /// Returns 30 for non-positive values.
    pub fn min_level(&self, value: f64) -> u8 {
        if value <= 0.0 {
            return MAX_LEVEL;
        }
        let level = -(ilogb(value / self.deriv) >> (self.dim - 1));
        level.clamp(0, MAX_LEVEL as i32) as u8
    }

    /// Largest level whose metric value is at least `value`
    ///
    /// Returns 30 for non-positive values.
    pub fn max_level(&self, value: f64) -> u8 {
        if value <= 0.0 {
            return MAX_LEVEL;
        }
        let level = ilogb(self.deriv / value) >> (self.dim - 1);
        level.clamp(0, MAX_LEVEL as i32) as u8
    }

    /// Level whose metric value is closest to `value`
    pub fn closest_level(&self, value: f64) -> u8 {
        let scale = if self.dim == 1 { SQRT_2 } else { 2.0 };
        self.min_level(scale * value)
    }
}

/// Unbiased binary exponent of a positive normal `x`: `x = m * 2^e` with `m ∈ [1, 2)`
fn ilogb(x: f64) -> i32 {
    ((x.to_bits() >> 52) & 0x7ff) as i32 - 1023
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ilogb() {
        assert_eq!(ilogb(1.0), 0);
        assert_eq!(ilogb(1.5), 0);
        assert_eq!(ilogb(2.0), 1);
        assert_eq!(ilogb(0.25), -2);
        assert_eq!(ilogb(0.3), -2);
    }

    #[test]
    fn test_level_inverse() {
        for metric in [MIN_WIDTH, AVG_EDGE, MAX_DIAG, MIN_AREA, AVG_AREA, MAX_AREA] {
            for level in 0..=MAX_LEVEL {
                let v = metric.value(level);
                assert_eq!(metric.min_level(v), level);
                assert_eq!(metric.max_level(v), level);
                assert_eq!(metric.closest_level(v), level);
            }
        }
    }

    #[test]
    fn test_level_bounds() {
        // Halfway between levels 10 and 11 on a length metric.
        let v = MIN_WIDTH.value(10) * 0.75;
        assert_eq!(MIN_WIDTH.min_level(v), 11);
        assert_eq!(MIN_WIDTH.max_level(v), 10);
        assert_eq!(MIN_WIDTH.min_level(0.0), MAX_LEVEL);
        assert_eq!(MIN_WIDTH.min_level(100.0), 0);
        assert_eq!(MIN_WIDTH.max_level(1e-300), MAX_LEVEL);
    }

    #[test]
    fn test_avg_area_sums_to_sphere() {
        assert!((AVG_AREA.value(0) * 6.0 - 4.0 * PI).abs() < 1e-14);
        assert!((AVG_AREA.value(1) * 24.0 - 4.0 * PI).abs() < 1e-14);
        assert!(MIN_AREA.value(5) < AVG_AREA.value(5));
        assert!(AVG_AREA.value(5) < MAX_AREA.value(5));
    }
}
