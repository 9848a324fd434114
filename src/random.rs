//! Seeded sampling helpers
//!
//! Deterministic random points, cells and caps for tests, benchmarks and
//! demos. All helpers take any [`Rng`]; use [`seeded_rng`] for a
//! reproducible stream.
//!
//! # Example
//!
//! ```rust
//! use rust_s2_cells::random::{random_cell_id, random_point, seeded_rng};
//!
//! let mut rng = seeded_rng(42);
//! let p = random_point(&mut rng);
//! assert!((p.norm() - 1.0).abs() < 1e-15);
//!
//! let id = random_cell_id(&mut rng, 12).unwrap();
//! assert_eq!(id.level(), 12);
//! ```

use std::f64::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cellid::{CellId, POS_BITS};
use crate::error::Result;
use crate::geometry::Point;
use crate::projection::NUM_FACES;
use crate::region::Cap;

/// ChaCha8 generator seeded from `seed`
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Point uniformly distributed over the unit sphere
pub fn random_point<R: Rng + ?Sized>(rng: &mut R) -> Point {
    // Uniform z with uniform azimuth is uniform by area (Archimedes).
    let z: f64 = rng.gen_range(-1.0..=1.0);
    let theta: f64 = rng.gen_range(0.0..2.0 * PI);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Point::new(r * theta.cos(), r * theta.sin(), z)
}

/// Cell at `level` chosen uniformly over Hilbert positions
///
/// # Errors
///
/// Returns `InvalidLevel` if level > 30
pub fn random_cell_id<R: Rng + ?Sized>(rng: &mut R, level: u8) -> Result<CellId> {
    let face = rng.gen_range(0..NUM_FACES);
    let pos = rng.gen::<u64>() & ((1u64 << POS_BITS) - 1);
    CellId::from_face_pos_level(face, pos, level)
}

/// Cap around a random axis whose area is log-uniform in `[min_area, max_area]`
pub fn random_cap<R: Rng + ?Sized>(rng: &mut R, min_area: f64, max_area: f64) -> Cap {
    let t: f64 = rng.gen();
    let area = max_area * (min_area / max_area).powf(t);
    Cap::from_axis_area(random_point(rng), area)
}

/// Point uniformly distributed inside `cap`
///
/// Samples stay strictly inside the boundary so rounding never pushes them
/// out of the cap.
pub fn random_point_in_cap<R: Rng + ?Sized>(rng: &mut R, cap: &Cap) -> Point {
    let axis = cap.axis();
    let x = axis.ortho();
    let y = axis.cross(x);
    let h = rng.gen_range(0.0..=0.999 * cap.height().clamp(0.0, 2.0));
    let phi: f64 = rng.gen_range(0.0..2.0 * PI);
    let r = (h * (2.0 - h)).max(0.0).sqrt();
    (axis * (1.0 - h) + (x * phi.cos() + y * phi.sin()) * r).normalize()
}
