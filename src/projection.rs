//! Sphere-to-cube projection
//!
//! Each point of the sphere is assigned to one of six cube faces by its
//! largest-magnitude coordinate, then expressed as face coordinates `(u, v)`
//! in `[-1, 1]²`. A quadratic warp maps `(u, v)` to cell-space coordinates
//! `(s, t)` in `[0, 1]²` so that cells at one level have near-uniform area,
//! and `(s, t)` is scaled onto the integer leaf grid `(i, j)` in `[0, 2^30)`.
//!
//! Face layout (`u` axis, `v` axis, face normal):
//!
//! | face | u  | v  | normal |
//! |------|----|----|--------|
//! | 0    | +y | +z | +x     |
//! | 1    | -x | +z | +y     |
//! | 2    | -x | -y | +z     |
//! | 3    | -z | -y | -x     |
//! | 4    | -z | +x | -y     |
//! | 5    | +y | +x | -z     |
//!
//! Every function here is pure and uses only `const` tables.

use crate::cellid::{MAX_LEVEL, MAX_SIZE};
use crate::geometry::Point;

/// Number of faces of the cube
pub const NUM_FACES: u8 = 6;

/// Scale of the doubled leaf grid used for cell centres (`2^31`)
pub const MAX_SITI: u64 = 1 << (MAX_LEVEL + 1);

const X_POS: Point = Point::new(1.0, 0.0, 0.0);
const X_NEG: Point = Point::new(-1.0, 0.0, 0.0);
const Y_POS: Point = Point::new(0.0, 1.0, 0.0);
const Y_NEG: Point = Point::new(0.0, -1.0, 0.0);
const Z_POS: Point = Point::new(0.0, 0.0, 1.0);
const Z_NEG: Point = Point::new(0.0, 0.0, -1.0);

/// `[u axis, v axis, normal]` for each face
const FACE_UVW_AXES: [[Point; 3]; 6] = [
    [Y_POS, Z_POS, X_POS],
    [X_NEG, Z_POS, Y_POS],
    [X_NEG, Y_NEG, Z_POS],
    [Z_NEG, Y_NEG, X_NEG],
    [Z_NEG, X_POS, Y_NEG],
    [Y_POS, X_POS, Z_NEG],
];

/// Warp a cell-space coordinate `s ∈ [0, 1]` to a face coordinate `u ∈ [-1, 1]`
///
/// # Example
///
/// ```
/// use rust_s2_cells::projection::{st_to_uv, uv_to_st};
///
/// assert_eq!(st_to_uv(0.5), 0.0);
/// assert_eq!(st_to_uv(1.0), 1.0);
/// assert!((uv_to_st(st_to_uv(0.3)) - 0.3).abs() < 1e-15);
/// ```
#[inline]
pub fn st_to_uv(s: f64) -> f64 {
    if s >= 0.5 {
        (1.0 / 3.0) * (4.0 * s * s - 1.0)
    } else {
        (1.0 / 3.0) * (1.0 - 4.0 * (1.0 - s) * (1.0 - s))
    }
}

/// Inverse of [`st_to_uv`]
#[inline]
pub fn uv_to_st(u: f64) -> f64 {
    if u >= 0.0 {
        0.5 * (1.0 + 3.0 * u).sqrt()
    } else {
        1.0 - 0.5 * (1.0 - 3.0 * u).sqrt()
    }
}

/// Leaf-grid coordinate containing cell-space coordinate `s`, clamped to `[0, 2^30 - 1]`
#[inline]
pub fn st_to_ij(s: f64) -> i32 {
    let ij = (MAX_SIZE as f64 * s).floor();
    ij.clamp(0.0, (MAX_SIZE - 1) as f64) as i32
}

/// Cell-space coordinate of the low edge of leaf-grid column `i`
#[inline]
pub fn ij_to_st_min(i: i32) -> f64 {
    (1.0 / MAX_SIZE as f64) * i as f64
}

/// Cell-space coordinate for a doubled leaf-grid coordinate in `[0, 2^31]`
#[inline]
pub fn siti_to_st(si: u64) -> f64 {
    (1.0 / MAX_SITI as f64) * si as f64
}

/// Face coordinate of the low edge of the cell of size `cell_size` containing column `ij`
#[inline]
pub fn ij_to_uv(ij: i32, cell_size: i32) -> f64 {
    st_to_uv(ij_to_st_min(ij & -cell_size))
}

/// Point on the cube surface for face coordinates; not unit length
pub fn face_uv_to_xyz(face: u8, u: f64, v: f64) -> Point {
    match face {
        0 => Point::new(1.0, u, v),
        1 => Point::new(-u, 1.0, v),
        2 => Point::new(-u, -v, 1.0),
        3 => Point::new(-1.0, -v, -u),
        4 => Point::new(v, -1.0, -u),
        _ => Point::new(v, u, -1.0),
    }
}

/// Face coordinates of `p` on `face`, assuming `p` projects onto that face
pub fn valid_face_xyz_to_uv(face: u8, p: Point) -> (f64, f64) {
    match face {
        0 => (p.y() / p.x(), p.z() / p.x()),
        1 => (-p.x() / p.y(), p.z() / p.y()),
        2 => (-p.x() / p.z(), -p.y() / p.z()),
        3 => (p.z() / p.x(), p.y() / p.x()),
        4 => (p.z() / p.y(), -p.x() / p.y()),
        _ => (-p.y() / p.z(), -p.x() / p.z()),
    }
}

/// Face coordinates of `p` on `face`, or `None` if `p` is in the opposite hemisphere
pub fn face_xyz_to_uv(face: u8, p: Point) -> Option<(f64, f64)> {
    if face < 3 {
        if p.get(face as usize) <= 0.0 {
            return None;
        }
    } else if p.get(face as usize - 3) >= 0.0 {
        return None;
    }
    Some(valid_face_xyz_to_uv(face, p))
}

/// Face whose normal is most nearly aligned with `p`
pub fn xyz_to_face(p: Point) -> u8 {
    let axis = p.largest_abs_component();
    if p.get(axis) < 0.0 {
        axis as u8 + 3
    } else {
        axis as u8
    }
}

/// Face and face coordinates of `p`
pub fn xyz_to_face_uv(p: Point) -> (u8, f64, f64) {
    let face = xyz_to_face(p);
    let (u, v) = valid_face_xyz_to_uv(face, p);
    (face, u, v)
}

#[inline]
pub fn u_axis(face: u8) -> Point {
    FACE_UVW_AXES[face as usize][0]
}

#[inline]
pub fn v_axis(face: u8) -> Point {
    FACE_UVW_AXES[face as usize][1]
}

/// Outward unit normal of `face`
#[inline]
pub fn norm(face: u8) -> Point {
    FACE_UVW_AXES[face as usize][2]
}

/// Normal of the plane through the origin containing the line `u = const` on `face`
///
/// Not unit length. This is the right-hand normal of the edge running in the
/// `+v` direction, so it points toward decreasing `u`.
pub fn u_norm(face: u8, u: f64) -> Point {
    match face {
        0 => Point::new(u, -1.0, 0.0),
        1 => Point::new(1.0, u, 0.0),
        2 => Point::new(1.0, 0.0, u),
        3 => Point::new(-u, 0.0, 1.0),
        4 => Point::new(0.0, -u, 1.0),
        _ => Point::new(0.0, -1.0, -u),
    }
}

/// Normal of the plane through the origin containing the line `v = const` on `face`
///
/// Not unit length. This is the right-hand normal of the edge running in the
/// `-u` direction, so it points toward increasing `v`.
pub fn v_norm(face: u8, v: f64) -> Point {
    match face {
        0 => Point::new(-v, 0.0, 1.0),
        1 => Point::new(0.0, -v, 1.0),
        2 => Point::new(0.0, -1.0, -v),
        3 => Point::new(v, -1.0, 0.0),
        4 => Point::new(1.0, v, 0.0),
        _ => Point::new(1.0, 0.0, v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warp_inverse() {
        for k in 0..=64 {
            let s = k as f64 / 64.0;
            let u = st_to_uv(s);
            assert!((-1.0..=1.0).contains(&u));
            assert!((uv_to_st(u) - s).abs() < 1e-15);
        }
        assert_eq!(st_to_uv(0.0), -1.0);
        assert_eq!(uv_to_st(-1.0), 0.0);
        assert_eq!(uv_to_st(1.0), 1.0);
    }

    #[test]
    fn test_warp_monotonic() {
        let mut last = -2.0;
        for k in 0..=1000 {
            let u = st_to_uv(k as f64 / 1000.0);
            assert!(u > last);
            last = u;
        }
    }

    #[test]
    fn test_st_to_ij_clamps() {
        assert_eq!(st_to_ij(-0.5), 0);
        assert_eq!(st_to_ij(0.0), 0);
        assert_eq!(st_to_ij(0.5), MAX_SIZE / 2);
        assert_eq!(st_to_ij(1.0), MAX_SIZE - 1);
        assert_eq!(st_to_ij(2.0), MAX_SIZE - 1);
        assert_eq!(ij_to_st_min(MAX_SIZE / 2), 0.5);
    }

    #[test]
    fn test_face_round_trip() {
        for face in 0..NUM_FACES {
            let p = face_uv_to_xyz(face, 0.25, -0.75);
            assert_eq!(xyz_to_face(p), face);
            let (f, u, v) = xyz_to_face_uv(p);
            assert_eq!(f, face);
            assert!((u - 0.25).abs() < 1e-15);
            assert!((v + 0.75).abs() < 1e-15);
            assert!(face_xyz_to_uv(face, p).is_some());
            assert!(face_xyz_to_uv((face + 3) % 6, p).is_none());
        }
    }

    #[test]
    fn test_face_axes() {
        for face in 0..NUM_FACES {
            assert_eq!(face_uv_to_xyz(face, 0.0, 0.0), norm(face));
            assert_eq!(face_uv_to_xyz(face, 1.0, 0.0) - norm(face), u_axis(face));
            assert_eq!(face_uv_to_xyz(face, 0.0, 1.0) - norm(face), v_axis(face));
            // The right-handed frame (u, v, n) holds on every face.
            assert_eq!(u_axis(face).cross(v_axis(face)), norm(face));
        }
    }

    #[test]
    fn test_uv_norms() {
        for face in 0..NUM_FACES {
            for x in [-1.0, -0.5, 0.0, 0.5, 1.0] {
                // The line u = x lies in the plane of u_norm.
                let n = u_norm(face, x);
                assert_eq!(n.dot(face_uv_to_xyz(face, x, 0.3)), 0.0);
                assert!(n.dot(face_uv_to_xyz(face, x + 0.1, 0.3)) < 0.0);

                let m = v_norm(face, x);
                assert_eq!(m.dot(face_uv_to_xyz(face, 0.3, x)), 0.0);
                assert!(m.dot(face_uv_to_xyz(face, 0.3, x + 0.1)) > 0.0);
            }
        }
    }
}
