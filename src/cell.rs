//! Cell geometry
//!
//! A [`Cell`] is the geometric view of a [`CellId`]: it caches the face,
//! level, Hilbert orientation and face-coordinate bounds, and derives
//! vertices, edge normals, centre, area and bounding shapes from them.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::fmt;

use crate::cellid::{CellId, MAX_LEVEL, POS_TO_IJ, POS_TO_ORIENTATION};
use crate::error::{CellError, Result};
use crate::geometry::{self, LatLng, Point, R1Interval, S1Interval, DBL_EPSILON};
use crate::metric::AVG_AREA;
use crate::projection;
use crate::region::{Cap, Rect};

/// Rounding allowance applied to latitude/longitude bounds
const MAX_ERROR: f64 = 2.0 * DBL_EPSILON;

/// Minimum latitude of the polar faces (the latitude of a cube corner)
fn pole_min_lat() -> f64 {
    (1.0f64 / 3.0).sqrt().asin() - MAX_ERROR
}

/// Geometric view of a valid cell identifier
///
/// Cells are cheap to build and never mutated. Vertices are numbered
/// counter-clockwise starting from the `(u_lo, v_lo)` corner; edge `k` runs
/// from vertex `k` to vertex `k + 1`.
///
/// # Example
///
/// ```
/// use rust_s2_cells::{Cell, CellId, LatLng};
///
/// let id = CellId::from_lat_lng(LatLng::from_degrees(0.0, 0.0)).parent_at(15).unwrap();
/// let cell = Cell::new(id).unwrap();
///
/// assert_eq!(cell.level(), 15);
/// assert!(cell.contains_point(id.to_point()));
/// assert!(cell.cap_bound().contains_point(cell.vertex(2)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    id: CellId,
    face: u8,
    level: u8,
    orientation: u8,
    uv: [R1Interval; 2],
}

impl Cell {
    /// Build the cell for `id`
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MalformedCellId`] if `id` is not a valid cell.
    pub fn new(id: CellId) -> Result<Cell> {
        if !id.is_valid() {
            return Err(CellError::MalformedCellId(id.0));
        }
        Ok(Cell::from_valid(id))
    }

    /// Leaf cell containing `p`
    pub fn from_point(p: Point) -> Cell {
        Cell::from_valid(CellId::from_point(p))
    }

    /// Leaf cell containing `ll`
    pub fn from_lat_lng(ll: LatLng) -> Cell {
        Cell::from_valid(CellId::from_lat_lng(ll))
    }

    /// Level-0 cell covering `face`
    pub fn from_face(face: u8) -> Result<Cell> {
        CellId::from_face(face).and_then(Cell::new)
    }

    /// Cell for an identifier already known to be valid
    pub(crate) fn from_valid(id: CellId) -> Cell {
        let (face, i, j, orientation) = id.to_face_ij_orientation();
        let level = id.level();
        let size = CellId::size_ij(level);
        let bound = |ij: i32| {
            let lo = ij & -size;
            R1Interval::new(
                projection::st_to_uv(projection::ij_to_st_min(lo)),
                projection::st_to_uv(projection::ij_to_st_min(lo + size)),
            )
        };
        Cell {
            id,
            face,
            level,
            orientation,
            uv: [bound(i), bound(j)],
        }
    }

    #[inline]
    pub fn id(&self) -> CellId {
        self.id
    }

    #[inline]
    pub fn face(&self) -> u8 {
        self.face
    }

    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Swap and invert bits of the Hilbert curve inside this cell
    #[inline]
    pub fn orientation(&self) -> u8 {
        self.orientation
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.level == MAX_LEVEL
    }

    /// Bounds of the cell in face coordinates, `[u, v]`
    #[inline]
    pub fn bound_uv(&self) -> [R1Interval; 2] {
        self.uv
    }

    /// Unit-length vertex `k` (taken modulo 4)
    pub fn vertex(&self, k: usize) -> Point {
        self.vertex_raw(k).normalize()
    }

    /// Vertex `k` on the cube surface; not unit length
    pub fn vertex_raw(&self, k: usize) -> Point {
        let k = k & 3;
        projection::face_uv_to_xyz(
            self.face,
            self.uv[0].bound((k >> 1) ^ (k & 1)),
            self.uv[1].bound(k >> 1),
        )
    }

    pub fn vertices(&self) -> [Point; 4] {
        [self.vertex(0), self.vertex(1), self.vertex(2), self.vertex(3)]
    }

    /// Unit-length inward normal of edge `k` (taken modulo 4)
    pub fn edge(&self, k: usize) -> Point {
        self.edge_raw(k).normalize()
    }

    /// Inward normal of the great circle through edge `k`; not unit length
    pub fn edge_raw(&self, k: usize) -> Point {
        match k & 3 {
            0 => projection::v_norm(self.face, self.uv[1].lo),
            1 => projection::u_norm(self.face, self.uv[0].hi),
            2 => -projection::v_norm(self.face, self.uv[1].hi),
            _ => -projection::u_norm(self.face, self.uv[0].lo),
        }
    }

    pub fn edges(&self) -> [Point; 4] {
        [self.edge(0), self.edge(1), self.edge(2), self.edge(3)]
    }

    /// Unit-length centre of the cell in cell-space
    ///
    /// Not the centroid; this is the image of the `(s, t)` midpoint.
    pub fn center(&self) -> Point {
        self.center_raw().normalize()
    }

    pub fn center_raw(&self) -> Point {
        self.id.to_point_raw()
    }

    /// Face coordinates of the cell centre
    pub fn center_uv(&self) -> (f64, f64) {
        let (_, si, ti) = self.id.center_siti();
        (
            projection::st_to_uv(projection::siti_to_st(si)),
            projection::st_to_uv(projection::siti_to_st(ti)),
        )
    }

    /// The four children in Hilbert traversal order, or `None` for a leaf
    pub fn subdivide(&self) -> Option<[Cell; 4]> {
        if self.is_leaf() {
            return None;
        }
        let (u_mid, v_mid) = self.center_uv();
        let mut id = self.id.child_begin();
        let mut children = [*self; 4];
        for (pos, child) in children.iter_mut().enumerate() {
            let ij = POS_TO_IJ[self.orientation as usize][pos];
            let i = ij >> 1;
            let j = ij & 1;

            let mut u = [self.uv[0].lo, self.uv[0].hi];
            let mut v = [self.uv[1].lo, self.uv[1].hi];
            u[1 - i] = u_mid;
            v[1 - j] = v_mid;

            *child = Cell {
                id,
                face: self.face,
                level: self.level + 1,
                orientation: self.orientation ^ POS_TO_ORIENTATION[pos] as u8,
                uv: [R1Interval::new(u[0], u[1]), R1Interval::new(v[0], v[1])],
            };
            id = id.next();
        }
        Some(children)
    }

    /// Average area of cells at `level` in steradians
    pub fn average_area(level: u8) -> f64 {
        AVG_AREA.value(level)
    }

    /// Area of the spherical quadrilateral through the four vertices
    pub fn exact_area(&self) -> f64 {
        let [v0, v1, v2, v3] = self.vertices();
        geometry::area(v0, v1, v2) + geometry::area(v0, v2, v3)
    }

    /// Fast area estimate, accurate to about 3% at level 2 and below
    pub fn approx_area(&self) -> f64 {
        if self.level < 2 {
            return Cell::average_area(self.level);
        }
        let [v0, v1, v2, v3] = self.vertices();
        let flat = 0.5 * (v2 - v0).cross(v3 - v1).norm();
        // Scale the planar area up to the spherical one, treating the cell
        // as a cap of the same flat area.
        flat * 2.0 / (1.0 + (1.0 - (flat / PI).min(1.0)).sqrt())
    }

    /// Latitude/longitude rectangle containing the cell
    pub fn rect_bound(&self) -> Rect {
        if self.level > 0 {
            // The extreme latitudes are at opposite corners; which ones
            // depends on the signs of the uv midpoints and the face axes.
            let u = self.uv[0].lo + self.uv[0].hi;
            let v = self.uv[1].lo + self.uv[1].hi;
            let i = if projection::u_axis(self.face).z() == 0.0 {
                (u < 0.0) as usize
            } else {
                (u > 0.0) as usize
            };
            let j = if projection::v_axis(self.face).z() == 0.0 {
                (v < 0.0) as usize
            } else {
                (v > 0.0) as usize
            };
            let lat = R1Interval::from_point_pair(self.latitude(i, j), self.latitude(1 - i, 1 - j));
            let lng = S1Interval::from_point_pair(self.longitude(i, 1 - j), self.longitude(1 - i, j));
            return Rect::new(lat, lng)
                .expanded(LatLng::from_radians(MAX_ERROR, MAX_ERROR))
                .polar_closure();
        }

        match self.face {
            0 => Rect::new(
                R1Interval::new(-FRAC_PI_4, FRAC_PI_4),
                S1Interval::new(-FRAC_PI_4, FRAC_PI_4),
            ),
            1 => Rect::new(
                R1Interval::new(-FRAC_PI_4, FRAC_PI_4),
                S1Interval::new(FRAC_PI_4, 3.0 * FRAC_PI_4),
            ),
            2 => Rect::new(R1Interval::new(pole_min_lat(), FRAC_PI_2), S1Interval::full()),
            3 => Rect::new(
                R1Interval::new(-FRAC_PI_4, FRAC_PI_4),
                S1Interval::new(3.0 * FRAC_PI_4, -3.0 * FRAC_PI_4),
            ),
            4 => Rect::new(
                R1Interval::new(-FRAC_PI_4, FRAC_PI_4),
                S1Interval::new(-3.0 * FRAC_PI_4, -FRAC_PI_4),
            ),
            _ => Rect::new(R1Interval::new(-FRAC_PI_2, -pole_min_lat()), S1Interval::full()),
        }
    }

    /// Cap containing the cell
    ///
    /// The tighter of a cap around the uv-centre through the four vertices
    /// and the cap bound of [`Cell::rect_bound`].
    pub fn cap_bound(&self) -> Cap {
        let center = projection::face_uv_to_xyz(self.face, self.uv[0].center(), self.uv[1].center())
            .normalize();
        let mut cap = Cap::from_point(center);
        for k in 0..4 {
            cap = cap.add_point(self.vertex(k));
        }
        let rect_cap = self.rect_bound().cap_bound();
        if rect_cap.height() < cap.height() {
            rect_cap
        } else {
            cap
        }
    }

    /// True if `p` lies in the cell, boundary included
    pub fn contains_point(&self, p: Point) -> bool {
        let Some((u, v)) = projection::face_xyz_to_uv(self.face, p) else {
            return false;
        };
        // Slack keeps Cell::from_point(p).contains_point(p) true despite
        // rounding in the uv/st conversions.
        let slack = 0.5 * DBL_EPSILON;
        self.uv[0].expanded(slack).contains(u) && self.uv[1].expanded(slack).contains(v)
    }

    /// True if `other` is this cell or one of its descendants
    pub fn contains_cell(&self, other: &Cell) -> bool {
        self.id.contains(other.id)
    }

    /// True if the two cells overlap; for cells this is exact
    pub fn may_intersect_cell(&self, other: &Cell) -> bool {
        self.id.intersects(other.id)
    }

    fn latitude(&self, i: usize, j: usize) -> f64 {
        let p = projection::face_uv_to_xyz(self.face, self.uv[0].bound(i), self.uv[1].bound(j));
        LatLng::from_point(p).lat
    }

    fn longitude(&self, i: usize, j: usize) -> f64 {
        let p = projection::face_uv_to_xyz(self.face, self.uv[0].bound(i), self.uv[1].bound(j));
        LatLng::from_point(p).lng
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.face,
            self.level,
            self.orientation,
            self.id.to_token()
        )
    }
}

impl TryFrom<CellId> for Cell {
    type Error = CellError;

    fn try_from(id: CellId) -> Result<Cell> {
        Cell::new(id)
    }
}
