//! Neighbor queries
//!
//! Neighbors are found by stepping in leaf-grid `(i, j)` space and mapping
//! back to identifiers. Steps that leave the face are re-projected through
//! the sphere onto whichever face they land on, so neighbors across a cube
//! edge come out in that face's own orientation.

use std::collections::HashSet;

use super::{CellId, MAX_LEVEL, MAX_SIZE};
use crate::error::{CellError, Result};
use crate::geometry::DBL_EPSILON;
use crate::projection;

impl CellId {
    /// The four same-level cells sharing an edge with this one
    ///
    /// Returned in the order bottom (`-j`), right (`+i`), top (`+j`),
    /// left (`-i`) in this face's grid. The four are always distinct.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_s2_cells::CellId;
    ///
    /// let faces: Vec<u8> = CellId::from_face(0)
    ///     .unwrap()
    ///     .edge_neighbors()
    ///     .iter()
    ///     .map(|n| n.face())
    ///     .collect();
    /// assert_eq!(faces, vec![5, 1, 2, 4]);
    /// ```
    pub fn edge_neighbors(&self) -> [CellId; 4] {
        let level = self.level();
        let size = CellId::size_ij(level) as i64;
        let (face, i, j, _) = self.to_face_ij_orientation();
        let (i, j) = (i as i64, j as i64);
        let max = MAX_SIZE as i64;

        [
            from_face_ij_same(face, i, j - size, j - size >= 0).parent_unchecked(level),
            from_face_ij_same(face, i + size, j, i + size < max).parent_unchecked(level),
            from_face_ij_same(face, i, j + size, j + size < max).parent_unchecked(level),
            from_face_ij_same(face, i - size, j, i - size >= 0).parent_unchecked(level),
        ]
    }

    /// Cells at `level` that touch the vertex of the `level` ancestor nearest this cell
    ///
    /// The ancestor itself is first. Most vertices are shared by four cells;
    /// the eight cube corners are shared by only three. At the cell's own
    /// level the vertex is picked by the quadrant of the leaf the identifier
    /// decodes to; a leaf cell picks its `(i_lo, j_lo)` corner.
    ///
    /// # Errors
    ///
    /// Returns `MalformedCellId` for an invalid identifier and `InvalidLevel`
    /// if `level` is finer than this cell
    pub fn vertex_neighbors(&self, level: u8) -> Result<Vec<CellId>> {
        self.check_valid()?;
        if level > self.level() {
            return Err(CellError::InvalidLevel {
                level: level as i32,
                reason: "vertex neighbor level is finer than the cell level",
            });
        }
        let (face, i, j, _) = self.to_face_ij_orientation();
        let (i, j) = (i as i64, j as i64);
        let max = MAX_SIZE as i64;

        let size = CellId::size_ij(level) as i64;
        // Zero for a leaf, selecting its low corner
        let halfsize = size >> 1;
        let (ioffset, isame) = if i & halfsize != 0 {
            (size, i + size < max)
        } else {
            (-size, i - size >= 0)
        };
        let (joffset, jsame) = if j & halfsize != 0 {
            (size, j + size < max)
        } else {
            (-size, j - size >= 0)
        };

        let mut out = Vec::with_capacity(4);
        out.push(self.parent_unchecked(level));
        out.push(from_face_ij_same(face, i + ioffset, j, isame).parent_unchecked(level));
        out.push(from_face_ij_same(face, i, j + joffset, jsame).parent_unchecked(level));
        // Both offsets leaving the face means this vertex is a cube corner.
        if isame || jsame {
            out.push(
                from_face_ij_same(face, i + ioffset, j + joffset, isame && jsame)
                    .parent_unchecked(level),
            );
        }
        Ok(out)
    }

    /// Every cell at `nbr_level` that touches this cell along an edge or at a corner
    ///
    /// Cells are returned without duplicates in sweep order.
    ///
    /// # Errors
    ///
    /// Returns `MalformedCellId` for an invalid identifier and `InvalidLevel`
    /// unless `self.level() <= nbr_level <= 30`
    pub fn all_neighbors(&self, nbr_level: u8) -> Result<Vec<CellId>> {
        self.check_valid()?;
        if nbr_level < self.level() || nbr_level > MAX_LEVEL {
            return Err(CellError::InvalidLevel {
                level: nbr_level as i32,
                reason: "neighbor level must be in [cell level, 30]",
            });
        }
        let (face, i, j, _) = self.to_face_ij_orientation();
        let max = MAX_SIZE as i64;

        // Anchor at the lower-left leaf so finer neighbor levels line up.
        let size = CellId::size_ij(self.level()) as i64;
        let i = i as i64 & -size;
        let j = j as i64 & -size;
        let nbr_size = CellId::size_ij(nbr_level) as i64;

        let mut out = Vec::new();
        let mut k = -nbr_size;
        loop {
            let same_face = if k < 0 {
                j + k >= 0
            } else if k >= size {
                j + k < max
            } else {
                out.push(from_face_ij_same(face, i + k, j - nbr_size, j - size >= 0));
                out.push(from_face_ij_same(face, i + k, j + size, j + size < max));
                true
            };
            out.push(from_face_ij_same(face, i - nbr_size, j + k, same_face && i - size >= 0));
            out.push(from_face_ij_same(face, i + size, j + k, same_face && i + size < max));
            if k >= size {
                break;
            }
            k += nbr_size;
        }

        let mut seen = HashSet::with_capacity(out.len());
        Ok(out
            .into_iter()
            .map(|id| id.parent_unchecked(nbr_level))
            .filter(|id| seen.insert(*id))
            .collect())
    }
}

fn from_face_ij_same(face: u8, i: i64, j: i64, same_face: bool) -> CellId {
    if same_face {
        CellId::from_face_ij(face, i as i32, j as i32)
    } else {
        from_face_ij_wrap(face, i, j)
    }
}

/// Leaf cell for grid coordinates that may lie just outside `face`
///
/// The coordinates are clamped to one leaf beyond the face, lifted to the
/// sphere and projected onto the face they fall on. The re-projection uses
/// the linear `u -> s` map, which is exact enough to land in the right leaf.
fn from_face_ij_wrap(face: u8, i: i64, j: i64) -> CellId {
    let max = MAX_SIZE as i64;
    let i = i.clamp(-1, max);
    let j = j.clamp(-1, max);

    let scale = 1.0 / MAX_SIZE as f64;
    let limit = 1.0 + DBL_EPSILON;
    let u = (scale * (2 * (i - max / 2) + 1) as f64).clamp(-limit, limit);
    let v = (scale * (2 * (j - max / 2) + 1) as f64).clamp(-limit, limit);

    let (face, u, v) = projection::xyz_to_face_uv(projection::face_uv_to_xyz(face, u, v));
    CellId::from_face_ij(
        face,
        projection::st_to_ij(0.5 * (u + 1.0)),
        projection::st_to_ij(0.5 * (v + 1.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    const ORIGIN_L15: CellId = CellId(0x1000_0000_4000_0000);

    fn tokens(ids: &[CellId]) -> Vec<String> {
        ids.iter().map(|id| id.to_token()).collect()
    }

    #[test]
    fn test_face_edge_neighbors() {
        let expected: [[u8; 4]; 6] = [
            [5, 1, 2, 4],
            [5, 3, 2, 0],
            [1, 3, 4, 0],
            [1, 5, 4, 2],
            [3, 5, 0, 2],
            [3, 1, 0, 4],
        ];
        for face in 0..6u8 {
            let nbrs = CellId::from_face(face).unwrap().edge_neighbors();
            for (n, want) in nbrs.iter().zip(expected[face as usize]) {
                assert!(n.is_face());
                assert_eq!(n.face(), want);
            }
        }
    }

    #[test]
    fn test_edge_neighbors_fixture() {
        let nbrs = ORIGIN_L15.edge_neighbors();
        assert_eq!(
            tokens(&nbrs),
            vec!["1aaaaaaac", "10000000c", "10000001c", "0fffffffc"]
        );
        for n in nbrs {
            assert_eq!(n.level(), 15);
            assert!(n.edge_neighbors().contains(&ORIGIN_L15));
        }
    }

    #[test]
    fn test_vertex_neighbors_interior() {
        let leaf = CellId::from_point(Point::new(0.0, 0.0, 1.0));
        let mut nbrs = leaf.vertex_neighbors(5).unwrap();
        nbrs.sort();
        let expected = [
            0x4554_0000_0000_0000u64,
            0x4ffc_0000_0000_0000,
            0x5004_0000_0000_0000,
            0x5aac_0000_0000_0000,
        ];
        assert_eq!(nbrs.iter().map(|n| n.0).collect::<Vec<_>>(), expected);

        let mid = ORIGIN_L15.vertex_neighbors(14).unwrap();
        assert_eq!(tokens(&mid), vec!["10000001", "0fffffff", "1aaaaaab", "05555555"]);
    }

    #[test]
    fn test_vertex_neighbors_cube_corner() {
        // The first leaf of face 0 touches the corner shared by faces 0, 4 and 5.
        let nbrs = CellId(1).vertex_neighbors(0).unwrap();
        assert_eq!(
            nbrs.iter().map(|n| n.0).collect::<Vec<_>>(),
            vec![0x1000_0000_0000_0000, 0x9000_0000_0000_0000, 0xb000_0000_0000_0000]
        );
    }

    #[test]
    fn test_vertex_neighbors_level_check() {
        assert!(matches!(
            ORIGIN_L15.vertex_neighbors(16),
            Err(CellError::InvalidLevel { level: 16, .. })
        ));
        assert!(matches!(
            CellId::none().vertex_neighbors(0),
            Err(CellError::MalformedCellId(0))
        ));
    }

    #[test]
    fn test_vertex_neighbors_same_level() {
        let nbrs = ORIGIN_L15.vertex_neighbors(15).unwrap();
        assert_eq!(nbrs.len(), 4);
        assert_eq!(nbrs[0], ORIGIN_L15);
        let around = ORIGIN_L15.all_neighbors(15).unwrap();
        for n in &nbrs[1..] {
            assert_eq!(n.level(), 15);
            assert!(around.contains(n));
        }
        let mut unique = nbrs.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_vertex_neighbors_same_level_cube_corner() {
        // Face 0 decodes to a leaf in its (+i, +j) quadrant, so the corner
        // shared with faces 1 and 2 is chosen.
        let nbrs = CellId::from_face(0).unwrap().vertex_neighbors(0).unwrap();
        assert_eq!(
            nbrs.iter().map(|n| n.0).collect::<Vec<_>>(),
            vec![0x1000_0000_0000_0000, 0x3000_0000_0000_0000, 0x5000_0000_0000_0000]
        );

        // The first leaf of face 0 sits on the corner shared with faces 4 and 5.
        let nbrs = CellId(1).vertex_neighbors(MAX_LEVEL).unwrap();
        assert_eq!(nbrs[0], CellId(1));
        assert_eq!(nbrs.iter().map(|n| n.face()).collect::<Vec<_>>(), vec![0, 4, 5]);
        assert!(nbrs.iter().all(|n| n.is_leaf()));
    }

    #[test]
    fn test_malformed_ids_rejected() {
        let odd_sentinel = CellId(0x1000_0000_0000_0002);
        for id in [CellId::none(), CellId::sentinel(), odd_sentinel] {
            assert_eq!(id.all_neighbors(10), Err(CellError::MalformedCellId(id.0)));
            assert_eq!(id.vertex_neighbors(0), Err(CellError::MalformedCellId(id.0)));
        }
    }

    #[test]
    fn test_all_neighbors_same_level() {
        let nbrs = ORIGIN_L15.all_neighbors(15).unwrap();
        assert_eq!(nbrs.len(), 8);
        for edge in ORIGIN_L15.edge_neighbors() {
            assert!(nbrs.contains(&edge));
        }
        assert!(!nbrs.contains(&ORIGIN_L15));
    }

    #[test]
    fn test_all_neighbors_finer_level() {
        let nbrs = ORIGIN_L15.all_neighbors(16).unwrap();
        assert_eq!(nbrs.len(), 12);
        assert!(nbrs.iter().all(|n| n.level() == 16 && !ORIGIN_L15.contains(*n)));

        let face_nbrs = CellId::from_face(0).unwrap().all_neighbors(0).unwrap();
        let mut faces: Vec<u8> = face_nbrs.iter().map(|n| n.face()).collect();
        faces.sort();
        assert_eq!(faces, vec![1, 2, 4, 5]);

        assert_eq!(CellId::from_face(0).unwrap().all_neighbors(2).unwrap().len(), 16);
        assert!(ORIGIN_L15.all_neighbors(14).is_err());
        assert!(ORIGIN_L15.all_neighbors(31).is_err());
    }

    #[test]
    fn test_wrap_lands_on_adjacent_face() {
        let id = from_face_ij_wrap(0, -1, 100);
        assert_eq!(id.face(), 4);
        let id = from_face_ij_wrap(0, MAX_SIZE as i64, 100);
        assert_eq!(id.face(), 1);
    }
}
