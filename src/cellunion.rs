//! Cell unions
//!
//! A [`CellUnion`] is a sorted list of cell identifiers describing a region
//! as a set of cells. Once normalized the list is the canonical
//! representation of that region: no cell contains another, and no four
//! siblings appear together (they are replaced by their parent).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::cellid::{CellId, MAX_LEVEL};
use crate::error::{CellError, Result};
use crate::geometry::Point;
use crate::region::{Cap, Rect};

/// A set of cells kept as a sorted list of identifiers
///
/// # Example
///
/// ```
/// use rust_s2_cells::{CellId, CellUnion};
///
/// let parent = CellId::from_face(1).unwrap().child(2).unwrap();
/// let union = CellUnion::from_cell_ids(parent.children().unwrap()).unwrap();
///
/// // Four siblings collapse into their parent.
/// assert_eq!(union.cell_ids(), &[parent]);
/// assert!(union.contains_cell_id(parent.child(3).unwrap()));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct CellUnion {
    cell_ids: Vec<CellId>,
}

impl CellUnion {
    /// Normalized union of `ids`
    ///
    /// # Errors
    ///
    /// Returns [`CellError::MalformedCellId`] for the first invalid identifier.
    pub fn from_cell_ids<I>(ids: I) -> Result<CellUnion>
    where
        I: IntoIterator<Item = CellId>,
    {
        let mut union = CellUnion::from_verbatim(ids)?;
        union.normalize();
        Ok(union)
    }

    /// Union holding `ids` exactly as given, without sorting or merging
    ///
    /// Most queries assume at least [`CellUnion::is_valid`]; call
    /// [`CellUnion::normalize`] before using one built from arbitrary input.
    pub fn from_verbatim<I>(ids: I) -> Result<CellUnion>
    where
        I: IntoIterator<Item = CellId>,
    {
        let cell_ids: Vec<CellId> = ids.into_iter().collect();
        if let Some(bad) = cell_ids.iter().find(|id| !id.is_valid()) {
            return Err(CellError::MalformedCellId(bad.0));
        }
        Ok(CellUnion { cell_ids })
    }

    /// Union from identifiers the caller already knows to be normalized
    pub fn from_normalized<I>(ids: I) -> Result<CellUnion>
    where
        I: IntoIterator<Item = CellId>,
    {
        let union = CellUnion::from_verbatim(ids)?;
        debug_assert!(union.is_normalized());
        Ok(union)
    }

    /// Union over identifiers already known to be valid, kept as given
    pub(crate) fn from_valid(cell_ids: Vec<CellId>) -> CellUnion {
        CellUnion { cell_ids }
    }

    /// The six face cells
    pub fn whole_sphere() -> CellUnion {
        CellUnion {
            cell_ids: (0..6).filter_map(|face| CellId::from_face(face).ok()).collect(),
        }
    }

    #[inline]
    pub fn cell_ids(&self) -> &[CellId] {
        &self.cell_ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cell_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cell_ids.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CellId> {
        self.cell_ids.iter()
    }

    pub fn into_cell_ids(self) -> Vec<CellId> {
        self.cell_ids
    }

    /// Sort, drop cells contained in others, and merge complete sibling sets
    ///
    /// Returns true if the list changed.
    pub fn normalize(&mut self) -> bool {
        let mut ids = std::mem::take(&mut self.cell_ids);
        let was_sorted = ids.windows(2).all(|w| w[0] <= w[1]);
        ids.sort_unstable();
        let mut output: Vec<CellId> = Vec::with_capacity(ids.len());

        for mut id in ids.iter().copied() {
            if output.last().is_some_and(|last| last.contains(id)) {
                continue;
            }
            while output.last().is_some_and(|last| id.contains(*last)) {
                output.pop();
            }
            // Absorb runs of three preceding siblings, cascading upward.
            while output.len() >= 3 {
                let n = output.len();
                if !are_siblings(output[n - 3], output[n - 2], output[n - 1], id) {
                    break;
                }
                id = id.parent_unchecked(id.level() - 1);
                output.truncate(n - 3);
            }
            output.push(id);
        }

        let changed = !was_sorted || output != ids;
        self.cell_ids = output;
        changed
    }

    /// True if sorted with no cell overlapping the next
    pub fn is_valid(&self) -> bool {
        self.cell_ids
            .windows(2)
            .all(|w| w[0].range_max() < w[1].range_min())
    }

    /// True if valid and no four siblings appear together
    pub fn is_normalized(&self) -> bool {
        self.is_valid()
            && !self
                .cell_ids
                .windows(4)
                .any(|w| are_siblings(w[0], w[1], w[2], w[3]))
    }

    /// Expand every cell so that levels satisfy `min_level` and `level_mod`
    ///
    /// Each cell is replaced by its descendants at the smallest level that is
    /// at least `min_level`, not coarser than the cell, and of the form
    /// `min_level + k * level_mod` (capped at the leaf level).
    pub fn denormalize(&self, min_level: u8, level_mod: u8) -> Vec<CellId> {
        let level_mod = level_mod.max(1);
        let mut output = Vec::with_capacity(self.cell_ids.len());
        for &id in &self.cell_ids {
            let level = id.level();
            let mut new_level = level.max(min_level);
            if level_mod > 1 {
                new_level += (MAX_LEVEL - (new_level - min_level)) % level_mod;
                new_level = new_level.min(MAX_LEVEL);
            }
            if new_level == level {
                output.push(id);
            } else {
                output.extend(id.children_at(new_level).into_iter().flatten());
            }
        }
        output
    }

    /// True if `id` lies inside one of the cells
    pub fn contains_cell_id(&self, id: CellId) -> bool {
        let i = self.cell_ids.partition_point(|c| *c < id);
        if i < self.cell_ids.len() && self.cell_ids[i].range_min() <= id {
            return true;
        }
        i > 0 && self.cell_ids[i - 1].range_max() >= id
    }

    /// True if `id` shares any leaf cell with the union
    pub fn intersects_cell_id(&self, id: CellId) -> bool {
        let i = self.cell_ids.partition_point(|c| *c < id);
        if i < self.cell_ids.len() && self.cell_ids[i].range_min() <= id.range_max() {
            return true;
        }
        i > 0 && self.cell_ids[i - 1].range_max() >= id.range_min()
    }

    /// True if every cell of `other` lies inside this union
    pub fn contains(&self, other: &CellUnion) -> bool {
        other.iter().all(|id| self.contains_cell_id(*id))
    }

    /// True if any cell of `other` intersects this union
    pub fn intersects(&self, other: &CellUnion) -> bool {
        other.iter().any(|id| self.intersects_cell_id(*id))
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.contains_cell_id(CellId::from_point(p))
    }

    pub fn contains_cell(&self, cell: &Cell) -> bool {
        self.contains_cell_id(cell.id())
    }

    /// Exact for unions: cells either share leaf cells or do not
    pub fn may_intersect_cell(&self, cell: &Cell) -> bool {
        self.intersects_cell_id(cell.id())
    }

    pub fn union(&self, other: &CellUnion) -> CellUnion {
        let mut cell_ids = Vec::with_capacity(self.len() + other.len());
        cell_ids.extend_from_slice(&self.cell_ids);
        cell_ids.extend_from_slice(&other.cell_ids);
        let mut union = CellUnion { cell_ids };
        union.normalize();
        union
    }

    /// Cells common to both unions
    ///
    /// Both inputs must be normalized; the output is normalized.
    pub fn intersection(&self, other: &CellUnion) -> CellUnion {
        let x = &self.cell_ids;
        let y = &other.cell_ids;
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < x.len() && j < y.len() {
            let imin = x[i].range_min();
            let jmin = y[j].range_min();
            if imin > jmin {
                // Either y[j] contains x[i] or they are disjoint.
                if x[i] <= y[j].range_max() {
                    out.push(x[i]);
                    i += 1;
                } else {
                    j = j + 1 + y[j + 1..].partition_point(|c| *c < imin);
                    if x[i] <= y[j - 1].range_max() {
                        j -= 1;
                    }
                }
            } else if jmin > imin {
                if y[j] <= x[i].range_max() {
                    out.push(y[j]);
                    j += 1;
                } else {
                    i = i + 1 + x[i + 1..].partition_point(|c| *c < jmin);
                    if y[j] <= x[i - 1].range_max() {
                        i -= 1;
                    }
                }
            } else if x[i] < y[j] {
                // Same range_min: the smaller identifier is the descendant.
                out.push(x[i]);
                i += 1;
            } else {
                out.push(y[j]);
                j += 1;
            }
        }

        // Sorted already; siblings may still need merging.
        let mut union = CellUnion { cell_ids: out };
        union.normalize();
        union
    }

    /// Cells of the union inside `id`, or `id` itself if the union contains it
    pub fn intersection_with_cell_id(&self, id: CellId) -> CellUnion {
        if self.contains_cell_id(id) {
            return CellUnion { cell_ids: vec![id] };
        }
        let start = self.cell_ids.partition_point(|c| *c < id.range_min());
        let id_max = id.range_max();
        let cell_ids = self.cell_ids[start..]
            .iter()
            .take_while(|c| **c <= id_max)
            .copied()
            .collect();
        CellUnion { cell_ids }
    }

    /// Cells of this union not covered by `other`
    pub fn difference(&self, other: &CellUnion) -> CellUnion {
        let mut out = Vec::new();
        for &id in &self.cell_ids {
            difference_into(id, other, &mut out);
        }
        CellUnion { cell_ids: out }
    }

    /// Number of leaf cells covered
    pub fn leaf_cells_covered(&self) -> u64 {
        self.cell_ids
            .iter()
            .map(|id| 1u64 << (2 * (MAX_LEVEL - id.level()) as u32))
            .sum()
    }

    /// Area from the leaf count and the average leaf area
    pub fn average_area(&self) -> f64 {
        Cell::average_area(MAX_LEVEL) * self.leaf_cells_covered() as f64
    }

    pub fn approx_area(&self) -> f64 {
        self.cells().map(|c| c.approx_area()).sum()
    }

    pub fn exact_area(&self) -> f64 {
        self.cells().map(|c| c.exact_area()).sum()
    }

    /// Cap around the area-weighted centroid containing every cell
    pub fn cap_bound(&self) -> Cap {
        if self.is_empty() {
            return Cap::empty();
        }
        let mut centroid = Point::new(0.0, 0.0, 0.0);
        for id in &self.cell_ids {
            centroid = centroid + id.to_point() * Cell::average_area(id.level());
        }
        let centroid = if centroid.norm2() == 0.0 {
            Point::new(1.0, 0.0, 0.0)
        } else {
            centroid.normalize()
        };

        self.cells()
            .fold(Cap::from_point(centroid), |cap, cell| cap.add_cap(&cell.cap_bound()))
    }

    pub fn rect_bound(&self) -> Rect {
        self.cells()
            .fold(Rect::empty(), |rect, cell| rect.union(&cell.rect_bound()))
    }

    fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cell_ids.iter().map(|id| Cell::from_valid(*id))
    }
}

/// True if the four cells are the children of one parent (in any order)
fn are_siblings(a: CellId, b: CellId, c: CellId, d: CellId) -> bool {
    // The XOR of four siblings cancels the child-position bits.
    if (a.0 ^ b.0 ^ c.0) != d.0 {
        return false;
    }
    let mut mask = d.lsb() << 1;
    mask = !(mask + (mask << 1));
    let id_masked = d.0 & mask;
    (a.0 & mask) == id_masked
        && (b.0 & mask) == id_masked
        && (c.0 & mask) == id_masked
        && !d.is_face()
}

fn difference_into(id: CellId, other: &CellUnion, out: &mut Vec<CellId>) {
    if !other.intersects_cell_id(id) {
        out.push(id);
    } else if !other.contains_cell_id(id) {
        // Partial overlap, so `id` is not a leaf.
        let mut child = id.child_begin();
        for _ in 0..4 {
            difference_into(child, other, out);
            child = child.next();
        }
    }
}

impl<'a> IntoIterator for &'a CellUnion {
    type Item = &'a CellId;
    type IntoIter = std::slice::Iter<'a, CellId>;

    fn into_iter(self) -> Self::IntoIter {
        self.cell_ids.iter()
    }
}

impl From<CellUnion> for Vec<CellId> {
    fn from(union: CellUnion) -> Self {
        union.cell_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LatLng;

    fn id_at(lat: f64, lng: f64, level: u8) -> CellId {
        CellId::from_lat_lng(LatLng::from_degrees(lat, lng)).parent_at(level).unwrap()
    }

    #[test]
    fn test_children_normalize_to_parent() {
        let parent = id_at(12.0, 34.0, 10);
        let union = CellUnion::from_cell_ids(parent.children().unwrap()).unwrap();
        assert_eq!(union.cell_ids(), &[parent]);
        assert!(union.is_normalized());
    }

    #[test]
    fn test_normalize_cascades() {
        // All 16 grandchildren collapse two levels.
        let parent = id_at(-40.0, 100.0, 7);
        let mut grandchildren: Vec<CellId> = parent.children_at(9).unwrap().collect();
        grandchildren.reverse();
        let union = CellUnion::from_cell_ids(grandchildren).unwrap();
        assert_eq!(union.cell_ids(), &[parent]);
    }

    #[test]
    fn test_normalize_drops_contained_and_duplicates() {
        let parent = id_at(1.0, 1.0, 5);
        let child = parent.child(2).unwrap();
        let other = id_at(50.0, -80.0, 3);
        let mut union = CellUnion::from_verbatim(vec![child, other, parent, child]).unwrap();
        assert!(!union.is_valid());
        assert!(union.normalize());
        let mut expected = vec![parent, other];
        expected.sort();
        assert_eq!(union.cell_ids(), expected.as_slice());
        assert!(!union.normalize());
    }

    #[test]
    fn test_faces_do_not_merge() {
        let union = CellUnion::from_cell_ids(CellUnion::whole_sphere().into_cell_ids()).unwrap();
        assert_eq!(union.len(), 6);
        assert!(union.is_normalized());
        assert_eq!(union.leaf_cells_covered(), 6 << 60);
        assert!((union.exact_area() - 4.0 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_ids() {
        assert_eq!(
            CellUnion::from_cell_ids(vec![CellId::none()]),
            Err(CellError::MalformedCellId(0))
        );
    }

    #[test]
    fn test_contains_and_intersects() {
        let parent = id_at(20.0, 20.0, 8);
        let union = CellUnion::from_cell_ids(vec![parent]).unwrap();
        let leaf = parent.range_min();
        assert!(union.contains_cell_id(parent));
        assert!(union.contains_cell_id(leaf));
        assert!(union.contains_cell_id(parent.range_max()));
        assert!(!union.contains_cell_id(parent.parent().unwrap()));
        assert!(union.intersects_cell_id(parent.parent().unwrap()));
        assert!(!union.intersects_cell_id(parent.next()));
        assert!(union.contains_point(parent.to_point()));
        assert!(union.contains_cell(&Cell::new(leaf).unwrap()));
        assert!(union.may_intersect_cell(&Cell::new(parent.parent_at(2).unwrap()).unwrap()));
    }

    #[test]
    fn test_union_intersection_difference() {
        let a = id_at(0.0, 0.0, 6);
        let children = a.children().unwrap();
        let x = CellUnion::from_cell_ids(vec![a, id_at(45.0, 45.0, 4)]).unwrap();
        let y = CellUnion::from_cell_ids(vec![children[1], children[3], id_at(-45.0, 90.0, 9)]).unwrap();

        let both = x.intersection(&y);
        let mut expected = vec![children[1], children[3]];
        expected.sort();
        assert_eq!(both.cell_ids(), expected.as_slice());
        assert_eq!(y.intersection(&x), both);

        let all = x.union(&y);
        assert!(all.contains(&x) && all.contains(&y));
        assert_eq!(all.len(), 3);

        let diff = x.difference(&y);
        assert!(!diff.intersects(&both));
        assert_eq!(diff.union(&both), x);
        assert!(diff.is_normalized());
    }

    #[test]
    fn test_intersection_with_cell_id() {
        let a = id_at(30.0, -60.0, 4);
        let kids = a.children().unwrap();
        let union = CellUnion::from_cell_ids(vec![kids[0], kids[2]]).unwrap();
        assert_eq!(union.intersection_with_cell_id(a).cell_ids(), &[kids[0], kids[2]]);
        assert_eq!(union.intersection_with_cell_id(kids[0].child(1).unwrap()).len(), 1);
        assert!(union.intersection_with_cell_id(kids[1]).is_empty());
    }

    #[test]
    fn test_denormalize() {
        let face = CellId::from_face(3).unwrap();
        let union = CellUnion::from_cell_ids(vec![face]).unwrap();
        assert_eq!(union.denormalize(2, 1).len(), 16);
        // Level 0 with min 1 and mod 2 rounds up to level 1.
        assert_eq!(union.denormalize(1, 2).len(), 4);

        let deep = CellUnion::from_cell_ids(vec![id_at(5.0, 5.0, 4)]).unwrap();
        // Levels allowed are 1, 3, 5, ... so level 4 expands to 5.
        let out = deep.denormalize(1, 2);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|id| id.level() == 5));
    }

    #[test]
    fn test_bounds() {
        let union = CellUnion::from_cell_ids(vec![id_at(10.0, 10.0, 6), id_at(11.0, 12.0, 7)]).unwrap();
        let cap = union.cap_bound();
        let rect = union.rect_bound();
        for id in &union {
            let cell = Cell::new(*id).unwrap();
            for v in cell.vertices() {
                assert!(cap.contains_point(v));
                assert!(rect.contains_point(v));
            }
        }
        assert!(CellUnion::default().cap_bound().is_empty());
        assert!(CellUnion::default().rect_bound().is_empty());
        assert!((union.average_area() - union.exact_area()).abs() / union.exact_area() < 0.5);
    }
}
