//! Cell identifiers
//!
//! A [`CellId`] names one cell of the hierarchical subdivision of the six cube
//! faces as a single `u64`:
//!
//! ```text
//!   fff ppppppp....pp 1 000...0
//!   |   |             |
//!   |   |             +-- sentinel bit; its position encodes the level
//!   |   +---------------- 2 bits per level of Hilbert curve position
//!   +-------------------- face (0..6)
//! ```
//!
//! A level-`L` cell has its sentinel at bit `2 * (30 - L)`: leaf cells
//! (level 30) end in bit 0 and whole faces (level 0) end in bit 60. Sorting
//! identifiers as unsigned integers walks every level of the hierarchy along
//! the Hilbert curve, face after face, and every cell's descendants occupy the
//! contiguous range `[range_min, range_max]`.

mod lookup;
mod neighbors;
mod token;

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{CellError, Result};
use crate::geometry::{LatLng, Point};
use crate::projection::{self, NUM_FACES};

use lookup::{LOOKUP_BITS, LOOKUP_IJ, LOOKUP_POS, SWAP_MASK};

pub(crate) use lookup::{POS_TO_IJ, POS_TO_ORIENTATION};

/// Deepest subdivision level
pub const MAX_LEVEL: u8 = 30;

/// Number of bits used for the face
pub const FACE_BITS: u32 = 3;

/// Number of bits below the face: position plus sentinel
pub const POS_BITS: u32 = 2 * MAX_LEVEL as u32 + 1;

/// Number of leaf cells along each edge of a face
pub const MAX_SIZE: i32 = 1 << MAX_LEVEL;

/// Distance between the start of face 0 and one past the end of face 5
const WRAP_OFFSET: u64 = (NUM_FACES as u64) << POS_BITS;

/// Sentinel positions that are valid: even bit indices up to 60
const VALID_SENTINEL_MASK: u64 = 0x1555_5555_5555_5555;

/// Sentinel positions at odd multiples of four levels, where the decoded
/// orientation needs one final swap
const ODD_LEVEL_SWAP_MASK: u64 = 0x1111_1111_1111_1110;

/// A cell in the quad-tree over the six cube faces
///
/// Ordering is the unsigned integer ordering of the raw identifier, which is
/// the Hilbert curve order across faces 0 through 5.
///
/// # Example
///
/// ```
/// use rust_s2_cells::{CellId, LatLng};
///
/// let leaf = CellId::from_lat_lng(LatLng::from_degrees(0.0, 0.0));
/// assert_eq!(leaf.level(), 30);
///
/// let cell = leaf.parent_at(15).unwrap();
/// assert_eq!(cell.0, 0x1000_0000_4000_0000);
/// assert_eq!(cell.to_token(), "100000004");
/// assert!(cell.contains(leaf));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CellId(pub u64);

impl CellId {
    /// The invalid identifier `0`
    #[inline]
    pub const fn none() -> CellId {
        CellId(0)
    }

    /// An invalid identifier that sorts after every valid one
    #[inline]
    pub const fn sentinel() -> CellId {
        CellId(u64::MAX)
    }

    /// Value of the sentinel bit for cells at `level`
    ///
    /// `level` must be at most 30; debug builds assert this.
    #[inline]
    pub const fn lsb_for_level(level: u8) -> u64 {
        debug_assert!(level <= MAX_LEVEL);
        1 << (2 * (MAX_LEVEL - level) as u32)
    }

    /// Edge length of a cell at `level`, in leaf cells
    ///
    /// `level` must be at most 30; debug builds assert this.
    #[inline]
    pub const fn size_ij(level: u8) -> i32 {
        debug_assert!(level <= MAX_LEVEL);
        1 << (MAX_LEVEL - level)
    }

    /// The level-0 cell covering a whole face
    ///
    /// # Errors
    ///
    /// Returns `InvalidFace` if `face >= 6`
    pub fn from_face(face: u8) -> Result<CellId> {
        if face >= NUM_FACES {
            return Err(CellError::InvalidFace(face));
        }
        Ok(CellId(((face as u64) << POS_BITS) + Self::lsb_for_level(0)))
    }

    /// The cell at `level` containing Hilbert position `pos` on `face`
    ///
    /// `pos` is a 61-bit position along the face's curve; bits finer than
    /// `level` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFace` if `face >= 6` and `InvalidLevel` if `level > 30`
    pub fn from_face_pos_level(face: u8, pos: u64, level: u8) -> Result<CellId> {
        if face >= NUM_FACES {
            return Err(CellError::InvalidFace(face));
        }
        if level > MAX_LEVEL {
            return Err(CellError::InvalidLevel {
                level: level as i32,
                reason: "level must be in [0, 30]",
            });
        }
        let pos = pos & ((1u64 << POS_BITS) - 1);
        let leaf = CellId(((face as u64) << POS_BITS) + (pos | 1));
        Ok(leaf.parent_unchecked(level))
    }

    /// The leaf cell at grid coordinates `(i, j)` on `face`
    ///
    /// Coordinates are expected in `[0, 2^30)` and `face` in `[0, 6)`.
    pub fn from_face_ij(face: u8, i: i32, j: i32) -> CellId {
        let mut n = (face as u64) << (POS_BITS - 1);
        let mut bits = (face as usize) & SWAP_MASK;
        let mask = (1usize << LOOKUP_BITS) - 1;

        for k in (0..8u32).rev() {
            bits += ((i as usize >> (k * LOOKUP_BITS)) & mask) << (LOOKUP_BITS + 2);
            bits += ((j as usize >> (k * LOOKUP_BITS)) & mask) << 2;
            bits = LOOKUP_POS[bits] as usize;
            n |= ((bits >> 2) as u64) << (k * 2 * LOOKUP_BITS);
            bits &= 3;
        }

        CellId(n * 2 + 1)
    }

    /// The leaf cell containing `p`; `p` need not be unit length
    pub fn from_point(p: Point) -> CellId {
        let (face, u, v) = projection::xyz_to_face_uv(p);
        let i = projection::st_to_ij(projection::uv_to_st(u));
        let j = projection::st_to_ij(projection::uv_to_st(v));
        CellId::from_face_ij(face, i, j)
    }

    /// The leaf cell containing `ll`
    pub fn from_lat_lng(ll: LatLng) -> CellId {
        CellId::from_point(ll.to_point())
    }

    /// Decode into `(face, i, j, orientation)`
    ///
    /// `(i, j)` are the grid coordinates of a leaf cell inside this cell
    /// (one adjacent to its centre for non-leaf cells). `orientation` holds
    /// the swap and invert bits of the Hilbert curve within this cell.
    pub fn to_face_ij_orientation(&self) -> (u8, i32, i32, u8) {
        let face = self.face();
        let mut i = 0i32;
        let mut j = 0i32;
        let mut bits = (face as usize) & SWAP_MASK;

        for k in (0..8u32).rev() {
            let nbits = if k == 7 {
                MAX_LEVEL as u32 - 7 * LOOKUP_BITS
            } else {
                LOOKUP_BITS
            };
            bits += ((self.0 >> (k * 2 * LOOKUP_BITS + 1)) as usize & ((1 << (2 * nbits)) - 1)) << 2;
            bits = LOOKUP_IJ[bits] as usize;
            i += ((bits >> (LOOKUP_BITS + 2)) as i32) << (k * LOOKUP_BITS);
            j += (((bits >> 2) & ((1 << LOOKUP_BITS) - 1)) as i32) << (k * LOOKUP_BITS);
            bits &= 3;
        }

        if self.lsb() & ODD_LEVEL_SWAP_MASK != 0 {
            bits ^= SWAP_MASK;
        }
        (face, i, j, bits as u8)
    }

    /// Centre of the cell on the cube surface; not unit length
    pub fn to_point_raw(&self) -> Point {
        let (face, si, ti) = self.center_siti();
        projection::face_uv_to_xyz(
            face,
            projection::st_to_uv(projection::siti_to_st(si)),
            projection::st_to_uv(projection::siti_to_st(ti)),
        )
    }

    /// Unit-length centre of the cell
    pub fn to_point(&self) -> Point {
        self.to_point_raw().normalize()
    }

    /// Latitude/longitude of the cell centre
    ///
    /// For non-leaf cells this snaps to the centre, not to any point the
    /// identifier was built from.
    pub fn to_lat_lng(&self) -> LatLng {
        LatLng::from_point(self.to_point_raw())
    }

    /// Face and doubled leaf-grid coordinates `(si, ti)` of the cell centre
    pub(crate) fn center_siti(&self) -> (u8, u64, u64) {
        let (face, i, j, _) = self.to_face_ij_orientation();
        let delta = if self.is_leaf() {
            1
        } else if ((i as u64) ^ (self.0 >> 2)) & 1 != 0 {
            2
        } else {
            0
        };
        (
            face,
            2 * i as u64 + delta,
            2 * j as u64 + delta,
        )
    }

    #[inline]
    pub fn face(&self) -> u8 {
        (self.0 >> POS_BITS) as u8
    }

    /// Hilbert position on the face, including the sentinel bit
    #[inline]
    pub fn pos(&self) -> u64 {
        self.0 & (u64::MAX >> FACE_BITS)
    }

    /// The sentinel bit
    #[inline]
    pub fn lsb(&self) -> u64 {
        self.0 & self.0.wrapping_neg()
    }

    /// Subdivision level in `[0, 30]`; meaningless for invalid identifiers
    #[inline]
    pub fn level(&self) -> u8 {
        MAX_LEVEL.saturating_sub((self.0.trailing_zeros() >> 1) as u8)
    }

    /// True if the face is in range and the sentinel sits on a level boundary
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.face() < NUM_FACES && self.lsb() & VALID_SENTINEL_MASK != 0
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.0 & 1 != 0
    }

    #[inline]
    pub fn is_face(&self) -> bool {
        self.lsb() == Self::lsb_for_level(0)
    }

    #[inline]
    fn check_valid(&self) -> Result<()> {
        if !self.is_valid() {
            return Err(CellError::MalformedCellId(self.0));
        }
        Ok(())
    }

    /// Child position (0..4) of this cell's ancestor at `level` within its parent
    ///
    /// # Errors
    ///
    /// Returns `MalformedCellId` for an invalid identifier and `InvalidLevel`
    /// unless `1 <= level <= self.level()`
    pub fn child_position(&self, level: u8) -> Result<u8> {
        self.check_valid()?;
        if level == 0 || level > self.level() {
            return Err(CellError::InvalidLevel {
                level: level as i32,
                reason: "child position needs a level in [1, cell level]",
            });
        }
        Ok(((self.0 >> (2 * (MAX_LEVEL - level) as u32 + 1)) & 3) as u8)
    }

    /// Child position of this cell within its parent
    ///
    /// # Errors
    ///
    /// Returns `InvalidLevel` for face cells
    pub fn child_index(&self) -> Result<u8> {
        self.child_position(self.level())
    }

    /// The immediate parent
    ///
    /// # Errors
    ///
    /// Returns `MalformedCellId` for an invalid identifier and `InvalidLevel`
    /// for face cells, which have no parent
    pub fn parent(&self) -> Result<CellId> {
        self.check_valid()?;
        let level = self.level();
        if level == 0 {
            return Err(CellError::InvalidLevel {
                level: -1,
                reason: "face cells have no parent",
            });
        }
        Ok(self.parent_unchecked(level - 1))
    }

    /// The ancestor at `level`; a cell is its own ancestor at its own level
    ///
    /// # Errors
    ///
    /// Returns `MalformedCellId` for an invalid identifier and `InvalidLevel`
    /// if `level` is finer than this cell's level
    pub fn parent_at(&self, level: u8) -> Result<CellId> {
        self.check_valid()?;
        if level > self.level() {
            return Err(CellError::InvalidLevel {
                level: level as i32,
                reason: "parent level is finer than the cell level",
            });
        }
        Ok(self.parent_unchecked(level))
    }

    #[inline]
    pub(crate) fn parent_unchecked(&self, level: u8) -> CellId {
        let new_lsb = Self::lsb_for_level(level);
        CellId((self.0 & new_lsb.wrapping_neg()) | new_lsb)
    }

    /// Child `position` (0..4) in Hilbert traversal order
    ///
    /// # Errors
    ///
    /// Returns `MalformedCellId` for an invalid identifier,
    /// `InvalidChildPosition` if `position > 3` and `InvalidLevel` for leaf cells
    pub fn child(&self, position: u8) -> Result<CellId> {
        self.check_valid()?;
        if position > 3 {
            return Err(CellError::InvalidChildPosition(position));
        }
        if self.is_leaf() {
            return Err(CellError::InvalidLevel {
                level: MAX_LEVEL as i32 + 1,
                reason: "leaf cells have no children",
            });
        }
        Ok(self.child_unchecked(position))
    }

    #[inline]
    fn child_unchecked(&self, position: u8) -> CellId {
        let new_lsb = self.lsb() >> 2;
        CellId(self.0 - self.lsb() + (2 * position as u64 + 1) * new_lsb)
    }

    /// All four children in Hilbert traversal order
    ///
    /// # Errors
    ///
    /// Returns `MalformedCellId` for an invalid identifier and `InvalidLevel`
    /// for leaf cells
    pub fn children(&self) -> Result<[CellId; 4]> {
        self.check_valid()?;
        if self.is_leaf() {
            return Err(CellError::InvalidLevel {
                level: MAX_LEVEL as i32 + 1,
                reason: "leaf cells have no children",
            });
        }
        Ok([
            self.child_unchecked(0),
            self.child_unchecked(1),
            self.child_unchecked(2),
            self.child_unchecked(3),
        ])
    }

    /// First child; for leaf cells the result is not a valid cell
    #[inline]
    pub fn child_begin(&self) -> CellId {
        let lsb = self.lsb();
        CellId(self.0 - lsb + (lsb >> 2))
    }

    /// One past the last child, for use as an exclusive bound
    #[inline]
    pub fn child_end(&self) -> CellId {
        let lsb = self.lsb();
        CellId(self.0.wrapping_add(lsb).wrapping_add(lsb >> 2))
    }

    /// First descendant at `level`
    ///
    /// `level` must lie between this cell's level and 30; debug builds
    /// assert this.
    #[inline]
    pub fn child_begin_at(&self, level: u8) -> CellId {
        debug_assert!(level >= self.level() && level <= MAX_LEVEL);
        CellId(self.0 - self.lsb() + Self::lsb_for_level(level))
    }

    /// One past the last descendant at `level`, with the same precondition
    /// as [`CellId::child_begin_at`]
    #[inline]
    pub fn child_end_at(&self, level: u8) -> CellId {
        debug_assert!(level >= self.level() && level <= MAX_LEVEL);
        CellId(self.0.wrapping_add(self.lsb()).wrapping_add(Self::lsb_for_level(level)))
    }

    /// Iterate over every descendant at `level` in Hilbert order
    ///
    /// # Errors
    ///
    /// Returns `MalformedCellId` for an invalid identifier and `InvalidLevel`
    /// unless `self.level() <= level <= 30`
    ///
    /// # Example
    ///
    /// ```
    /// use rust_s2_cells::CellId;
    ///
    /// let face = CellId::from_face(2).unwrap();
    /// assert_eq!(face.children_at(2).unwrap().count(), 16);
    /// ```
    pub fn children_at(&self, level: u8) -> Result<ChildIter> {
        self.check_valid()?;
        if level < self.level() || level > MAX_LEVEL {
            return Err(CellError::InvalidLevel {
                level: level as i32,
                reason: "descendant level must be in [cell level, 30]",
            });
        }
        Ok(ChildIter {
            next: self.child_begin_at(level),
            end: self.child_end_at(level),
            step: Self::lsb_for_level(level) << 1,
        })
    }

    /// Smallest leaf descendant
    #[inline]
    pub fn range_min(&self) -> CellId {
        CellId(self.0 - (self.lsb() - 1))
    }

    /// Largest leaf descendant
    #[inline]
    pub fn range_max(&self) -> CellId {
        CellId(self.0 + (self.lsb() - 1))
    }

    /// True if `other` is this cell or one of its descendants
    #[inline]
    pub fn contains(&self, other: CellId) -> bool {
        other >= self.range_min() && other <= self.range_max()
    }

    /// True if the two cells share any leaf cell
    #[inline]
    pub fn intersects(&self, other: CellId) -> bool {
        other.range_min() <= self.range_max() && other.range_max() >= self.range_min()
    }

    /// The next cell at the same level along the Hilbert curve
    ///
    /// The last cell of face 5 is followed by the first cell of face 0.
    pub fn next(&self) -> CellId {
        let n = self.0.wrapping_add(self.lsb() << 1);
        if n < WRAP_OFFSET {
            CellId(n)
        } else {
            CellId(n - WRAP_OFFSET)
        }
    }

    /// The previous cell at the same level along the Hilbert curve
    ///
    /// The first cell of face 0 is preceded by the last cell of face 5.
    pub fn prev(&self) -> CellId {
        let p = self.0.wrapping_sub(self.lsb() << 1);
        if p < WRAP_OFFSET {
            CellId(p)
        } else {
            CellId(p.wrapping_add(WRAP_OFFSET))
        }
    }

    /// Level of the deepest cell containing both, or `None` when they lie on different faces
    pub fn common_ancestor_level(&self, other: CellId) -> Option<u8> {
        let bits = (self.0 ^ other.0) | self.lsb().max(other.lsb());
        let msb = 63 - bits.leading_zeros();
        if msb > 60 {
            return None;
        }
        Some(((60 - msb) >> 1) as u8)
    }
}

/// Iterator over the descendants of a cell at one level
#[derive(Debug, Clone)]
pub struct ChildIter {
    next: CellId,
    end: CellId,
    step: u64,
}

impl Iterator for ChildIter {
    type Item = CellId;

    fn next(&mut self) -> Option<CellId> {
        if self.next == self.end {
            return None;
        }
        let current = self.next;
        self.next = CellId(self.next.0.wrapping_add(self.step));
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end.0.wrapping_sub(self.next.0) / self.step) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChildIter {}

impl fmt::Display for CellId {
    /// Face followed by the child position at each level, e.g. `4/0312`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "Invalid: {:016x}", self.0);
        }
        write!(f, "{}/", self.face())?;
        for level in 1..=self.level() {
            let digit = (self.0 >> (2 * (MAX_LEVEL - level) as u32 + 1)) & 3;
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

impl From<CellId> for u64 {
    fn from(id: CellId) -> u64 {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN_LEAF: CellId = CellId(0x1000_0000_0000_0001);
    const ORIGIN_L15: CellId = CellId(0x1000_0000_4000_0000);

    #[test]
    fn test_origin_fixture() {
        let leaf = CellId::from_lat_lng(LatLng::from_degrees(0.0, 0.0));
        assert_eq!(leaf, ORIGIN_LEAF);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.parent_at(15).unwrap(), ORIGIN_L15);
        assert_eq!(ORIGIN_L15.0, 1_152_921_505_680_588_800);
        assert_eq!(ORIGIN_L15.level(), 15);
    }

    #[test]
    fn test_face_cells() {
        let expected = [
            0x1000_0000_0000_0000u64,
            0x3000_0000_0000_0000,
            0x5000_0000_0000_0000,
            0x7000_0000_0000_0000,
            0x9000_0000_0000_0000,
            0xb000_0000_0000_0000,
        ];
        for face in 0..6u8 {
            let id = CellId::from_face(face).unwrap();
            assert_eq!(id.0, expected[face as usize]);
            assert!(id.is_face());
            assert!(id.is_valid());
            assert_eq!(id.face(), face);
            assert_eq!(id.level(), 0);
        }
        assert_eq!(CellId::from_face(6), Err(CellError::InvalidFace(6)));
    }

    #[test]
    fn test_validity() {
        assert!(!CellId::none().is_valid());
        assert!(!CellId::sentinel().is_valid());
        // Sentinel at an odd bit index.
        assert!(!CellId(0x1000_0000_0000_0002).is_valid());
        // Face 6.
        assert!(!CellId(0xd000_0000_0000_0000).is_valid());
        assert_eq!(CellId::none().level(), 0);
    }

    #[test]
    fn test_from_face_pos_level() {
        let id = CellId::from_face_pos_level(3, 0x12345678, 30).unwrap();
        assert_eq!(id.face(), 3);
        assert!(id.is_leaf());
        let coarse = CellId::from_face_pos_level(3, 0x12345678, 10).unwrap();
        assert_eq!(coarse, id.parent_at(10).unwrap());
        assert!(CellId::from_face_pos_level(6, 0, 0).is_err());
        assert!(CellId::from_face_pos_level(0, 0, 31).is_err());
    }

    #[test]
    fn test_face_ij_roundtrip() {
        for (face, i, j) in [(0u8, 0, 0), (1, 5, 7), (3, 5, 7), (4, MAX_SIZE - 1, 0), (5, 123_456, 987_654)] {
            let id = CellId::from_face_ij(face, i, j);
            let (f, i2, j2, _) = id.to_face_ij_orientation();
            assert_eq!((f, i2, j2), (face, i, j));
        }
        assert_eq!(CellId::from_face_ij(3, 5, 7).0, 0x6000_0000_0000_004d);
        assert_eq!(CellId::from_face_ij(5, MAX_SIZE - 1, MAX_SIZE - 1).0, 0xb555_5555_5555_5555);
    }

    #[test]
    fn test_orientation_of_face_cells() {
        // Odd faces start swapped.
        for face in 0..6u8 {
            let (_, _, _, o) = CellId::from_face(face).unwrap().to_face_ij_orientation();
            assert_eq!(o as usize & SWAP_MASK, face as usize & SWAP_MASK);
        }
    }

    #[test]
    fn test_parent_child() {
        let leaf = ORIGIN_LEAF;
        assert!(ORIGIN_L15.parent_at(16).is_err());
        assert!(CellId::from_face(0).unwrap().parent().is_err());

        let mut id = leaf;
        while id.level() > 0 {
            let parent = id.parent().unwrap();
            let k = id.child_index().unwrap();
            assert_eq!(parent.child(k).unwrap(), id);
            assert_eq!(parent.children().unwrap()[k as usize], id);
            assert_eq!(parent.parent_at(parent.level()).unwrap(), parent);
            id = parent;
        }

        assert!(leaf.child(0).is_err());
        assert_eq!(ORIGIN_L15.child(4), Err(CellError::InvalidChildPosition(4)));
        assert_eq!(ORIGIN_L15.child_position(1).unwrap(), 2);
        assert_eq!(ORIGIN_L15.child_position(2).unwrap(), 0);
        assert!(ORIGIN_L15.child_position(0).is_err());
    }

    #[test]
    fn test_navigation_rejects_malformed_ids() {
        let odd_sentinel = CellId(0x1000_0000_0000_0002);
        for id in [CellId::none(), CellId::sentinel(), odd_sentinel] {
            let malformed = CellError::MalformedCellId(id.0);
            assert_eq!(id.parent(), Err(malformed.clone()));
            assert_eq!(id.parent_at(0), Err(malformed.clone()));
            assert_eq!(id.child(0), Err(malformed.clone()));
            assert_eq!(id.children(), Err(malformed.clone()));
            assert_eq!(id.child_position(1), Err(malformed.clone()));
            assert_eq!(id.child_index(), Err(malformed.clone()));
            assert!(matches!(id.children_at(30), Err(CellError::MalformedCellId(_))));
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_child_begin_at_rejects_coarser_level() {
        ORIGIN_L15.child_begin_at(14);
    }

    #[test]
    fn test_is_face_requires_face_sentinel() {
        for face in 0..6u8 {
            assert!(CellId::from_face(face).unwrap().is_face());
        }
        assert!(!CellId(0x2000_0000_0000_0000).is_face());
        assert!(!CellId::none().is_face());
        assert!(!ORIGIN_L15.is_face());
    }

    #[test]
    fn test_child_iteration() {
        let parent = ORIGIN_L15;
        let kids: Vec<CellId> = parent.children_at(16).unwrap().collect();
        assert_eq!(kids, parent.children().unwrap().to_vec());
        assert_eq!(parent.child_begin(), kids[0]);
        assert_eq!(kids[3].next(), parent.child_end());
        assert_eq!(parent.children_at(18).unwrap().len(), 64);
        assert!(parent.children_at(14).is_err());

        // Iterating the last face does not wrap.
        let last = CellId::from_face(5).unwrap();
        assert_eq!(last.children_at(1).unwrap().count(), 4);
    }

    #[test]
    fn test_range_and_contains() {
        let c = ORIGIN_L15;
        assert_eq!(c.range_min(), CellId(0x1000_0000_0000_0001));
        assert_eq!(c.range_max(), CellId(0x1000_0000_7fff_ffff));
        assert!(c.range_min().is_leaf() && c.range_max().is_leaf());
        assert!(c.contains(c));
        assert!(c.contains(ORIGIN_LEAF));
        assert!(!ORIGIN_LEAF.contains(c));
        assert!(c.intersects(ORIGIN_LEAF));
        assert!(!c.intersects(c.next()));
    }

    #[test]
    fn test_next_prev() {
        let c = ORIGIN_L15;
        assert_eq!(c.next(), CellId(0x1000_0000_c000_0000));
        assert_eq!(c.prev(), CellId(0x0fff_ffff_c000_0000));
        assert_eq!(c.next().prev(), c);
        assert_eq!(c.prev().next(), c);
    }

    #[test]
    fn test_next_prev_wrap_faces() {
        let first_leaf = CellId(1);
        let last_leaf = CellId(0xbfff_ffff_ffff_ffff);
        assert_eq!(first_leaf.prev(), last_leaf);
        assert_eq!(last_leaf.next(), first_leaf);

        let face0 = CellId::from_face(0).unwrap();
        let face5 = CellId::from_face(5).unwrap();
        assert_eq!(face0.prev(), face5);
        assert_eq!(face5.next(), face0);
        assert_eq!(CellId::from_face(2).unwrap().next(), CellId::from_face(3).unwrap());
    }

    #[test]
    fn test_common_ancestor_level() {
        let c = ORIGIN_L15;
        assert_eq!(c.common_ancestor_level(c), Some(15));
        assert_eq!(c.common_ancestor_level(ORIGIN_LEAF), Some(15));
        assert_eq!(ORIGIN_LEAF.common_ancestor_level(c), Some(15));
        let kids = c.children().unwrap();
        assert_eq!(kids[0].common_ancestor_level(kids[3]), Some(15));
        let f0 = CellId::from_face(0).unwrap();
        let f1 = CellId::from_face(1).unwrap();
        assert_eq!(f0.common_ancestor_level(f1), None);
    }

    #[test]
    fn test_center_fixture() {
        let ll = ORIGIN_L15.to_lat_lng();
        assert!((ll.lat - 2.034536251717351e-05).abs() < 1e-18);
        assert!((ll.lng - 2.0345362521384327e-05).abs() < 1e-18);
        assert!((ORIGIN_L15.to_point().norm() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_point_roundtrip_leaf() {
        for (lat, lng) in [(0.0, 0.0), (45.0, 45.0), (-89.9, 179.9), (10.0, -170.0), (90.0, 0.0)] {
            let ll = LatLng::from_degrees(lat, lng);
            let id = CellId::from_lat_lng(ll);
            // Leaf cells are well under a microradian across.
            assert!(id.to_lat_lng().to_point().angle(ll.to_point()) < 1e-8);
            assert_eq!(CellId::from_point(id.to_point()), id);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(CellId::from_face(4).unwrap().to_string(), "4/");
        assert_eq!(ORIGIN_L15.to_string(), "0/200000000000000");
        assert_eq!(CellId::none().to_string(), "Invalid: 0000000000000000");
    }
}
