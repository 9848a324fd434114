//! Region types accepted by the coverer
//!
//! [`Region`] is a closed set of shapes. Each variant answers the two
//! questions the covering search asks of a cell (may it intersect, is it
//! contained) plus point containment and bounding shapes.

mod cap;
mod rect;

pub use cap::Cap;
pub use rect::Rect;

use crate::cell::Cell;
use crate::cellunion::CellUnion;
use crate::geometry::Point;

/// A region on the sphere
///
/// # Example
///
/// ```
/// use rust_s2_cells::{Cap, LatLng, Rect, Region};
///
/// let paris = LatLng::from_degrees(48.85, 2.35).to_point();
/// let region = Region::Union(vec![
///     Region::Cap(Cap::from_axis_angle(paris, 0.001)),
///     Region::Rect(Rect::from_lat_lng(
///         LatLng::from_degrees(10.0, 10.0),
///         LatLng::from_degrees(11.0, 11.0),
///     )),
/// ]);
/// assert!(region.contains_point(paris));
/// assert!(region.contains_point(LatLng::from_degrees(10.5, 10.5).to_point()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Cap(Cap),
    Rect(Rect),
    CellUnion(CellUnion),
    /// Every point in any of the member regions
    Union(Vec<Region>),
}

impl Region {
    /// False only if the region certainly does not intersect `cell`
    pub fn may_intersect_cell(&self, cell: &Cell) -> bool {
        match self {
            Region::Cap(cap) => cap.may_intersect_cell(cell),
            Region::Rect(rect) => rect.may_intersect_cell(cell),
            Region::CellUnion(union) => union.may_intersect_cell(cell),
            Region::Union(regions) => regions.iter().any(|r| r.may_intersect_cell(cell)),
        }
    }

    /// True only if the region certainly contains `cell`
    ///
    /// For a union this requires a single member to contain the whole cell.
    pub fn contains_cell(&self, cell: &Cell) -> bool {
        match self {
            Region::Cap(cap) => cap.contains_cell(cell),
            Region::Rect(rect) => rect.contains_cell(cell),
            Region::CellUnion(union) => union.contains_cell(cell),
            Region::Union(regions) => regions.iter().any(|r| r.contains_cell(cell)),
        }
    }

    pub fn contains_point(&self, p: Point) -> bool {
        match self {
            Region::Cap(cap) => cap.contains_point(p),
            Region::Rect(rect) => rect.contains_point(p),
            Region::CellUnion(union) => union.contains_point(p),
            Region::Union(regions) => regions.iter().any(|r| r.contains_point(p)),
        }
    }

    pub fn cap_bound(&self) -> Cap {
        match self {
            Region::Cap(cap) => *cap,
            Region::Rect(rect) => rect.cap_bound(),
            Region::CellUnion(union) => union.cap_bound(),
            Region::Union(_) => self.rect_bound().cap_bound(),
        }
    }

    pub fn rect_bound(&self) -> Rect {
        match self {
            Region::Cap(cap) => cap.rect_bound(),
            Region::Rect(rect) => *rect,
            Region::CellUnion(union) => union.rect_bound(),
            Region::Union(regions) => regions
                .iter()
                .fold(Rect::empty(), |acc, r| acc.union(&r.rect_bound())),
        }
    }

    /// True if the region contains no points
    pub fn is_empty(&self) -> bool {
        match self {
            Region::Cap(cap) => cap.is_empty(),
            Region::Rect(rect) => rect.is_empty(),
            Region::CellUnion(union) => union.is_empty(),
            Region::Union(regions) => regions.iter().all(Region::is_empty),
        }
    }
}

impl From<Cap> for Region {
    fn from(cap: Cap) -> Self {
        Region::Cap(cap)
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Region::Rect(rect)
    }
}

impl From<CellUnion> for Region {
    fn from(union: CellUnion) -> Self {
        Region::CellUnion(union)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cellid::CellId;
    use crate::geometry::LatLng;

    #[test]
    fn test_empty_regions() {
        assert!(Region::Cap(Cap::empty()).is_empty());
        assert!(Region::Rect(Rect::empty()).is_empty());
        assert!(Region::CellUnion(CellUnion::default()).is_empty());
        assert!(Region::Union(vec![]).is_empty());
        assert!(Region::Union(vec![Cap::empty().into(), Rect::empty().into()]).is_empty());
        assert!(!Region::Cap(Cap::full()).is_empty());
    }

    #[test]
    fn test_union_dispatch() {
        let a = LatLng::from_degrees(0.0, 0.0).to_point();
        let b = LatLng::from_degrees(0.0, 90.0).to_point();
        let region = Region::Union(vec![
            Cap::from_axis_angle(a, 0.1).into(),
            Cap::from_axis_angle(b, 0.1).into(),
        ]);
        assert!(region.contains_point(a));
        assert!(region.contains_point(b));
        assert!(!region.contains_point(LatLng::from_degrees(0.0, 45.0).to_point()));

        let rect = region.rect_bound();
        assert!(rect.contains_point(a) && rect.contains_point(b));
        let cap = region.cap_bound();
        assert!(cap.contains_point(a) && cap.contains_point(b));

        let face0 = Cell::new(CellId::from_face(0).unwrap()).unwrap();
        let face3 = Cell::new(CellId::from_face(3).unwrap()).unwrap();
        assert!(region.may_intersect_cell(&face0));
        assert!(!region.may_intersect_cell(&face3));
        assert!(!region.contains_cell(&face0));
    }

    #[test]
    fn test_cell_union_region() {
        let id = CellId::from_lat_lng(LatLng::from_degrees(10.0, 20.0)).parent_at(5).unwrap();
        let region = Region::from(CellUnion::from_cell_ids(vec![id]).unwrap());
        let cell = Cell::new(id).unwrap();
        assert!(region.contains_cell(&cell));
        assert!(region.may_intersect_cell(&cell));
        assert!(region.contains_point(cell.center()));
        assert!(region.cap_bound().contains_point(cell.vertex(0)));
        assert!(region.rect_bound().contains_point(cell.vertex(3)));
    }
}
