//! Hierarchical spherical cell index
//!
//! A standalone library that divides the sphere into a quad-tree of cells on
//! the six faces of a cube, addresses every cell with a sortable 64-bit
//! identifier, and approximates regions by small sets of cells.
//!
//! # Quick Start
//!
//! ```rust
//! use rust_s2_cells::*;
//!
//! // Identify the leaf cell under a location, then walk up the hierarchy
//! let leaf = CellId::from_lat_lng(LatLng::from_degrees(0.0, 0.0));
//! let parent = leaf.parent_at(15).unwrap();
//! assert_eq!(parent.to_token(), "100000004");
//!
//! // Measure the cell
//! let cell = Cell::new(parent).unwrap();
//! println!("Level 15 cell area: {:e} sr", cell.exact_area());
//!
//! // Cover a 1 km cap with at most 8 cells
//! let options = CovererOptionsBuilder::new().max_cells(8).build().unwrap();
//! let cap = Cap::from_axis_angle(LatLng::from_degrees(0.0, 0.0).to_point(), 1.0 / 6371.0);
//! let covering = RegionCoverer::new(options).unwrap().get_covering(&Region::Cap(cap));
//! assert!(covering.len() <= 8);
//! ```
//!
//! # Features
//!
//! - `serde`: Enables serialization support for identifiers, geometry values,
//!   cell unions and coverer options

// Modules
pub mod error;
pub mod geometry;
pub mod projection;
pub mod cellid;
pub mod metric;
pub mod cell;
pub mod region;
pub mod cellunion;
pub mod config;
pub mod coverer;
pub mod random;

// Re-export core types for convenience
pub use error::{CellError, Result};
pub use geometry::{LatLng, Point, R1Interval, S1Interval};
pub use cellid::{CellId, ChildIter, MAX_LEVEL};
pub use metric::Metric;
pub use cell::Cell;
pub use region::{Cap, Rect, Region};
pub use cellunion::CellUnion;
pub use config::{CovererOptions, CovererOptionsBuilder};
pub use coverer::RegionCoverer;

// Re-export glam::DVec3 for convenience
pub use glam::DVec3;
