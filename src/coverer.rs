//! Region coverer
//!
//! Approximates a [`Region`] by a small set of cells. The search keeps a
//! priority queue of candidate cells: candidates that would split into few
//! children and many fully-contained children are expanded first, which
//! spends the cell budget where it tightens the covering most. When the
//! budget runs out the remaining candidates are accepted as they are.
//!
//! ```text
//!   initial candidates ──► queue ──► pop ──► fits budget? ──yes──► expand children
//!                                              │
//!                                              no ──► accept cell as-is
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::cell::Cell;
use crate::cellid::{CellId, MAX_LEVEL};
use crate::cellunion::CellUnion;
use crate::config::CovererOptions;
use crate::error::Result;
use crate::metric::MIN_WIDTH;
use crate::region::Region;

/// Computes coverings and interior coverings of regions
///
/// The coverer holds only its options; every call allocates its own
/// candidate queue, so one coverer may be shared between threads.
///
/// # Example
///
/// ```
/// use rust_s2_cells::*;
///
/// let options = CovererOptionsBuilder::new().max_level(12).unwrap().max_cells(10).build().unwrap();
/// let coverer = RegionCoverer::new(options).unwrap();
///
/// let center = LatLng::from_degrees(51.5, -0.12).to_point();
/// let region = Region::Cap(Cap::from_axis_angle(center, 0.002));
/// let covering = coverer.get_covering(&region);
///
/// assert!(covering.len() <= 10);
/// assert!(covering.contains_point(center));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionCoverer {
    options: CovererOptions,
}

impl RegionCoverer {
    /// Create a coverer for `options`
    ///
    /// # Errors
    ///
    /// Returns the [`CovererOptions::validate`] error for options that did
    /// not come through the builder intact
    pub fn new(options: CovererOptions) -> Result<Self> {
        options.validate()?;
        Ok(RegionCoverer { options })
    }

    #[inline]
    pub fn options(&self) -> &CovererOptions {
        &self.options
    }

    /// Normalized set of cells whose union contains `region`
    ///
    /// Holds at most `max_cells` cells unless the region spans more faces
    /// than that or `min_level` forbids merging. Empty regions yield an
    /// empty union.
    pub fn get_covering(&self, region: &Region) -> CellUnion {
        Search::new(self.options, region, false).run()
    }

    /// Normalized set of cells contained in `region`
    pub fn get_interior_covering(&self, region: &Region) -> CellUnion {
        Search::new(self.options, region, true).run()
    }

    /// [`RegionCoverer::get_covering`] expanded so every cell level honours
    /// `min_level` and `level_mod`
    pub fn covering_cells(&self, region: &Region) -> Vec<CellId> {
        self.get_covering(region)
            .denormalize(self.options.min_level, self.options.level_mod)
    }

    /// [`RegionCoverer::get_interior_covering`] expanded so every cell level
    /// honours `min_level` and `level_mod`
    pub fn interior_covering_cells(&self, region: &Region) -> Vec<CellId> {
        self.get_interior_covering(region)
            .denormalize(self.options.min_level, self.options.level_mod)
    }
}

#[derive(Debug)]
struct Candidate {
    cell: Cell,
    /// Accept as-is, never expand
    is_terminal: bool,
    /// Children that may intersect the region (up to 4^level_mod)
    children: Vec<Candidate>,
}

#[derive(Debug)]
struct QueueEntry {
    priority: i64,
    seq: Reverse<u64>,
    candidate: Candidate,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Highest priority first; equal priorities pop in insertion order.
        (self.priority, self.seq).cmp(&(other.priority, other.seq))
    }
}

/// State of one covering computation
struct Search<'a> {
    options: CovererOptions,
    region: &'a Region,
    interior: bool,
    queue: BinaryHeap<QueueEntry>,
    result: Vec<CellId>,
    next_seq: u64,
    candidates_created: usize,
}

impl<'a> Search<'a> {
    fn new(options: CovererOptions, region: &'a Region, interior: bool) -> Self {
        Search {
            options,
            region,
            interior,
            queue: BinaryHeap::new(),
            result: Vec::new(),
            next_seq: 0,
            candidates_created: 0,
        }
    }

    fn run(mut self) -> CellUnion {
        if self.region.is_empty() {
            tracing::debug!(interior = self.interior, "Empty region, returning empty covering");
            return CellUnion::default();
        }
        tracing::debug!(
            min_level = self.options.min_level,
            max_level = self.options.max_level,
            level_mod = self.options.level_mod,
            max_cells = self.options.max_cells,
            interior = self.interior,
            "Starting covering"
        );

        self.initial_candidates();
        while let Some(entry) = self.queue.pop() {
            if self.interior && self.result.len() >= self.options.max_cells {
                break;
            }
            let mut candidate = entry.candidate;
            let pending = if self.interior { 0 } else { self.queue.len() };
            if candidate.cell.level() < self.options.min_level
                || candidate.children.len() == 1
                || self.result.len() + pending + candidate.children.len() <= self.options.max_cells
            {
                for child in std::mem::take(&mut candidate.children) {
                    self.add_candidate(child);
                }
            } else if !self.interior {
                candidate.is_terminal = true;
                self.add_candidate(candidate);
            }
        }

        let covering = if self.interior {
            let mut union = CellUnion::from_valid(std::mem::take(&mut self.result));
            union.normalize();
            union
        } else {
            self.normalize_covering()
        };
        tracing::debug!(
            cells = covering.len(),
            candidates_created = self.candidates_created,
            "Covering complete"
        );
        covering
    }

    fn new_candidate(&mut self, cell: Cell) -> Option<Candidate> {
        if !self.region.may_intersect_cell(&cell) {
            return None;
        }
        let mut is_terminal = false;
        let level = cell.level();
        if level >= self.options.min_level {
            let too_deep = level + self.options.level_mod > self.options.max_level;
            if self.interior {
                if self.region.contains_cell(&cell) {
                    is_terminal = true;
                } else if too_deep {
                    return None;
                }
            } else if too_deep || self.region.contains_cell(&cell) {
                is_terminal = true;
            }
        }
        self.candidates_created += 1;
        Some(Candidate {
            cell,
            is_terminal,
            children: Vec::new(),
        })
    }

    #[inline]
    fn max_children_shift(&self) -> u32 {
        2 * self.options.level_mod as u32
    }

    fn add_candidate(&mut self, mut candidate: Candidate) {
        if candidate.is_terminal {
            self.result.push(candidate.cell.id());
            return;
        }

        let num_levels = if candidate.cell.level() < self.options.min_level {
            1
        } else {
            self.options.level_mod
        };
        let cell = candidate.cell;
        let num_terminals = self.expand_children(&mut candidate, &cell, num_levels);
        let shift = self.max_children_shift();
        let num_children = candidate.children.len();

        if num_children == 0 {
            // Nothing below intersects the region.
        } else if !self.interior
            && num_terminals == 1 << shift
            && candidate.cell.level() >= self.options.min_level
        {
            // Every child is terminal, so the cell itself is as good.
            candidate.is_terminal = true;
            candidate.children.clear();
            self.add_candidate(candidate);
        } else {
            let priority = -((((candidate.cell.level() as i64) << shift) + num_children as i64) << shift)
                - num_terminals as i64;
            let seq = Reverse(self.next_seq);
            self.next_seq += 1;
            self.queue.push(QueueEntry {
                priority,
                seq,
                candidate,
            });
        }
    }

    /// Collect descendants `num_levels` below `cell` as children of
    /// `candidate`; returns how many of them are terminal
    fn expand_children(&mut self, candidate: &mut Candidate, cell: &Cell, num_levels: u8) -> usize {
        let num_levels = num_levels - 1;
        let Some(children) = cell.subdivide() else {
            return 0;
        };
        let mut num_terminals = 0;
        for child in children {
            if num_levels > 0 {
                if self.region.may_intersect_cell(&child) {
                    num_terminals += self.expand_children(candidate, &child, num_levels);
                }
                continue;
            }
            if let Some(child) = self.new_candidate(child) {
                if child.is_terminal {
                    num_terminals += 1;
                }
                candidate.children.push(child);
            }
        }
        num_terminals
    }

    fn initial_candidates(&mut self) {
        if self.options.max_cells >= 4 {
            // Start from the cells around the cap centre at the deepest
            // level whose cells are still wider than the cap.
            let cap = self.region.cap_bound();
            let level = MIN_WIDTH
                .max_level(2.0 * cap.angle())
                .min(self.options.max_level)
                .min(MAX_LEVEL - 1);
            let level = self.options.adjust_level(level);
            if level > 0 {
                let id = CellId::from_point(cap.axis());
                if let Ok(neighbors) = id.vertex_neighbors(level) {
                    for nbr in neighbors {
                        if let Some(candidate) = self.new_candidate(Cell::from_valid(nbr)) {
                            self.add_candidate(candidate);
                        }
                    }
                    return;
                }
            }
        }
        for face in CellUnion::whole_sphere().into_cell_ids() {
            if let Some(candidate) = self.new_candidate(Cell::from_valid(face)) {
                self.add_candidate(candidate);
            }
        }
    }

    /// Snap levels to the options, normalize, and coarsen until the
    /// covering fits `max_cells` where the level constraints allow it
    fn normalize_covering(&mut self) -> CellUnion {
        let options = self.options;
        let mut ids = std::mem::take(&mut self.result);
        if options.max_level < MAX_LEVEL || options.level_mod > 1 {
            for id in ids.iter_mut() {
                let level = id.level();
                let new_level = options.adjust_level(level.min(options.max_level));
                if new_level != level {
                    *id = id.parent_unchecked(new_level);
                }
            }
        }

        let mut union = CellUnion::from_valid(ids);
        union.normalize();
        let mut ids = union.denormalize(options.min_level, options.level_mod);

        let mut passes = 0usize;
        while ids.len() > options.max_cells {
            // Merge the adjacent pair with the deepest common ancestor.
            let best = ids
                .windows(2)
                .enumerate()
                .filter_map(|(i, w)| {
                    w[0].common_ancestor_level(w[1])
                        .map(|level| (options.adjust_level(level), i))
                })
                .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
            let Some((mut best_level, best_index)) = best else {
                break;
            };
            if best_level < options.min_level {
                break;
            }
            passes += 1;

            let mut id = ids[best_index].parent_unchecked(best_level);
            replace_cells_with_ancestor(&mut ids, id);
            while best_level > options.min_level {
                best_level -= options.level_mod;
                id = id.parent_unchecked(best_level);
                if !contains_all_children(&ids, id, options.level_mod) {
                    break;
                }
                replace_cells_with_ancestor(&mut ids, id);
            }
        }
        if passes > 0 {
            tracing::trace!(passes, cells = ids.len(), "Coarsened covering");
        }

        let mut union = CellUnion::from_valid(ids);
        union.normalize();
        union
    }
}

/// Replace every cell inside `id` (there is at least one) with `id`
fn replace_cells_with_ancestor(ids: &mut Vec<CellId>, id: CellId) {
    let begin = ids.partition_point(|c| *c < id.range_min());
    let end = ids.partition_point(|c| *c <= id.range_max());
    ids.splice(begin..end, std::iter::once(id));
}

/// True if every child of `id` at `level_mod` levels down is present
fn contains_all_children(ids: &[CellId], id: CellId, level_mod: u8) -> bool {
    let start = ids.partition_point(|c| *c < id.range_min());
    let level = id.level() + level_mod;
    let mut it = ids[start..].iter();
    let mut child = id.child_begin_at(level);
    let end = id.child_end_at(level);
    while child != end {
        if it.next() != Some(&child) {
            return false;
        }
        child = child.next();
    }
    true
}
