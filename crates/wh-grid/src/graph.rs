//! Grid graph representation and builder.
//!
//! # Data layout
//!
//! Cells are stored row-major in flat arrays indexed by [`CellId`]:
//!
//! ```text
//! id = row * cols + col
//! ```
//!
//! Neighbors are found by adding `moves[d]` to the index.  Index arithmetic
//! alone would let the last column of one row "see" the first column of the
//! next, so every neighbor query also requires a grid Manhattan distance of
//! exactly 1 between the two cells.
//!
//! # Heuristic cache
//!
//! The graph owns the heuristic table but never computes it.  `wh-heuristic`
//! installs it exactly once through [`GridGraph::install_heuristics`]; after
//! that the graph is read-only for its whole lifetime.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use wh_core::{
    finite, CellId, CellType, Cost, CostVector, Direction, HeuristicTable, BLOCKED, SELF_SLOT,
    WEIGHT_MAX,
};

use crate::domain::{Domain, SortingStations};
use crate::{MapError, MapResult};

// ── Index arithmetic ──────────────────────────────────────────────────────────

/// Largest supported grid.  Cell ids are `u32` and the rotation search packs
/// `(cell, heading)` into one `u32`, so four states per cell must fit.
pub const MAX_CELLS: usize = u32::MAX as usize / 4;

/// `rows * cols`, or `None` if it overflows or exceeds [`MAX_CELLS`].
#[inline]
pub fn grid_cell_count(rows: usize, cols: usize) -> Option<usize> {
    rows.checked_mul(cols).filter(|&n| n <= MAX_CELLS)
}

/// Direction offsets `{+1, -cols, -1, +cols}` in [`Direction`] order.
#[inline]
pub fn move_table(cols: usize) -> [isize; 4] {
    let c = cols as isize;
    [1, -c, -1, c]
}

/// Neighbor of `cell` in direction `dir`, or `None` if the step leaves the
/// grid or wraps across a row boundary.
#[inline]
fn step(rows: usize, cols: usize, cell: usize, dir: Direction) -> Option<usize> {
    let target = cell as isize + move_table(cols)[dir.index()];
    if target < 0 || target as usize >= rows * cols {
        return None;
    }
    let target = target as usize;
    (manhattan(cols, cell, target) == 1).then_some(target)
}

#[inline]
fn manhattan(cols: usize, a: usize, b: usize) -> usize {
    let (ar, ac) = (a / cols, a % cols);
    let (br, bc) = (b / cols, b % cols);
    ar.abs_diff(br) + ac.abs_diff(bc)
}

// ── GridGraph ─────────────────────────────────────────────────────────────────

/// 4-connected weighted directed grid plus its domain-specific locations.
///
/// `rows`, `cols`, `moves`, `types` and `weights` are `pub` for direct indexed
/// access on the search consumer's hot path.  Do not construct directly; use
/// a loader from [`crate::format`] or [`GridGraphBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct GridGraph {
    pub rows: usize,
    pub cols: usize,

    /// `{+1, -cols, -1, +cols}`: right, up, left, down.
    pub moves: [isize; 4],

    /// Role of each cell.  Indexed by `CellId`.
    pub types: Vec<CellType>,

    /// Directional and self costs of each cell.  Indexed by `CellId`.
    pub weights: Vec<CostVector>,

    domain:     Domain,
    map_name:   PathBuf,
    heuristics: OnceLock<HeuristicTable>,

    /// Types the current station configuration overwrote, in tagging order.
    retagged: Vec<(CellId, CellType)>,
}

impl GridGraph {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn cell_count(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn cell_at(&self, row: usize, col: usize) -> CellId {
        cell_id(row * self.cols + col)
    }

    #[inline]
    pub fn coords(&self, cell: CellId) -> (usize, usize) {
        (cell.index() / self.cols, cell.index() % self.cols)
    }

    pub fn contains(&self, cell: CellId) -> bool {
        cell.index() < self.cell_count()
    }

    /// Grid (row, col) Manhattan distance between two cells.
    #[inline]
    pub fn manhattan_distance(&self, a: CellId, b: CellId) -> usize {
        manhattan(self.cols, a.index(), b.index())
    }

    // ── Cell queries ──────────────────────────────────────────────────────

    #[inline]
    pub fn cell_type(&self, cell: CellId) -> CellType {
        self.types[cell.index()]
    }

    /// Grid-adjacent cell in direction `dir`, ignoring cell types and costs.
    #[inline]
    pub fn neighbor(&self, cell: CellId, dir: Direction) -> Option<CellId> {
        step(self.rows, self.cols, cell.index(), dir).map(cell_id)
    }

    /// Cost of the directed edge `cell → neighbor(cell, dir)`.
    ///
    /// `None` when the edge weight is the sentinel, the step leaves the grid
    /// or wraps a row, or either end is an obstacle.  The structural checks
    /// are repeated here because Sorting maps carry a unit weight in every
    /// slot.
    #[inline]
    pub fn edge_cost(&self, cell: CellId, dir: Direction) -> Option<Cost> {
        if self.cell_type(cell).is_obstacle() {
            return None;
        }
        let next = self.neighbor(cell, dir)?;
        if self.cell_type(next).is_obstacle() {
            return None;
        }
        finite(self.weights[cell.index()][dir.index()])
    }

    /// Cost of waiting or turning at `cell`; `None` for the sentinel.
    #[inline]
    pub fn self_cost(&self, cell: CellId) -> Option<Cost> {
        if self.cell_type(cell).is_obstacle() {
            return None;
        }
        finite(self.weights[cell.index()][SELF_SLOT])
    }

    // ── Domain ────────────────────────────────────────────────────────────

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Map file path with its extension removed.  Cache file names derive
    /// from it.
    pub fn map_name(&self) -> &Path {
        &self.map_name
    }

    /// Every location the heuristic table must cover, deduplicated, in the
    /// domain's natural order.
    pub fn special_locations(&self) -> Vec<CellId> {
        self.domain.special_locations()
    }

    /// `true` if `location` is inside the grid and carries one of the
    /// domain's special cell types.
    pub fn validate_heuristic_entry(&self, location: CellId) -> bool {
        self.contains(location) && self.domain.expects(self.cell_type(location))
    }

    /// Apply a Sorting station configuration, tagging each listed cell as
    /// `Induct` or `Eject`.  Weights are left untouched.
    ///
    /// Cells tagged by a previous configuration get their loaded type back
    /// first, so only the new stations validate as special locations.
    pub fn with_stations(mut self, stations: SortingStations) -> MapResult<GridGraph> {
        if !matches!(self.domain, Domain::Sorting(_)) {
            return Err(MapError::DomainMismatch { found: self.domain.kind() });
        }
        if let Some((station, cell, _)) = stations.cells().find(|&(_, c, _)| !self.contains(c)) {
            return Err(MapError::StationOutOfBounds {
                station,
                cell,
                rows: self.rows,
                cols: self.cols,
            });
        }

        // Unwind in reverse so a cell tagged twice ends on its loaded type.
        for (cell, loaded) in self.retagged.drain(..).rev() {
            self.types[cell.index()] = loaded;
        }
        for (_, cell, kind) in stations.cells() {
            let previous = std::mem::replace(&mut self.types[cell.index()], kind);
            self.retagged.push((cell, previous));
        }

        log::debug!(
            "{}: configured {} induct and {} eject stations",
            self.map_name.display(),
            stations.inducts.len(),
            stations.ejects.len(),
        );
        self.domain = Domain::Sorting(stations);
        Ok(self)
    }

    // ── Heuristics ────────────────────────────────────────────────────────

    pub fn heuristics(&self) -> Option<&HeuristicTable> {
        self.heuristics.get()
    }

    /// Rotation mode the installed table was built under, if any.
    pub fn consider_rotation(&self) -> Option<bool> {
        self.heuristics.get().map(HeuristicTable::consider_rotation)
    }

    /// Install the heuristic table.  Succeeds once; a second call hands the
    /// rejected table back.
    pub fn install_heuristics(&self, table: HeuristicTable) -> Result<(), HeuristicTable> {
        self.heuristics.set(table)
    }
}

/// Id of an in-grid cell.  Grids never exceed [`MAX_CELLS`], so every index
/// fits; anything else maps to [`CellId::INVALID`].
#[inline]
pub(crate) fn cell_id(index: usize) -> CellId {
    CellId::from_index(index).unwrap_or(CellId::INVALID)
}

// ── GridGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`GridGraph`] cell by cell, then call [`build`](Self::build).
///
/// Every cell starts as `Unknown` with an all-sentinel cost vector.
///
/// # Example
///
/// ```
/// use wh_core::{CellType, Direction};
/// use wh_grid::{Domain, GridGraphBuilder, KivaLocations};
///
/// let mut b = GridGraphBuilder::new(1, 2);
/// b.set_cell(0, CellType::Travel, [1.0; 5]);
/// b.set_cell(1, CellType::Travel, [1.0; 5]);
/// b.normalize_edges();
/// let g = b.build(Domain::Kiva(KivaLocations::default()), "demo".into());
/// assert_eq!(g.edge_cost(g.cell_at(0, 0), Direction::Right), Some(1.0));
/// assert_eq!(g.edge_cost(g.cell_at(0, 0), Direction::Left), None);
/// ```
pub struct GridGraphBuilder {
    rows:    usize,
    cols:    usize,
    types:   Vec<CellType>,
    weights: Vec<CostVector>,
}

impl GridGraphBuilder {
    /// # Panics
    /// Panics if the grid has more than [`MAX_CELLS`] cells.  Loaders check
    /// header dimensions with [`grid_cell_count`] before calling this.
    pub fn new(rows: usize, cols: usize) -> Self {
        let Some(count) = grid_cell_count(rows, cols) else {
            panic!("{rows}x{cols} grid exceeds {MAX_CELLS} cells");
        };
        Self {
            rows,
            cols,
            types:   vec![CellType::Unknown; count],
            weights: vec![BLOCKED; count],
        }
    }

    pub fn cell_count(&self) -> usize {
        self.types.len()
    }

    pub fn set_cell(&mut self, cell: usize, kind: CellType, weights: CostVector) {
        self.types[cell] = kind;
        self.weights[cell] = weights;
    }

    pub fn set_type(&mut self, cell: usize, kind: CellType) {
        self.types[cell] = kind;
    }

    pub fn set_weight(&mut self, cell: usize, slot: usize, cost: Cost) {
        self.weights[cell][slot] = cost;
    }

    pub fn cell_type(&self, cell: usize) -> CellType {
        self.types[cell]
    }

    /// Grid-adjacent neighbor of `cell` that is not an obstacle.
    pub fn passable_neighbor(&self, cell: usize, dir: Direction) -> Option<usize> {
        step(self.rows, self.cols, cell, dir).filter(|&n| !self.types[n].is_obstacle())
    }

    /// Enforce the adjacency invariants: obstacles get an all-sentinel vector,
    /// and any finite directional weight pointing off the grid, across a row
    /// boundary, or into an obstacle becomes the sentinel.
    ///
    /// Returns the number of directional weights that were changed.
    pub fn normalize_edges(&mut self) -> usize {
        let mut changed = 0;
        for cell in 0..self.cell_count() {
            if self.types[cell].is_obstacle() {
                changed += self.weights[cell][..SELF_SLOT]
                    .iter()
                    .filter(|&&w| w != WEIGHT_MAX)
                    .count();
                self.weights[cell] = BLOCKED;
                continue;
            }
            for dir in Direction::ALL {
                let slot = dir.index();
                if self.weights[cell][slot] != WEIGHT_MAX
                    && self.passable_neighbor(cell, dir).is_none()
                {
                    self.weights[cell][slot] = WEIGHT_MAX;
                    changed += 1;
                }
            }
        }
        changed
    }

    pub fn build(self, domain: Domain, map_name: PathBuf) -> GridGraph {
        debug_assert_eq!(self.types.len(), self.weights.len());
        GridGraph {
            rows:       self.rows,
            cols:       self.cols,
            moves:      move_table(self.cols),
            types:      self.types,
            weights:    self.weights,
            domain,
            map_name,
            heuristics: OnceLock::new(),
            retagged:   Vec::new(),
        }
    }
}
