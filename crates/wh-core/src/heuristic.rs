//! Precomputed distance-to-location table.
//!
//! For each special location the table holds a dense array of length
//! `cell_count`: entry `c` is the minimum cost of travelling from cell `c` to
//! that location, or [`WEIGHT_MAX`] when the location cannot be reached.
//! The search consumer treats an entry as an admissible distance estimate.

use rustc_hash::FxHashMap;

use crate::cell::{finite, Cost, WEIGHT_MAX};
use crate::CellId;

/// Per-location shortest-path cost arrays, tagged with the rotation mode they
/// were computed under.
#[derive(Clone, Debug, PartialEq)]
pub struct HeuristicTable {
    consider_rotation: bool,
    cell_count:        usize,
    entries:           FxHashMap<CellId, Vec<Cost>>,
}

impl HeuristicTable {
    pub fn new(cell_count: usize, consider_rotation: bool) -> Self {
        Self {
            consider_rotation,
            cell_count,
            entries: FxHashMap::default(),
        }
    }

    /// Add or replace the cost array for `location`.
    ///
    /// # Panics
    /// Panics if `costs.len() != cell_count`.
    pub fn insert(&mut self, location: CellId, costs: Vec<Cost>) {
        assert_eq!(
            costs.len(),
            self.cell_count,
            "heuristic array for {location} has the wrong length"
        );
        self.entries.insert(location, costs);
    }

    pub fn consider_rotation(&self) -> bool {
        self.consider_rotation
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, location: CellId) -> bool {
        self.entries.contains_key(&location)
    }

    /// Full cost array towards `location`.
    pub fn get(&self, location: CellId) -> Option<&[Cost]> {
        self.entries.get(&location).map(Vec::as_slice)
    }

    /// Cost from `from` to `location`; `None` if either is unknown or the
    /// location is unreachable from `from`.
    #[inline]
    pub fn distance(&self, from: CellId, location: CellId) -> Option<Cost> {
        let row = self.entries.get(&location)?;
        finite(*row.get(from.index()).unwrap_or(&WEIGHT_MAX))
    }

    /// All locations in ascending order.
    pub fn locations(&self) -> Vec<CellId> {
        let mut keys: Vec<CellId> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Iterate `(location, costs)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &[Cost])> + '_ {
        self.entries.iter().map(|(&k, v)| (k, v.as_slice()))
    }
}
