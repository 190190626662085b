//! Per-location shortest-path heuristics.
//!
//! # Algorithm
//!
//! Dijkstra over the **reversed** grid graph, seeded at the source location:
//! relaxing an edge `u → v` from the settled cell `v` gives the cost of
//! reaching the source from `u`.  One run yields the distance from every cell
//! to the source.
//!
//! # Rotation
//!
//! With `consider_rotation` the search state is `(cell, heading)`:
//!
//! - moving one cell along the current heading costs that directional weight
//!   and keeps the heading;
//! - a quarter turn in place costs the cell's self cost (slot 4); a half turn
//!   is two quarter turns.  Cells whose self cost is the sentinel cannot be
//!   turned on.
//!
//! The source may be reached with any heading, and the reported cost for a
//! cell is the minimum over its four headings, so the table composes with a
//! heading-agnostic caller.
//!
//! Unreachable cells (including obstacles) report [`WEIGHT_MAX`].

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use wh_core::{CellId, Cost, Direction, HeuristicTable, WEIGHT_MAX};
use wh_grid::GridGraph;

// ── Heap entry ────────────────────────────────────────────────────────────────

/// `(cost, state)` ordered by `f64::total_cmp`, then state for deterministic
/// tie-breaking.  Wrapped in `Reverse` to turn `BinaryHeap` into a min-heap.
#[derive(Copy, Clone, Debug)]
struct Entry {
    cost:  Cost,
    state: u32,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then(self.state.cmp(&other.state))
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Minimum cost from every cell of `graph` to `source`.
///
/// The returned vector has one entry per cell; `source` itself is 0.
pub fn compute_heuristics(graph: &GridGraph, source: CellId, consider_rotation: bool) -> Vec<Cost> {
    if !graph.contains(source) {
        return vec![WEIGHT_MAX; graph.cell_count()];
    }
    if consider_rotation {
        rotation_dijkstra(graph, source)
    } else {
        cell_dijkstra(graph, source)
    }
}

/// Heuristic table covering every location in `locations`.
///
/// With the `parallel` feature each location is computed on Rayon's thread
/// pool; the graph is only read.
pub fn compute_all(graph: &GridGraph, locations: &[CellId], consider_rotation: bool) -> HeuristicTable {
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<(CellId, Vec<Cost>)> = locations
        .iter()
        .map(|&loc| (loc, compute_heuristics(graph, loc, consider_rotation)))
        .collect();

    #[cfg(feature = "parallel")]
    let rows: Vec<(CellId, Vec<Cost>)> = {
        use rayon::prelude::*;

        locations
            .par_iter()
            .map(|&loc| (loc, compute_heuristics(graph, loc, consider_rotation)))
            .collect()
    };

    let mut table = HeuristicTable::new(graph.cell_count(), consider_rotation);
    for (loc, costs) in rows {
        table.insert(loc, costs);
    }
    table
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn cell_dijkstra(graph: &GridGraph, source: CellId) -> Vec<Cost> {
    let mut dist = vec![WEIGHT_MAX; graph.cell_count()];
    dist[source.index()] = 0.0;

    let mut heap: BinaryHeap<Reverse<Entry>> = BinaryHeap::new();
    heap.push(Reverse(Entry { cost: 0.0, state: source.0 }));

    while let Some(Reverse(Entry { cost, state })) = heap.pop() {
        let v = CellId(state);
        // Skip stale heap entries.
        if cost > dist[v.index()] {
            continue;
        }

        for dir in Direction::ALL {
            // u steps in `dir` to reach v.
            let Some(u) = graph.neighbor(v, dir.opposite()) else { continue };
            let Some(w) = graph.edge_cost(u, dir) else { continue };
            let next = cost + w;
            if next < dist[u.index()] {
                dist[u.index()] = next;
                heap.push(Reverse(Entry { cost: next, state: u.0 }));
            }
        }
    }
    dist
}

#[inline]
fn state_of(cell: CellId, heading: Direction) -> usize {
    cell.index() * 4 + heading.index()
}

// `cell * 4 + heading` fits in `u32` because grids hold at most
// `wh_grid::MAX_CELLS` cells.
fn rotation_dijkstra(graph: &GridGraph, source: CellId) -> Vec<Cost> {
    let mut dist = vec![WEIGHT_MAX; graph.cell_count() * 4];
    let mut heap: BinaryHeap<Reverse<Entry>> = BinaryHeap::new();

    for heading in Direction::ALL {
        let s = state_of(source, heading);
        dist[s] = 0.0;
        heap.push(Reverse(Entry { cost: 0.0, state: s as u32 }));
    }

    while let Some(Reverse(Entry { cost, state })) = heap.pop() {
        let s = state as usize;
        if cost > dist[s] {
            continue;
        }
        let v = CellId((s / 4) as u32);
        let heading = Direction::from_index(s % 4);

        let mut relax = |pred: usize, w: Cost, heap: &mut BinaryHeap<Reverse<Entry>>| {
            let next = cost + w;
            if next < dist[pred] {
                dist[pred] = next;
                heap.push(Reverse(Entry { cost: next, state: pred as u32 }));
            }
        };

        // Arrived at v by moving along `heading` from the cell behind it.
        if let Some(u) = graph.neighbor(v, heading.opposite()) {
            if let Some(w) = graph.edge_cost(u, heading) {
                relax(state_of(u, heading), w, &mut heap);
            }
        }

        // Turned in place at v from an adjacent heading.
        if let Some(w) = graph.self_cost(v) {
            relax(state_of(v, heading.turn_left()), w, &mut heap);
            relax(state_of(v, heading.turn_right()), w, &mut heap);
        }
    }

    dist.chunks_exact(4)
        .map(|headings| headings.iter().copied().fold(WEIGHT_MAX, Cost::min))
        .collect()
}
