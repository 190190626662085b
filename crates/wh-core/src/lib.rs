//! `wh-core` — foundational types for the warehouse grid planner.
//!
//! This crate is a dependency of every other `wh-*` crate.  It has no `wh-*`
//! dependencies and a single external one (`rustc-hash`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`ids`]       | `CellId`, `StationId`                                     |
//! | [`cell`]      | `CellType`, `Direction`, `Cost`, `CostVector`, `WEIGHT_MAX` |
//! | [`heuristic`] | `HeuristicTable`                                          |

pub mod cell;
pub mod heuristic;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{finite, CellType, Cost, CostVector, Direction, BLOCKED, SELF_SLOT, WEIGHT_MAX};
pub use heuristic::HeuristicTable;
pub use ids::{CellId, StationId};
