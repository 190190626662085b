//! Heuristic-subsystem error type.

use thiserror::Error;

use wh_core::{CellId, CellType};

/// Errors produced by `wh-heuristic`.
#[derive(Debug, Error)]
pub enum HeuristicError {
    /// A reloaded table is keyed by a cell the current map does not treat as
    /// a special location.  Either the table or the map is wrong; the caller
    /// decides whether to abort or recompute.
    #[error("heuristic table does not match the map: {location} is a {found} cell")]
    Mismatch { location: CellId, found: CellType },

    /// The cache file exists but cannot be used (bad syntax, other map
    /// dimensions, other rotation mode, missing locations).
    #[error("unusable heuristic table: {0}")]
    Corrupt(String),

    #[error("heuristics already installed on this graph")]
    AlreadyInstalled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type HeuristicResult<T> = Result<T, HeuristicError>;
