//! Map-loading error type.

use std::path::PathBuf;

use thiserror::Error;

use wh_core::{CellId, StationId};

use crate::DomainKind;

/// Errors produced by `wh-grid`.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("map file {path:?} does not exist")]
    FileNotFound { path: PathBuf },

    #[error("map file {path:?} should end with either .grid or .map")]
    UnsupportedExtension { path: PathBuf },

    #[error("malformed map at line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("map declares {expected} cell lines but only {found} are present")]
    Truncated { expected: usize, found: usize },

    #[error("{station} references {cell}, outside the {rows}x{cols} grid")]
    StationOutOfBounds {
        station: StationId,
        cell:    CellId,
        rows:    usize,
        cols:    usize,
    },

    #[error("station configuration needs a Sorting map, not {found:?}")]
    DomainMismatch { found: DomainKind },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    pub(crate) fn malformed(line: u64, reason: impl Into<String>) -> Self {
        MapError::Malformed { line, reason: reason.into() }
    }
}

pub type MapResult<T> = Result<T, MapError>;
