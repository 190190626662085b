//! `wh-grid` — warehouse grid graph and map loaders.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`graph`]    | `GridGraph`, `GridGraphBuilder`                               |
//! | [`domain`]   | `Domain`, `DomainKind`, `KivaLocations`, `SortingStations`    |
//! | [`format`]   | `MapFormat`, `load_map` (dispatch by extension)               |
//! | [`weighted`] | `.grid` loader                                                |
//! | [`legend`]   | `.map` loaders for Kiva and Sorting                           |
//! | [`error`]    | `MapError`, `MapResult<T>`                                    |
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::path::Path;
//! use wh_grid::{load_map, DomainKind};
//!
//! let graph = load_map(Path::new("maps/kiva_small.map"), DomainKind::Kiva)?;
//! ```

pub mod domain;
pub mod error;
pub mod format;
pub mod graph;
pub mod legend;
mod lines;
pub mod weighted;

#[cfg(test)]
mod tests;

pub use domain::{Domain, DomainKind, KivaLocations, SortingStations};
pub use error::{MapError, MapResult};
pub use format::{load_map, map_name_of, MapFormat};
pub use graph::{grid_cell_count, move_table, GridGraph, GridGraphBuilder, MAX_CELLS};
pub use legend::{load_kiva_reader, load_sorting_reader};
pub use weighted::load_weighted_reader;
