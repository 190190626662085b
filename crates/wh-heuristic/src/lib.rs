//! `wh-heuristic` — shortest-path heuristic tables for warehouse grids.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`engine`]     | `compute_heuristics`, `compute_all` (reverse Dijkstra)     |
//! | [`store`]      | `table_path`, `save_table`, `load_table`, `validate_table` |
//! | [`preprocess`] | `preprocess`, `PreprocessOutcome`                          |
//! | [`config`]     | `PreprocessConfig`, `CachePolicy`, `MismatchPolicy`        |
//! | [`error`]      | `HeuristicError`, `HeuristicResult<T>`                     |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                      |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | One Rayon task per special location (on by default).        |
//!
//! # Usage
//!
//! ```rust,ignore
//! use wh_grid::{load_map, DomainKind};
//! use wh_heuristic::{preprocess, PreprocessConfig};
//!
//! let graph = load_map(path, DomainKind::Kiva)?;
//! preprocess(&graph, &PreprocessConfig::for_domain(DomainKind::Kiva, false))?;
//! let h = graph.heuristics().unwrap();
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod preprocess;
pub mod store;


pub use config::{CachePolicy, MismatchPolicy, PreprocessConfig};
pub use engine::{compute_all, compute_heuristics};
pub use error::{HeuristicError, HeuristicResult};
pub use preprocess::{preprocess, PreprocessOutcome};
pub use store::{load_table, save_table, table_path, validate_table};
