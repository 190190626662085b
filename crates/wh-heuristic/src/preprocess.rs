//! Preprocessing: reload or compute the heuristic table and install it on
//! the graph.
//!
//! # Flow
//!
//! ```text
//! table_path(map_name, rotation)
//!   ├─ reuse && file usable ──► validate? ──ok──► install (Reloaded)
//!   │                              └─mismatch──► Fail → Err(Mismatch)
//!   │                                            Recompute ─┐
//!   └─ absent / corrupt / stale ────────────────────────────┴─► compute_all
//!                                                  ─► persist? ─► install (Computed)
//! ```
//!
//! A reloaded table that misses any of the graph's special locations is
//! treated as stale and recomputed, so a successful return always covers
//! every special location.

use std::time::Instant;

use wh_core::HeuristicTable;
use wh_grid::GridGraph;

use crate::config::{MismatchPolicy, PreprocessConfig};
use crate::engine::compute_all;
use crate::store::{load_table, save_table, table_path, validate_table};
use crate::{HeuristicError, HeuristicResult};

/// How the installed table was obtained.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PreprocessOutcome {
    /// Loaded from the cache file.
    Reloaded { locations: usize },
    /// Computed from scratch; `persisted` is true if the cache file was
    /// written successfully.
    Computed { locations: usize, persisted: bool },
}

/// Populate `graph`'s heuristic table according to `config`.
///
/// # Errors
///
/// - [`HeuristicError::AlreadyInstalled`] if the graph already has a table.
/// - [`HeuristicError::Mismatch`] if validation is enabled, the reloaded
///   table is keyed by a non-special cell, and the policy is
///   [`MismatchPolicy::Fail`].
///
/// An unreadable or stale cache file is never an error; it is logged and the
/// table is recomputed.  Neither is a failed write: the computed table is
/// still installed and the outcome reports `persisted: false`.
pub fn preprocess(graph: &GridGraph, config: &PreprocessConfig) -> HeuristicResult<PreprocessOutcome> {
    if graph.heuristics().is_some() {
        return Err(HeuristicError::AlreadyInstalled);
    }
    let started = Instant::now();
    let rotation = config.consider_rotation;
    let path = table_path(graph.map_name(), rotation);
    let locations = graph.special_locations();

    // ── Reload ────────────────────────────────────────────────────────────
    if config.cache.reuse {
        if let Some(table) = reload(graph, config, &path, &locations)? {
            let count = table.len();
            install(graph, table)?;
            log::info!(
                "{}: reloaded {count} heuristic entries from {} in {:?}",
                graph.map_name().display(),
                path.display(),
                started.elapsed(),
            );
            return Ok(PreprocessOutcome::Reloaded { locations: count });
        }
    }

    // ── Compute ───────────────────────────────────────────────────────────
    let table = compute_all(graph, &locations, rotation);
    let count = table.len();
    log::info!(
        "{}: computed {count} heuristic entries (rotation = {rotation}) in {:?}",
        graph.map_name().display(),
        started.elapsed(),
    );

    let persisted = config.cache.persist
        && match save_table(&path, graph, &table) {
            Ok(()) => {
                log::debug!("saved heuristic table to {}", path.display());
                true
            }
            Err(e) => {
                log::warn!("could not write heuristic table {}: {e}", path.display());
                false
            }
        };

    install(graph, table)?;
    Ok(PreprocessOutcome::Computed { locations: count, persisted })
}

/// `Ok(Some)` for a usable table, `Ok(None)` when the caller should compute.
fn reload(
    graph: &GridGraph,
    config: &PreprocessConfig,
    path: &std::path::Path,
    locations: &[wh_core::CellId],
) -> HeuristicResult<Option<HeuristicTable>> {
    let table = match load_table(path, graph, config.consider_rotation) {
        Ok(Some(table)) => table,
        Ok(None) => return Ok(None),
        Err(e) => {
            log::warn!("ignoring heuristic table {}: {e}", path.display());
            return Ok(None);
        }
    };

    if config.cache.validate {
        if let Err(e) = validate_table(graph, &table) {
            match config.cache.on_mismatch {
                MismatchPolicy::Fail => return Err(e),
                MismatchPolicy::Recompute => {
                    log::warn!("{e}; recomputing {}", path.display());
                    return Ok(None);
                }
            }
        }
    }

    if let Some(missing) = locations.iter().find(|&&loc| !table.contains(loc)) {
        log::warn!(
            "heuristic table {} has no entry for {missing}; recomputing",
            path.display(),
        );
        return Ok(None);
    }
    Ok(Some(table))
}

fn install(graph: &GridGraph, table: HeuristicTable) -> HeuristicResult<()> {
    graph
        .install_heuristics(table)
        .map_err(|_| HeuristicError::AlreadyInstalled)
}
