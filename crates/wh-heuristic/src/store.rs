//! On-disk heuristic table.
//!
//! # File name
//!
//! Derived from the graph's map name and rotation mode:
//!
//! ```text
//! <map_name>_heuristics_table.txt
//! <map_name>_rotation_heuristics_table.txt
//! ```
//!
//! # CSV layout
//!
//! ```csv
//! rows,cols,consider_rotation,entries
//! 6,6,false,2
//! 20,inf,inf,...,0,1,...
//! 14,inf,inf,...,1,0,...
//! ```
//!
//! One line per location: the location's `CellId` followed by `rows*cols`
//! costs.  Costs use Rust's shortest round-trip float formatting, so a reload
//! reproduces the computed values exactly; the sentinel is written as `inf`.
//! Locations are written in ascending order.

use std::ffi::OsString;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};

use wh_core::{CellId, CellType, Cost, HeuristicTable, WEIGHT_MAX};
use wh_grid::GridGraph;

use crate::{HeuristicError, HeuristicResult};

#[derive(Debug, Serialize, Deserialize)]
struct TableHeader {
    rows:              usize,
    cols:              usize,
    consider_rotation: bool,
    entries:           usize,
}

/// Cache file path for a map name and rotation mode.
pub fn table_path(map_name: &Path, consider_rotation: bool) -> PathBuf {
    let mut name = OsString::from(map_name.as_os_str());
    if consider_rotation {
        name.push("_rotation_heuristics_table.txt");
    } else {
        name.push("_heuristics_table.txt");
    }
    PathBuf::from(name)
}

/// Write `table` for `graph` to `path`, replacing any existing file.
pub fn save_table(path: &Path, graph: &GridGraph, table: &HeuristicTable) -> HeuristicResult<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;
    writer.serialize(TableHeader {
        rows:              graph.rows,
        cols:              graph.cols,
        consider_rotation: table.consider_rotation(),
        entries:           table.len(),
    })?;

    let mut fields: Vec<String> = Vec::with_capacity(table.cell_count() + 1);
    for location in table.locations() {
        fields.clear();
        fields.push(location.0.to_string());
        if let Some(costs) = table.get(location) {
            fields.extend(costs.iter().map(|&c| format_cost(c)));
        }
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reload the table at `path` for `graph`.
///
/// Returns `Ok(None)` if the file does not exist.  A file that exists but
/// does not describe `graph` under `consider_rotation` is
/// [`HeuristicError::Corrupt`].  Cell types are **not** checked here; see
/// [`validate_table`].
pub fn load_table(
    path: &Path,
    graph: &GridGraph,
    consider_rotation: bool,
) -> HeuristicResult<Option<HeuristicTable>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader.headers()?.clone();
    let mut records = reader.records();

    let header: TableHeader = match records.next() {
        Some(record) => record?.deserialize(Some(&headers))?,
        None => return Err(HeuristicError::Corrupt("missing table header".into())),
    };
    if (header.rows, header.cols) != (graph.rows, graph.cols) {
        return Err(HeuristicError::Corrupt(format!(
            "table is for a {}x{} map, graph is {}x{}",
            header.rows, header.cols, graph.rows, graph.cols,
        )));
    }
    if header.consider_rotation != consider_rotation {
        return Err(HeuristicError::Corrupt(format!(
            "table was built with consider_rotation = {}",
            header.consider_rotation,
        )));
    }

    let cell_count = graph.cell_count();
    let mut table = HeuristicTable::new(cell_count, consider_rotation);
    for record in records {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != cell_count + 1 {
            return Err(HeuristicError::Corrupt(format!(
                "line {line}: expected {} fields, found {}",
                cell_count + 1,
                record.len(),
            )));
        }
        let location = record[0]
            .parse::<u32>()
            .map(CellId)
            .map_err(|_| HeuristicError::Corrupt(format!("line {line}: bad location {:?}", &record[0])))?;
        if !graph.contains(location) {
            return Err(HeuristicError::Corrupt(format!("line {line}: {location} is outside the map")));
        }
        let costs = record
            .iter()
            .skip(1)
            .map(|field| parse_cost(field, line))
            .collect::<HeuristicResult<Vec<Cost>>>()?;
        table.insert(location, costs);
    }

    if table.len() != header.entries {
        return Err(HeuristicError::Corrupt(format!(
            "header declares {} entries, found {}",
            header.entries,
            table.len(),
        )));
    }
    Ok(Some(table))
}

/// Check that every key of `table` is a special cell of `graph`'s domain.
///
/// Keys are checked in ascending order; the first offender is reported.
pub fn validate_table(graph: &GridGraph, table: &HeuristicTable) -> HeuristicResult<()> {
    for location in table.locations() {
        if !graph.validate_heuristic_entry(location) {
            let found = if graph.contains(location) {
                graph.cell_type(location)
            } else {
                CellType::Unknown
            };
            return Err(HeuristicError::Mismatch { location, found });
        }
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn format_cost(cost: Cost) -> String {
    if cost == WEIGHT_MAX {
        "inf".to_string()
    } else {
        cost.to_string()
    }
}

fn parse_cost(field: &str, line: u64) -> HeuristicResult<Cost> {
    if field == "inf" {
        return Ok(WEIGHT_MAX);
    }
    match field.parse::<Cost>() {
        Ok(c) if c.is_finite() && c >= 0.0 => Ok(c),
        _ => Err(HeuristicError::Corrupt(format!("line {line}: bad cost {field:?}"))),
    }
}
