//! Weighted tabular map loader (`.grid`).
//!
//! # File format
//!
//! ```text
//! grid size                                  (ignored)
//! 3,3                                        rows,cols
//! id,type,x,y,right,up,left,down,self        (ignored)
//! 0,Travel,0,0,1,inf,inf,1,1
//! 1,Endpoint,1,0,1,inf,1,1,1
//! ...                                        exactly rows*cols lines
//! ```
//!
//! A weight is either the literal `inf` (blocked edge) or a non-negative real.
//! `Home` cells are appended to the home list and `Endpoint` cells to the
//! endpoint list, in file order.  Fields are comma-separated and
//! whitespace-trimmed; lines past `rows*cols` are ignored.  Header and cell
//! lines sit at fixed positions, so a blank line anywhere before the last
//! cell is malformed.
//!
//! The grid is only allocated once every cell line has been read, so an
//! oversized header costs no more memory than the file itself.

use std::io::BufRead;
use std::path::PathBuf;

use wh_core::{CellType, Cost, CostVector, WEIGHT_MAX};

use crate::graph::{cell_id, grid_cell_count, MAX_CELLS};
use crate::lines::NumberedLines;
use crate::{Domain, DomainKind, GridGraph, GridGraphBuilder, KivaLocations, MapError, MapResult};

/// Number of fields in a cell line: id, type, x, y and five weights.
const CELL_FIELDS: usize = 9;

/// Parse a weighted map from any `BufRead` source.
///
/// Useful for testing (pass a `std::io::Cursor`).  `map_name` is stored
/// verbatim on the resulting graph.
pub fn load_weighted_reader<R: BufRead>(
    reader: R,
    map_name: PathBuf,
    kind: DomainKind,
) -> MapResult<GridGraph> {
    let mut lines = NumberedLines::new(reader);

    // ── Header: skip, rows/cols, skip ─────────────────────────────────────
    header_line(&mut lines, "grid size header")?;
    let (line, text) = header_line(&mut lines, "rows,cols line")?;
    let (rows, cols) = match fields(&text)[..] {
        [r, c, ..] => (parse_dimension(r, line, "rows")?, parse_dimension(c, line, "cols")?),
        _ => return Err(MapError::malformed(line, "expected `rows,cols`")),
    };
    let cell_count = grid_cell_count(rows, cols).ok_or_else(|| {
        MapError::malformed(line, format!("{rows}x{cols} grid exceeds {MAX_CELLS} cells"))
    })?;
    header_line(&mut lines, "column header")?;

    // ── Cell lines ────────────────────────────────────────────────────────
    let mut cells: Vec<(CellType, CostVector)> = Vec::with_capacity(cell_count.min(1 << 16));
    let mut locations = KivaLocations::default();

    for i in 0..cell_count {
        let Some((line, text)) = lines.next()? else {
            return Err(MapError::Truncated { expected: cell_count, found: i });
        };
        let record = fields(&text);
        if record.len() < CELL_FIELDS {
            let reason = if text.trim().is_empty() {
                "blank line".to_string()
            } else {
                format!("expected {CELL_FIELDS} fields, found {}", record.len())
            };
            return Err(MapError::malformed(line, reason));
        }

        let kind = CellType::from_name(record[1]);
        match kind {
            CellType::Home     => locations.homes.push(cell_id(i)),
            CellType::Endpoint => locations.endpoints.push(cell_id(i)),
            _ => {}
        }

        let mut weights: CostVector = [WEIGHT_MAX; 5];
        for (slot, field) in record[4..CELL_FIELDS].iter().enumerate() {
            weights[slot] = parse_weight(field, line)?;
        }
        cells.push((kind, weights));
    }

    let mut builder = GridGraphBuilder::new(rows, cols);
    for (i, (kind, weights)) in cells.into_iter().enumerate() {
        builder.set_cell(i, kind, weights);
    }

    let normalized = builder.normalize_edges();
    if normalized > 0 {
        log::debug!("{}: blocked {normalized} edges leaving the grid or entering obstacles", map_name.display());
    }

    log::info!(
        "map {}: {}x{} with {} endpoints and {} home stations",
        map_name.display(),
        rows,
        cols,
        locations.endpoints.len(),
        locations.homes.len(),
    );

    let domain = match kind {
        DomainKind::Kiva => Domain::Kiva(locations),
        // Sorting stations come from the station configuration, not the map.
        DomainKind::Sorting => Domain::empty(DomainKind::Sorting),
    };
    Ok(builder.build(domain, map_name))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Next header line, which must not be blank.
fn header_line<R: BufRead>(lines: &mut NumberedLines<R>, what: &str) -> MapResult<(u64, String)> {
    let (line, text) = lines.next_line(what)?;
    if text.trim().is_empty() {
        return Err(MapError::malformed(line, format!("blank line, expected {what}")));
    }
    Ok((line, text))
}

fn fields(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(',').map(str::trim).collect()
}

fn parse_dimension(field: &str, line: u64, what: &str) -> MapResult<usize> {
    match field.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(MapError::malformed(line, format!("invalid {what} {field:?}"))),
    }
}

/// `inf` is the sentinel.  Rust's float parser would also accept `inf`,
/// `infinity` and `NaN`, so the literal is checked first and every other
/// non-finite value is rejected.
fn parse_weight(field: &str, line: u64) -> MapResult<Cost> {
    if field == "inf" {
        return Ok(WEIGHT_MAX);
    }
    match field.parse::<Cost>() {
        Ok(w) if w.is_finite() && w >= 0.0 => Ok(w),
        _ => Err(MapError::malformed(line, format!("invalid weight {field:?}"))),
    }
}
