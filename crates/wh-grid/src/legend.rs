//! Octile-style legend map loaders (`.map`).
//!
//! # File format
//!
//! ```text
//! type octile
//! height 4
//! width 4
//! map
//! @@@@
//! @..@
//! @e.@
//! @@@@
//! ```
//!
//! The Kiva and Sorting domains read the same layout but interpret it
//! differently:
//!
//! | Domain    | Padding            | Cell types             | Weights                      |
//! |-----------|--------------------|------------------------|------------------------------|
//! | Kiva      | 1-cell obstacle ring | legend below         | 1 toward passable neighbors  |
//! | Sorting   | none               | raw [`CellType::Tile`] | 1 in every in-grid slot      |
//!
//! Kiva legend:
//!
//! | Char      | Type       | Self cost | List       |
//! |-----------|------------|-----------|------------|
//! | `@`       | `Obstacle` | sentinel  |            |
//! | `e`       | `Endpoint` | 1         | endpoints  |
//! | `r`       | `Home`     | 1         | homes      |
//! | `.` / `G` | `Travel`   | 1         |            |
//! | other     | `Unknown`  | sentinel  |            |
//!
//! Sorting maps have no obstacle glyph: `@` is stored as `Tile('@')` and is
//! as passable as any other tile.
//!
//! Both loaders read the whole body before allocating the grid, so an
//! oversized header fails as truncated rather than exhausting memory.

use std::io::BufRead;
use std::path::PathBuf;

use wh_core::{CellType, Direction, SELF_SLOT};

use crate::graph::{cell_id, grid_cell_count, MAX_CELLS};
use crate::lines::NumberedLines;
use crate::{Domain, DomainKind, GridGraph, GridGraphBuilder, KivaLocations, MapError, MapResult};

// ── Kiva ──────────────────────────────────────────────────────────────────────

/// Parse a Kiva legend map from any `BufRead` source.
pub fn load_kiva_reader<R: BufRead>(reader: R, map_name: PathBuf) -> MapResult<GridGraph> {
    let mut lines = NumberedLines::new(reader);

    lines.next_line("type line")?;
    let (line, text) = lines.next_line("height line")?;
    let height = labelled_value(&text, "height", line)?;
    let (width_line, text) = lines.next_line("width line")?;
    let width = labelled_value(&text, "width", width_line)?;
    lines.next_line("map marker")?;

    let padded = height.checked_add(2).zip(width.checked_add(2));
    let Some((rows, cols)) = padded.filter(|&(r, c)| grid_cell_count(r, c).is_some()) else {
        return Err(MapError::malformed(
            width_line,
            format!("{height}x{width} map exceeds {MAX_CELLS} cells once padded"),
        ));
    };
    let body = read_body(&mut lines, height, width)?;

    let mut builder = GridGraphBuilder::new(rows, cols);
    let mut locations = KivaLocations::default();

    // ── Legend pass ───────────────────────────────────────────────────────
    for (r, glyphs) in body.iter().enumerate() {
        for (c, &glyph) in glyphs.iter().enumerate() {
            let id = (r + 1) * cols + c + 1;
            let kind = kiva_type(glyph);
            builder.set_type(id, kind);
            match kind {
                CellType::Endpoint => locations.endpoints.push(cell_id(id)),
                CellType::Home     => locations.homes.push(cell_id(id)),
                _ => {}
            }
            if matches!(kind, CellType::Endpoint | CellType::Home | CellType::Travel) {
                builder.set_weight(id, SELF_SLOT, 1.0);
            }
        }
    }

    // ── Border ring ───────────────────────────────────────────────────────
    for r in 0..rows {
        builder.set_type(r * cols, CellType::Obstacle);
        builder.set_type(r * cols + cols - 1, CellType::Obstacle);
    }
    for c in 0..cols {
        builder.set_type(c, CellType::Obstacle);
        builder.set_type((rows - 1) * cols + c, CellType::Obstacle);
    }

    // ── Edge pass ─────────────────────────────────────────────────────────
    for id in 0..rows * cols {
        if builder.cell_type(id).is_obstacle() {
            continue;
        }
        for dir in Direction::ALL {
            if builder.passable_neighbor(id, dir).is_some() {
                builder.set_weight(id, dir.index(), 1.0);
            }
        }
    }

    log::info!(
        "map {}: {}x{} with {} endpoints and {} home stations",
        map_name.display(),
        rows,
        cols,
        locations.endpoints.len(),
        locations.homes.len(),
    );
    Ok(builder.build(Domain::Kiva(locations), map_name))
}

fn kiva_type(glyph: char) -> CellType {
    match glyph {
        '@'       => CellType::Obstacle,
        'e'       => CellType::Endpoint,
        'r'       => CellType::Home,
        '.' | 'G' => CellType::Travel,
        _         => CellType::Unknown,
    }
}

// ── Sorting ───────────────────────────────────────────────────────────────────

/// Parse a Sorting legend map from any `BufRead` source.
///
/// Every glyph is kept as [`CellType::Tile`]; induct and eject cells are
/// tagged later by [`GridGraph::with_stations`].
pub fn load_sorting_reader<R: BufRead>(reader: R, map_name: PathBuf) -> MapResult<GridGraph> {
    let mut lines = NumberedLines::new(reader);

    lines.next_line("type line")?;
    let (line, text) = lines.next_line("height line")?;
    let rows = value_after_space(&text, line)?;
    let (width_line, text) = lines.next_line("width line")?;
    let cols = value_after_space(&text, width_line)?;
    lines.next_line("map marker")?;

    if grid_cell_count(rows, cols).is_none() {
        return Err(MapError::malformed(
            width_line,
            format!("{rows}x{cols} map exceeds {MAX_CELLS} cells"),
        ));
    }
    let body = read_body(&mut lines, rows, cols)?;

    let mut builder = GridGraphBuilder::new(rows, cols);
    for (r, glyphs) in body.iter().enumerate() {
        for (c, &glyph) in glyphs.iter().enumerate() {
            builder.set_cell(r * cols + c, CellType::Tile(glyph), [1.0; 5]);
        }
    }
    let blocked = builder.normalize_edges();
    log::debug!("{}: blocked {blocked} boundary edges", map_name.display());

    log::info!("map {}: {}x{} sorting grid", map_name.display(), rows, cols);
    Ok(builder.build(Domain::empty(DomainKind::Sorting), map_name))
}

// ── Body helpers ──────────────────────────────────────────────────────────────

/// `height` body rows of `width` glyphs each; end of file here is truncation.
fn read_body<R: BufRead>(
    lines: &mut NumberedLines<R>,
    height: usize,
    width: usize,
) -> MapResult<Vec<Vec<char>>> {
    let mut rows = Vec::with_capacity(height.min(1 << 12));
    for found in 0..height {
        let (line, text) = lines
            .next()?
            .ok_or(MapError::Truncated { expected: height, found })?;
        rows.push(row_glyphs(&text, width, line)?);
    }
    Ok(rows)
}

fn row_glyphs(body: &str, width: usize, line: u64) -> MapResult<Vec<char>> {
    let glyphs: Vec<char> = body.chars().take(width).collect();
    if glyphs.len() < width {
        return Err(MapError::malformed(
            line,
            format!("expected {width} cells, found {}", glyphs.len()),
        ));
    }
    Ok(glyphs)
}

/// Value following `label` on the line, e.g. `height 32` → 32.
fn labelled_value(text: &str, label: &str, line: u64) -> MapResult<usize> {
    let rest = text
        .find(label)
        .map(|at| &text[at + label.len()..])
        .ok_or_else(|| MapError::malformed(line, format!("expected `{label} <n>`")))?;
    parse_count(rest.trim(), line)
}

/// Value following the first space, e.g. `height 32` → 32.
fn value_after_space(text: &str, line: u64) -> MapResult<usize> {
    let rest = text
        .split_once(' ')
        .map(|(_, rest)| rest)
        .ok_or_else(|| MapError::malformed(line, "expected `<label> <n>`"))?;
    parse_count(rest.trim(), line)
}

fn parse_count(text: &str, line: u64) -> MapResult<usize> {
    match text.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(MapError::malformed(line, format!("invalid dimension {text:?}"))),
    }
}
