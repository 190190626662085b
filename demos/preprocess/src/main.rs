//! `preprocess` — load a warehouse map and build its heuristic table.
//!
//! Loads a `.grid` or `.map` file, computes (or reloads) the distance table
//! for every special location, and prints a short summary.  Sorting maps
//! take their stations from the command line.
//!
//! Run with:
//!   cargo run -p preprocess --release -- maps/kiva.map kiva
//!   cargo run -p preprocess --release -- maps/sorter.map sorting --rotation \
//!       --induct 1:12 --eject 7:30,31
//!
//! Set `RUST_LOG=debug` for loader and cache details.

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};

use wh_core::{CellId, StationId, WEIGHT_MAX};
use wh_grid::{DomainKind, SortingStations, load_map};
use wh_heuristic::{PreprocessConfig, PreprocessOutcome, preprocess};

// ── Arguments ─────────────────────────────────────────────────────────────────

struct Args {
    map:      PathBuf,
    kind:     DomainKind,
    rotation: bool,
    stations: SortingStations,
}

const USAGE: &str = "usage: preprocess <map> <kiva|sorting> [--rotation] \
                     [--induct ID:CELL]... [--eject ID:CELL,CELL...]...";

fn parse_args() -> Result<Args> {
    let mut it = env::args().skip(1);
    let map = it.next().ok_or_else(|| anyhow!(USAGE))?;
    let kind = match it.next().as_deref() {
        Some("kiva") => DomainKind::Kiva,
        Some("sorting") => DomainKind::Sorting,
        _ => bail!(USAGE),
    };

    let mut args = Args {
        map: map.into(),
        kind,
        rotation: false,
        stations: SortingStations::new(),
    };
    while let Some(flag) = it.next() {
        match flag.as_str() {
            "--rotation" => args.rotation = true,
            "--induct" => {
                let value = it.next().ok_or_else(|| anyhow!("--induct needs ID:CELL"))?;
                let (station, cells) = parse_station(&value)?;
                let [cell] = cells[..] else {
                    bail!("--induct {value}: exactly one cell expected");
                };
                args.stations = args.stations.with_induct(station, cell);
            }
            "--eject" => {
                let value = it.next().ok_or_else(|| anyhow!("--eject needs ID:CELL,..."))?;
                let (station, cells) = parse_station(&value)?;
                args.stations = args.stations.with_eject(station, cells);
            }
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }
    Ok(args)
}

/// `"7:30,31"` → `(StationId(7), [CellId(30), CellId(31)])`.
fn parse_station(value: &str) -> Result<(StationId, Vec<CellId>)> {
    let (id, cells) = value
        .split_once(':')
        .with_context(|| format!("station {value:?} is not ID:CELL"))?;
    let station = StationId(id.trim().parse().with_context(|| format!("station id {id:?}"))?);
    let cells = cells
        .split(',')
        .map(|c| c.trim().parse().map(CellId).with_context(|| format!("cell {c:?}")))
        .collect::<Result<Vec<_>>>()?;
    Ok((station, cells))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let t_load = Instant::now();
    let mut graph = load_map(&args.map, args.kind)
        .with_context(|| format!("loading {}", args.map.display()))?;
    if args.kind == DomainKind::Sorting {
        graph = graph.with_stations(args.stations)?;
    }
    println!(
        "Loaded {} ({}x{}, {} special locations) in {:.3}s",
        args.map.display(),
        graph.rows,
        graph.cols,
        graph.special_locations().len(),
        t_load.elapsed().as_secs_f64(),
    );

    let config = PreprocessConfig::for_domain(args.kind, args.rotation);
    let t_pre = Instant::now();
    let outcome = preprocess(&graph, &config)?;
    match outcome {
        PreprocessOutcome::Reloaded { locations } => {
            println!("Reloaded {locations} heuristic entries");
        }
        PreprocessOutcome::Computed { locations, persisted } => {
            println!("Computed {locations} heuristic entries (persisted: {persisted})");
        }
    }
    println!("Preprocessing took {:.3}s", t_pre.elapsed().as_secs_f64());

    let Some(table) = graph.heuristics() else {
        bail!("no heuristic table installed");
    };
    for location in table.locations().into_iter().take(5) {
        let Some(costs) = table.get(location) else { continue };
        let reachable = costs.iter().filter(|&&c| c != WEIGHT_MAX).count();
        let farthest = costs
            .iter()
            .copied()
            .filter(|&c| c != WEIGHT_MAX)
            .fold(0.0, f64::max);
        println!(
            "  {location:<14} reachable from {reachable:>6} cells, farthest {farthest:.2}",
        );
    }
    Ok(())
}
