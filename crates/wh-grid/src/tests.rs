//! Unit tests for wh-grid.
//!
//! Fixture maps are written into a temporary directory so the full
//! path → extension → loader route is exercised.

#[cfg(test)]
mod helpers {
    use std::path::{Path, PathBuf};

    use wh_core::{CellId, Direction, WEIGHT_MAX};

    use crate::GridGraph;

    /// 3×3 weighted map.  Cell 2 is an obstacle; cell 3 is the home station
    /// whose line exercises `inf` parsing.
    pub const WEIGHTED: &str = "\
grid size
3,3
id,type,x,y,right,up,left,down,self
0,Travel,0,0,1,inf,inf,1,1
1,Endpoint,1,0,1,inf,1,1,1
2,Obstacle,2,0,1,1,1,1,1
3,Home,1,1,inf,1.5,inf,1,0.5
4,Travel,1,1,1,1,1,1,1
5,Travel,2,1,1,1,1,1,1
6,Travel,0,2,1,1,1,1,1
7,Endpoint,1,2,1,1,1,1,1
8,Travel,2,2,1,1,1,1,1
";

    /// 4×4 Kiva body, padded to 6×6 on load.
    pub const KIVA: &str = "\
type octile
height 4
width 4
map
@@@@
@..@
@e.@
@@@@
";

    /// Kiva body exercising every legend glyph.
    pub const KIVA_LEGEND: &str = "\
type octile
height 2
width 3
map
r.x
Ge@
";

    pub const SORTING: &str = "\
type octile
height 2
width 3
map
.@.
i.e
";

    pub fn tmp() -> tempfile::TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    /// Every finite directional weight must point at a grid-adjacent,
    /// non-obstacle cell, and obstacles must be fully blocked.
    pub fn assert_adjacency_invariants(g: &GridGraph) {
        assert_eq!(g.types.len(), g.rows * g.cols);
        assert_eq!(g.weights.len(), g.rows * g.cols);
        for i in 0..g.cell_count() {
            let cell = CellId(i as u32);
            if g.cell_type(cell).is_obstacle() {
                assert!(g.weights[i].iter().all(|&w| w == WEIGHT_MAX), "{cell} not blocked");
                continue;
            }
            for dir in Direction::ALL {
                if g.weights[i][dir.index()] == WEIGHT_MAX {
                    continue;
                }
                let target = i as isize + g.moves[dir.index()];
                assert!(target >= 0 && (target as usize) < g.cell_count(), "{cell} {dir:?} leaves grid");
                let next = CellId(target as u32);
                assert_eq!(g.manhattan_distance(cell, next), 1, "{cell} {dir:?} wraps a row");
                assert!(!g.cell_type(next).is_obstacle(), "{cell} {dir:?} enters obstacle");
            }
        }
    }
}

// ── Format dispatch ───────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatch {
    use std::path::Path;

    use super::helpers::{tmp, write, KIVA};
    use crate::{load_map, map_name_of, DomainKind, MapError, MapFormat};

    #[test]
    fn extension_selects_format() {
        assert_eq!(MapFormat::from_path(Path::new("a/b.grid")).unwrap(), MapFormat::Weighted);
        assert_eq!(MapFormat::from_path(Path::new("a/b.map")).unwrap(), MapFormat::Legend);
    }

    #[test]
    fn unsupported_extension_rejected_before_io() {
        // The file does not exist; the extension check must fire first.
        let err = load_map(Path::new("/no/such/dir/layout.txt"), DomainKind::Kiva).unwrap_err();
        assert!(matches!(err, MapError::UnsupportedExtension { .. }));
        let err = load_map(Path::new("layout"), DomainKind::Sorting).unwrap_err();
        assert!(matches!(err, MapError::UnsupportedExtension { .. }));
    }

    #[test]
    fn missing_file_reported() {
        let dir = tmp();
        let err = load_map(&dir.path().join("absent.map"), DomainKind::Kiva).unwrap_err();
        assert!(matches!(err, MapError::FileNotFound { .. }));
    }

    #[test]
    fn map_name_strips_final_extension() {
        assert_eq!(map_name_of(Path::new("maps/v1.2/kiva.map")), Path::new("maps/v1.2/kiva"));
        let dir = tmp();
        let path = write(dir.path(), "warehouse.map", KIVA);
        let g = load_map(&path, DomainKind::Kiva).unwrap();
        assert_eq!(g.map_name(), dir.path().join("warehouse"));
    }
}

// ── Weighted loader ───────────────────────────────────────────────────────────

#[cfg(test)]
mod weighted {
    use std::io::Cursor;

    use wh_core::{CellId, CellType, Direction, BLOCKED, WEIGHT_MAX};

    use super::helpers::{assert_adjacency_invariants, tmp, write, WEIGHTED};
    use crate::{load_map, load_weighted_reader, Domain, DomainKind, MapError};

    #[test]
    fn dimensions_and_map_name() {
        let dir = tmp();
        let path = write(dir.path(), "warehouse.grid", WEIGHTED);
        let g = load_map(&path, DomainKind::Kiva).unwrap();
        assert_eq!((g.rows, g.cols), (3, 3));
        assert_eq!(g.types.len(), 9);
        assert_eq!(g.weights.len(), 9);
        assert_eq!(g.moves, [1, -3, -1, 3]);
        assert_eq!(g.map_name(), dir.path().join("warehouse"));
        assert!(g.heuristics().is_none());
    }

    #[test]
    fn inf_is_sentinel_not_a_number() {
        let g = load_weighted_reader(Cursor::new(WEIGHTED), "w".into(), DomainKind::Kiva).unwrap();
        assert_eq!(g.weights[3], [WEIGHT_MAX, 1.5, WEIGHT_MAX, 1.0, 0.5]);
        assert_eq!(g.cell_type(CellId(3)), CellType::Home);
    }

    #[test]
    fn home_and_endpoint_lists_in_file_order() {
        let g = load_weighted_reader(Cursor::new(WEIGHTED), "w".into(), DomainKind::Kiva).unwrap();
        match g.domain() {
            Domain::Kiva(k) => {
                assert_eq!(k.homes, vec![CellId(3)]);
                assert_eq!(k.endpoints, vec![CellId(1), CellId(7)]);
            }
            other => panic!("expected Kiva domain, got {other:?}"),
        }
        assert_eq!(g.special_locations(), vec![CellId(1), CellId(7), CellId(3)]);
    }

    #[test]
    fn obstacle_and_boundary_edges_blocked() {
        let g = load_weighted_reader(Cursor::new(WEIGHTED), "w".into(), DomainKind::Kiva).unwrap();
        assert_eq!(g.weights[2], BLOCKED);
        // Cell 1 → cell 2 (obstacle).
        assert_eq!(g.weights[1][Direction::Right.index()], WEIGHT_MAX);
        // Cell 5 → 6 would wrap from the end of row 1 to the start of row 2.
        assert_eq!(g.weights[5][Direction::Right.index()], WEIGHT_MAX);
        // Column 0 never has a finite left weight.
        for row in 0..3 {
            assert_eq!(g.weights[row * 3][Direction::Left.index()], WEIGHT_MAX);
        }
        assert_adjacency_invariants(&g);
    }

    #[test]
    fn unknown_type_names() {
        let text = WEIGHTED.replace("4,Travel", "4,Shelf");
        let g = load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva).unwrap();
        assert_eq!(g.cell_type(CellId(4)), CellType::Unknown);
    }

    #[test]
    fn truncated_file_detected() {
        let text: String = WEIGHTED.lines().take(11).map(|l| format!("{l}\n")).collect();
        let err = load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva).unwrap_err();
        assert!(matches!(err, MapError::Truncated { expected: 9, found: 8 }), "{err}");
    }

    #[test]
    fn malformed_weight_reports_line() {
        let text = WEIGHTED.replace("4,Travel,1,1,1,1,1,1,1", "4,Travel,1,1,1,abc,1,1,1");
        let err = load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva).unwrap_err();
        match err {
            MapError::Malformed { line, .. } => assert_eq!(line, 8),
            other => panic!("expected Malformed, got {other}"),
        }
    }

    #[test]
    fn non_finite_literals_rejected() {
        for bad in ["infinity", "NaN", "-1"] {
            let text = WEIGHTED.replace("0,Travel,0,0,1,", &format!("0,Travel,0,0,{bad},"));
            let err = load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva);
            assert!(matches!(err, Err(MapError::Malformed { .. })), "{bad} accepted");
        }
    }

    #[test]
    fn short_record_and_bad_dimensions() {
        let text = WEIGHTED.replace("8,Travel,2,2,1,1,1,1,1", "8,Travel,2,2,1");
        let err = load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva).unwrap_err();
        assert!(matches!(err, MapError::Malformed { .. }));

        let text = WEIGHTED.replace("3,3\n", "three,3\n");
        let err = load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva).unwrap_err();
        assert!(matches!(err, MapError::Malformed { line: 2, .. }));

        let err = load_weighted_reader(Cursor::new("grid size\n"), "w".into(), DomainKind::Kiva)
            .unwrap_err();
        assert!(matches!(err, MapError::Malformed { .. }));
    }

    #[test]
    fn oversized_header_is_malformed() {
        for dims in ["4294967296,4294967296", "18446744073709551615,2", "100000,100000"] {
            let text = format!("grid size\n{dims}\nid,type,x,y,right,up,left,down,self\n");
            let err = load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva).unwrap_err();
            assert!(matches!(err, MapError::Malformed { line: 2, .. }), "{dims}: {err}");
        }
    }

    #[test]
    fn large_header_without_body_is_truncated() {
        // Within the size limit; the grid must not be allocated before the
        // body is read.
        let text = "grid size\n30000,30000\nhdr\n0,Travel,0,0,1,1,1,1,1\n";
        let err = load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva).unwrap_err();
        assert!(matches!(err, MapError::Truncated { expected: 900_000_000, found: 1 }), "{err}");
    }

    #[test]
    fn blank_lines_are_malformed() {
        let text = format!("\n{WEIGHTED}");
        let err = load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva).unwrap_err();
        assert!(matches!(err, MapError::Malformed { line: 1, .. }), "{err}");

        let text = WEIGHTED.replace("4,Travel,1,1,1,1,1,1,1\n", "\n4,Travel,1,1,1,1,1,1,1\n");
        let err = load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva).unwrap_err();
        assert!(matches!(err, MapError::Malformed { line: 8, .. }), "{err}");

        // Trailing blank lines after the last cell are harmless.
        let text = format!("{WEIGHTED}\n\n");
        assert!(load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva).is_ok());
    }

    #[test]
    fn spaced_fields_are_trimmed() {
        let text = WEIGHTED.replace("3,Home,1,1,inf,1.5,inf,1,0.5", "3, Home, 1, 1, inf, 1.5, inf, 1, 0.5");
        let g = load_weighted_reader(Cursor::new(text), "w".into(), DomainKind::Kiva).unwrap();
        assert_eq!(g.weights[3], [WEIGHT_MAX, 1.5, WEIGHT_MAX, 1.0, 0.5]);
    }

    #[test]
    fn deterministic_reload() {
        let dir = tmp();
        let path = write(dir.path(), "warehouse.grid", WEIGHTED);
        let a = load_map(&path, DomainKind::Kiva).unwrap();
        let b = load_map(&path, DomainKind::Kiva).unwrap();
        assert_eq!(a, b);
    }
}

// ── Kiva legend loader ────────────────────────────────────────────────────────

#[cfg(test)]
mod kiva {
    use std::io::Cursor;

    use wh_core::{CellId, CellType, Direction, SELF_SLOT, WEIGHT_MAX};

    use super::helpers::{assert_adjacency_invariants, tmp, write, KIVA, KIVA_LEGEND};
    use crate::{load_kiva_reader, load_map, Domain, DomainKind, MapError};

    #[test]
    fn padded_with_obstacle_border() {
        let g = load_kiva_reader(Cursor::new(KIVA), "k".into()).unwrap();
        assert_eq!((g.rows, g.cols), (6, 6));
        for r in 0..g.rows {
            for c in 0..g.cols {
                if r == 0 || c == 0 || r == g.rows - 1 || c == g.cols - 1 {
                    assert_eq!(g.cell_type(g.cell_at(r, c)), CellType::Obstacle, "({r},{c})");
                }
            }
        }
        assert_adjacency_invariants(&g);
    }

    #[test]
    fn endpoint_cell_weights() {
        let g = load_kiva_reader(Cursor::new(KIVA), "k".into()).unwrap();
        // Unpadded (2,1) → padded (3,2).
        let e = g.cell_at(3, 2);
        assert_eq!(e, CellId(20));
        assert_eq!(g.cell_type(e), CellType::Endpoint);
        match g.domain() {
            Domain::Kiva(k) => assert_eq!(k.endpoints, vec![e]),
            other => panic!("expected Kiva domain, got {other:?}"),
        }
        let w = g.weights[e.index()];
        assert_eq!(w[Direction::Right.index()], 1.0); // '.' at (2,2)
        assert_eq!(w[Direction::Up.index()], 1.0); // '.' at (1,1)
        assert_eq!(w[Direction::Left.index()], WEIGHT_MAX); // '@'
        assert_eq!(w[Direction::Down.index()], WEIGHT_MAX); // '@'
        assert_eq!(w[SELF_SLOT], 1.0);
    }

    #[test]
    fn legend_glyphs() {
        let g = load_kiva_reader(Cursor::new(KIVA_LEGEND), "k".into()).unwrap();
        assert_eq!((g.rows, g.cols), (4, 5));
        assert_eq!(g.cell_type(g.cell_at(1, 1)), CellType::Home);
        assert_eq!(g.cell_type(g.cell_at(1, 2)), CellType::Travel);
        assert_eq!(g.cell_type(g.cell_at(1, 3)), CellType::Unknown);
        assert_eq!(g.cell_type(g.cell_at(2, 1)), CellType::Travel);
        assert_eq!(g.cell_type(g.cell_at(2, 2)), CellType::Endpoint);
        assert_eq!(g.cell_type(g.cell_at(2, 3)), CellType::Obstacle);

        // Unknown cells have no self cost but keep edges toward open neighbors.
        let x = g.cell_at(1, 3);
        assert_eq!(g.self_cost(x), None);
        assert_eq!(g.edge_cost(x, Direction::Left), Some(1.0));
        assert_eq!(g.edge_cost(x, Direction::Down), None);
        assert_eq!(g.self_cost(g.cell_at(1, 1)), Some(1.0));

        assert_eq!(g.special_locations(), vec![g.cell_at(2, 2), g.cell_at(1, 1)]);
        assert_adjacency_invariants(&g);
    }

    #[test]
    fn truncated_body() {
        let text = KIVA.replace("@@@@\n@..@\n@e.@\n@@@@\n", "@@@@\n@..@\n");
        let err = load_kiva_reader(Cursor::new(text), "k".into()).unwrap_err();
        assert!(matches!(err, MapError::Truncated { expected: 4, found: 2 }), "{err}");
    }

    #[test]
    fn short_row_is_malformed() {
        let text = KIVA.replace("@..@", "@.");
        let err = load_kiva_reader(Cursor::new(text), "k".into()).unwrap_err();
        assert!(matches!(err, MapError::Malformed { line: 6, .. }), "{err}");
    }

    #[test]
    fn bad_header() {
        let text = KIVA.replace("height 4", "rows four");
        let err = load_kiva_reader(Cursor::new(text), "k".into()).unwrap_err();
        assert!(matches!(err, MapError::Malformed { line: 2, .. }), "{err}");
    }

    #[test]
    fn oversized_header_is_malformed() {
        let text = KIVA.replace("height 4", "height 18446744073709551615");
        let err = load_kiva_reader(Cursor::new(text), "k".into()).unwrap_err();
        assert!(matches!(err, MapError::Malformed { line: 3, .. }), "{err}");

        let text = KIVA.replace("height 4", "height 100000").replace("width 4", "width 100000");
        let err = load_kiva_reader(Cursor::new(text), "k".into()).unwrap_err();
        assert!(matches!(err, MapError::Malformed { line: 3, .. }), "{err}");
    }

    #[test]
    fn large_header_without_body_is_truncated() {
        // Within the size limit; the first short body row fails before the
        // grid is allocated.
        let text = KIVA.replace("height 4", "height 30000").replace("width 4", "width 30000");
        let err = load_kiva_reader(Cursor::new(text), "k".into()).unwrap_err();
        assert!(matches!(err, MapError::Malformed { line: 5, .. }), "{err}");

        let text = KIVA.replace("height 4", "height 30000");
        let err = load_kiva_reader(Cursor::new(text), "k".into()).unwrap_err();
        assert!(matches!(err, MapError::Truncated { expected: 30000, found: 4 }), "{err}");
    }

    #[test]
    fn crlf_line_endings() {
        let text = KIVA.replace('\n', "\r\n");
        let a = load_kiva_reader(Cursor::new(text), "k".into()).unwrap();
        let b = load_kiva_reader(Cursor::new(KIVA), "k".into()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn deterministic_reload() {
        let dir = tmp();
        let path = write(dir.path(), "k.map", KIVA_LEGEND);
        assert_eq!(
            load_map(&path, DomainKind::Kiva).unwrap(),
            load_map(&path, DomainKind::Kiva).unwrap(),
        );
    }
}

// ── Sorting legend loader & stations ──────────────────────────────────────────

#[cfg(test)]
mod sorting {
    use std::io::Cursor;

    use wh_core::{CellId, CellType, Direction, StationId, WEIGHT_MAX};

    use super::helpers::{assert_adjacency_invariants, KIVA, SORTING};
    use crate::{load_kiva_reader, load_sorting_reader, DomainKind, MapError, SortingStations};

    #[test]
    fn raw_tiles_and_uniform_weights() {
        let g = load_sorting_reader(Cursor::new(SORTING), "s".into()).unwrap();
        assert_eq!((g.rows, g.cols), (2, 3));
        assert_eq!(g.domain().kind(), DomainKind::Sorting);
        assert_eq!(g.cell_type(CellId(1)), CellType::Tile('@'));
        assert_eq!(g.cell_type(CellId(3)), CellType::Tile('i'));
        // In-grid slots carry the uniform cost, including toward '@'.
        assert_eq!(g.weights[4], [1.0, 1.0, 1.0, WEIGHT_MAX, 1.0]);
        // Boundary slots are blocked.
        assert_eq!(g.weights[0], [1.0, WEIGHT_MAX, WEIGHT_MAX, 1.0, 1.0]);
        assert_eq!(g.weights[2][Direction::Right.index()], WEIGHT_MAX);
        assert_eq!(g.edge_cost(CellId(2), Direction::Right), None);
        assert!(g.special_locations().is_empty());
        assert_adjacency_invariants(&g);
    }

    #[test]
    fn stations_retag_cells() {
        let g = load_sorting_reader(Cursor::new(SORTING), "s".into()).unwrap();
        let stations = SortingStations::new()
            .with_induct(StationId(0), CellId(3))
            .with_eject(StationId(1), vec![CellId(5), CellId(2)]);
        let g = g.with_stations(stations).unwrap();
        assert_eq!(g.cell_type(CellId(3)), CellType::Induct);
        assert_eq!(g.cell_type(CellId(5)), CellType::Eject);
        assert_eq!(g.cell_type(CellId(2)), CellType::Eject);
        assert_eq!(g.special_locations(), vec![CellId(3), CellId(5), CellId(2)]);
        assert!(g.validate_heuristic_entry(CellId(3)));
        assert!(!g.validate_heuristic_entry(CellId(0)));
        assert!(!g.validate_heuristic_entry(CellId(99)));
    }

    #[test]
    fn oversized_header_is_malformed() {
        let text = SORTING.replace("height 2", "height 100000").replace("width 3", "width 100000");
        let err = load_sorting_reader(Cursor::new(text), "s".into()).unwrap_err();
        assert!(matches!(err, MapError::Malformed { line: 3, .. }), "{err}");

        let text = SORTING.replace("height 2", "height 30000");
        let err = load_sorting_reader(Cursor::new(text), "s".into()).unwrap_err();
        assert!(matches!(err, MapError::Truncated { expected: 30000, found: 2 }), "{err}");
    }

    #[test]
    fn reconfiguring_stations_restores_old_cells() {
        let g = load_sorting_reader(Cursor::new(SORTING), "s".into()).unwrap();
        let g = g
            .with_stations(
                SortingStations::new()
                    .with_induct(StationId(0), CellId(3))
                    .with_eject(StationId(1), vec![CellId(5), CellId(5)]),
            )
            .unwrap();
        let g = g
            .with_stations(SortingStations::new().with_induct(StationId(0), CellId(4)))
            .unwrap();

        assert_eq!(g.special_locations(), vec![CellId(4)]);
        assert_eq!(g.cell_type(CellId(4)), CellType::Induct);
        assert_eq!(g.cell_type(CellId(3)), CellType::Tile('i'));
        assert_eq!(g.cell_type(CellId(5)), CellType::Tile('e'));
        assert!(!g.validate_heuristic_entry(CellId(3)));
        assert!(!g.validate_heuristic_entry(CellId(5)));

        // Back to no stations: the map is as loaded.
        let g = g.with_stations(SortingStations::new()).unwrap();
        assert_eq!(g, load_sorting_reader(Cursor::new(SORTING), "s".into()).unwrap());
    }

    #[test]
    fn rejected_configuration_leaves_no_tags() {
        let g = load_sorting_reader(Cursor::new(SORTING), "s".into()).unwrap();
        let stations = SortingStations::new()
            .with_induct(StationId(0), CellId(3))
            .with_eject(StationId(1), vec![CellId(9)]);
        assert!(g.clone().with_stations(stations).is_err());
        assert_eq!(g.cell_type(CellId(3)), CellType::Tile('i'));
    }

    #[test]
    fn station_out_of_bounds() {
        let g = load_sorting_reader(Cursor::new(SORTING), "s".into()).unwrap();
        let stations = SortingStations::new().with_eject(StationId(4), vec![CellId(6)]);
        let err = g.with_stations(stations).unwrap_err();
        assert!(matches!(err, MapError::StationOutOfBounds { cell: CellId(6), .. }), "{err}");
    }

    #[test]
    fn stations_need_sorting_domain() {
        let g = load_kiva_reader(Cursor::new(KIVA), "k".into()).unwrap();
        let err = g.with_stations(SortingStations::new()).unwrap_err();
        assert!(matches!(err, MapError::DomainMismatch { found: DomainKind::Kiva }));
    }

    #[test]
    fn shared_eject_cell_listed_once() {
        let g = load_sorting_reader(Cursor::new(SORTING), "s".into()).unwrap();
        let stations = SortingStations::new()
            .with_eject(StationId(0), vec![CellId(5)])
            .with_eject(StationId(1), vec![CellId(5), CellId(0)]);
        let g = g.with_stations(stations).unwrap();
        assert_eq!(g.special_locations(), vec![CellId(5), CellId(0)]);
    }
}

// ── Heuristic install ─────────────────────────────────────────────────────────

#[cfg(test)]
mod install {
    use std::io::Cursor;

    use wh_core::{CellId, HeuristicTable};

    use super::helpers::KIVA;
    use crate::load_kiva_reader;

    #[test]
    fn installs_once() {
        let g = load_kiva_reader(Cursor::new(KIVA), "k".into()).unwrap();
        assert_eq!(g.consider_rotation(), None);

        let mut t = HeuristicTable::new(g.cell_count(), true);
        t.insert(CellId(20), vec![0.0; g.cell_count()]);
        assert!(g.install_heuristics(t.clone()).is_ok());
        assert_eq!(g.consider_rotation(), Some(true));
        assert_eq!(g.install_heuristics(t).unwrap_err().len(), 1);
        assert!(g.heuristics().unwrap().contains(CellId(20)));
    }
}
