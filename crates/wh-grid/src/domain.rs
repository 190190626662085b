//! Warehouse domains: which cells are special, and which cell types a
//! heuristic table may be keyed by.
//!
//! Both domains share one [`GridGraph`](crate::GridGraph); the domain is a
//! tagged variant carried inside it rather than a separate graph type.
//!
//! | Domain    | Special locations                         | Expected types      |
//! |-----------|-------------------------------------------|---------------------|
//! | `Kiva`    | endpoints, then home stations             | `Endpoint`, `Home`  |
//! | `Sorting` | induct cells, then every eject cell       | `Induct`, `Eject`   |

use std::collections::{BTreeMap, HashSet};

use wh_core::{CellId, CellType, StationId};

/// Domain tag without its location data.  Selects the `.map` legend loader.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DomainKind {
    Kiva,
    Sorting,
}

/// Kiva storage/retrieval locations in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KivaLocations {
    pub endpoints: Vec<CellId>,
    pub homes:     Vec<CellId>,
}

/// Sorting-center station layout, supplied by the station configuration.
///
/// `BTreeMap` keeps station iteration (and therefore table computation and
/// logging) in a stable order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SortingStations {
    pub inducts: BTreeMap<StationId, CellId>,
    pub ejects:  BTreeMap<StationId, Vec<CellId>>,
}

impl SortingStations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_induct(mut self, station: StationId, cell: CellId) -> Self {
        self.inducts.insert(station, cell);
        self
    }

    pub fn with_eject(mut self, station: StationId, cells: Vec<CellId>) -> Self {
        self.ejects.insert(station, cells);
        self
    }

    /// Every `(station, cell, type)` triple, inducts first.
    pub(crate) fn cells(&self) -> impl Iterator<Item = (StationId, CellId, CellType)> + '_ {
        let inducts = self
            .inducts
            .iter()
            .map(|(&s, &c)| (s, c, CellType::Induct));
        let ejects = self
            .ejects
            .iter()
            .flat_map(|(&s, cells)| cells.iter().map(move |&c| (s, c, CellType::Eject)));
        inducts.chain(ejects)
    }
}

/// Domain-specific location sets carried by a grid graph.
#[derive(Clone, Debug, PartialEq)]
pub enum Domain {
    Kiva(KivaLocations),
    Sorting(SortingStations),
}

impl Domain {
    /// Empty location sets for `kind`.
    pub fn empty(kind: DomainKind) -> Domain {
        match kind {
            DomainKind::Kiva    => Domain::Kiva(KivaLocations::default()),
            DomainKind::Sorting => Domain::Sorting(SortingStations::default()),
        }
    }

    pub fn kind(&self) -> DomainKind {
        match self {
            Domain::Kiva(_)    => DomainKind::Kiva,
            Domain::Sorting(_) => DomainKind::Sorting,
        }
    }

    /// Locations that need a heuristic entry, first occurrence wins.
    pub fn special_locations(&self) -> Vec<CellId> {
        let all: Vec<CellId> = match self {
            Domain::Kiva(k) => k.endpoints.iter().chain(&k.homes).copied().collect(),
            Domain::Sorting(s) => s
                .inducts
                .values()
                .copied()
                .chain(s.ejects.values().flatten().copied())
                .collect(),
        };
        let mut seen = HashSet::with_capacity(all.len());
        all.into_iter().filter(|c| seen.insert(*c)).collect()
    }

    /// Whether a heuristic table entry may be keyed by a cell of type `t`.
    pub fn expects(&self, t: CellType) -> bool {
        match self {
            Domain::Kiva(_)    => matches!(t, CellType::Home | CellType::Endpoint),
            Domain::Sorting(_) => matches!(t, CellType::Induct | CellType::Eject),
        }
    }
}
