//! Cell model: type tags, directions, and the per-cell cost vector.
//!
//! # Cost vector layout
//!
//! | Slot | Meaning                                      |
//! |------|----------------------------------------------|
//! | 0    | move right (`+1`)                            |
//! | 1    | move up (`-cols`)                            |
//! | 2    | move left (`-1`)                             |
//! | 3    | move down (`+cols`)                          |
//! | 4    | wait / turn in place ([`SELF_SLOT`])         |
//!
//! A blocked or absent edge holds [`WEIGHT_MAX`].  The sentinel is only ever
//! compared by equality; use [`finite`] to turn a slot into an `Option<Cost>`
//! before doing arithmetic.

use std::fmt;

/// Edge and self cost.  Weighted maps carry fractional costs.
pub type Cost = f64;

/// "Infinite" cost marking an absent or impassable edge.
pub const WEIGHT_MAX: Cost = f64::MAX;

/// Index of the wait / turn cost in a [`CostVector`].
pub const SELF_SLOT: usize = 4;

/// Four directional costs followed by the self cost.
pub type CostVector = [Cost; 5];

/// A cost vector with every slot blocked.  Obstacle cells carry exactly this.
pub const BLOCKED: CostVector = [WEIGHT_MAX; 5];

/// `Some(cost)` unless `cost` is the blocked sentinel.
#[inline]
pub fn finite(cost: Cost) -> Option<Cost> {
    if cost == WEIGHT_MAX { None } else { Some(cost) }
}

// ── CellType ──────────────────────────────────────────────────────────────────

/// Role of a grid cell.
///
/// Kiva maps use `Obstacle`, `Travel`, `Endpoint`, `Home`, `Unknown`.
/// Sorting maps are loaded as raw [`Tile`](CellType::Tile) glyphs and then
/// tagged `Induct` / `Eject` by the station configuration.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CellType {
    Obstacle,
    Travel,
    Endpoint,
    Home,
    Induct,
    Eject,
    Unknown,
    /// Raw legend character awaiting interpretation.
    Tile(char),
}

impl CellType {
    /// Parse the type column of a weighted map.  Names are matched exactly;
    /// anything else is `Unknown`.
    pub fn from_name(name: &str) -> CellType {
        match name {
            "Obstacle" => CellType::Obstacle,
            "Travel"   => CellType::Travel,
            "Endpoint" => CellType::Endpoint,
            "Home"     => CellType::Home,
            "Induct"   => CellType::Induct,
            "Eject"    => CellType::Eject,
            _          => CellType::Unknown,
        }
    }

    #[inline]
    pub fn is_obstacle(self) -> bool {
        self == CellType::Obstacle
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellType::Obstacle => f.write_str("Obstacle"),
            CellType::Travel   => f.write_str("Travel"),
            CellType::Endpoint => f.write_str("Endpoint"),
            CellType::Home     => f.write_str("Home"),
            CellType::Induct   => f.write_str("Induct"),
            CellType::Eject    => f.write_str("Eject"),
            CellType::Unknown  => f.write_str("Unknown"),
            CellType::Tile(c)  => write!(f, "Tile({c:?})"),
        }
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the four grid moves, in cost-vector slot order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum Direction {
    Right = 0,
    Up    = 1,
    Left  = 2,
    Down  = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
    ];

    /// Slot of this direction in a [`CostVector`] and in the move table.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Direction {
        Direction::ALL[i % 4]
    }

    /// The direction whose move offset is the additive inverse of this one.
    #[inline]
    pub fn opposite(self) -> Direction {
        Direction::from_index(self.index() + 2)
    }

    /// Quarter turn counter-clockwise (Right → Up → Left → Down).
    #[inline]
    pub fn turn_left(self) -> Direction {
        Direction::from_index(self.index() + 1)
    }

    /// Quarter turn clockwise.
    #[inline]
    pub fn turn_right(self) -> Direction {
        Direction::from_index(self.index() + 3)
    }
}
