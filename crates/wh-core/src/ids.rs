//! Grid cell and station identifiers.
//!
//! Both are thin `u32` wrappers: `Copy`, ordered, and hashable, so they key
//! maps and sort without ceremony.  The inner value is `pub` because loaders
//! and tests build cells straight from row-major indices; everything else
//! should go through [`CellId::index`].

use std::fmt;

macro_rules! u32_id {
    ($(#[$attr:meta])* $name:ident, $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for "not assigned"; never a valid grid index.
            pub const INVALID: $name = $name(u32::MAX);

            /// Position in the graph's flat per-cell arrays.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Checked conversion from a flat index; `None` if it does not
            /// fit in 32 bits.
            #[inline]
            pub fn from_index(i: usize) -> Option<$name> {
                u32::try_from(i).ok().map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " {}"), self.0)
            }
        }
    };
}

u32_id! {
    /// Flat index of a grid cell: `row * cols + col`.
    CellId, "cell"
}

u32_id! {
    /// Sorting-domain induct or eject station, numbered by the station
    /// configuration.
    StationId, "station"
}
