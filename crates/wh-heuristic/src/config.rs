//! Preprocessing configuration.
//!
//! Cache handling is an explicit policy rather than a property of the map
//! type.  [`PreprocessConfig::for_domain`] reproduces the historical per-domain
//! behavior:
//!
//! | Domain  | reuse | validate | persist | on mismatch |
//! |---------|-------|----------|---------|-------------|
//! | Kiva    | yes   | no       | no      | `Fail`      |
//! | Sorting | yes   | yes      | yes     | `Fail`      |
//!
//! Callers wanting uniform behavior across domains override individual
//! fields with the `with_*` setters.

use wh_grid::DomainKind;

/// What to do when a reloaded table is keyed by a non-special cell.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MismatchPolicy {
    /// Return [`HeuristicError::Mismatch`](crate::HeuristicError::Mismatch).
    Fail,
    /// Log a warning, discard the file, and recompute.
    Recompute,
}

/// How the on-disk heuristic table is used.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CachePolicy {
    /// Try to reload an existing table before computing.
    pub reuse: bool,
    /// Check every reloaded key against the domain's special cell types.
    pub validate: bool,
    /// Write a freshly computed table back to disk.
    pub persist: bool,
    pub on_mismatch: MismatchPolicy,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PreprocessConfig {
    /// Plan over (cell, heading) states; turning costs the cell's self cost.
    pub consider_rotation: bool,
    pub cache: CachePolicy,
}

impl PreprocessConfig {
    /// Default policy for `kind` (see the module table).
    pub fn for_domain(kind: DomainKind, consider_rotation: bool) -> Self {
        let cache = match kind {
            DomainKind::Kiva => CachePolicy {
                reuse:       true,
                validate:    false,
                persist:     false,
                on_mismatch: MismatchPolicy::Fail,
            },
            DomainKind::Sorting => CachePolicy {
                reuse:       true,
                validate:    true,
                persist:     true,
                on_mismatch: MismatchPolicy::Fail,
            },
        };
        Self { consider_rotation, cache }
    }

    pub fn with_reuse(mut self, reuse: bool) -> Self {
        self.cache.reuse = reuse;
        self
    }

    pub fn with_validate(mut self, validate: bool) -> Self {
        self.cache.validate = validate;
        self
    }

    pub fn with_persist(mut self, persist: bool) -> Self {
        self.cache.persist = persist;
        self
    }

    pub fn with_on_mismatch(mut self, policy: MismatchPolicy) -> Self {
        self.cache.on_mismatch = policy;
        self
    }
}
