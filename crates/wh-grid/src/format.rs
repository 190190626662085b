//! Map file format selection.
//!
//! The format is resolved once from the file extension, before any I/O:
//!
//! | Extension | Format               | Loader                                  |
//! |-----------|----------------------|-----------------------------------------|
//! | `.grid`   | [`MapFormat::Weighted`] | [`crate::weighted::load_weighted_reader`] |
//! | `.map`    | [`MapFormat::Legend`]   | Kiva or Sorting legend loader           |
//!
//! Anything else is rejected with [`MapError::UnsupportedExtension`].

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::{legend, weighted, DomainKind, GridGraph, MapError, MapResult};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MapFormat {
    /// Tabular `id,type,x,y,w0..w4` file.
    Weighted,
    /// Octile-style character legend.
    Legend,
}

impl MapFormat {
    pub fn from_path(path: &Path) -> MapResult<MapFormat> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("grid") => Ok(MapFormat::Weighted),
            Some("map")  => Ok(MapFormat::Legend),
            _ => Err(MapError::UnsupportedExtension { path: path.to_path_buf() }),
        }
    }

    /// Open `path` and parse it with this format's loader for `kind`.
    pub fn load(self, path: &Path, kind: DomainKind) -> MapResult<GridGraph> {
        let started = Instant::now();
        let reader = BufReader::new(open(path)?);
        let map_name = map_name_of(path);

        let graph = match (self, kind) {
            (MapFormat::Weighted, _) => weighted::load_weighted_reader(reader, map_name, kind)?,
            (MapFormat::Legend, DomainKind::Kiva) => legend::load_kiva_reader(reader, map_name)?,
            (MapFormat::Legend, DomainKind::Sorting) => {
                legend::load_sorting_reader(reader, map_name)?
            }
        };

        log::debug!("loaded {} in {:?}", path.display(), started.elapsed());
        Ok(graph)
    }
}

/// Load the map at `path` for domain `kind`, choosing the loader by extension.
///
/// # Errors
///
/// [`MapError::UnsupportedExtension`] before any I/O if the extension is not
/// `.grid` or `.map`; [`MapError::FileNotFound`] if the file cannot be found;
/// otherwise whatever the selected loader reports.
pub fn load_map(path: &Path, kind: DomainKind) -> MapResult<GridGraph> {
    MapFormat::from_path(path)?.load(path, kind)
}

/// `path` with its final extension removed.
pub fn map_name_of(path: &Path) -> PathBuf {
    path.with_extension("")
}

fn open(path: &Path) -> MapResult<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => MapError::FileNotFound { path: path.to_path_buf() },
        _ => MapError::Io(e),
    })
}
