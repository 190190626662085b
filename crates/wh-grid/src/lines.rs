//! Physical-line reader shared by the map loaders.
//!
//! Map headers sit at fixed line positions, so every line counts, blank or
//! not.

use std::io::{BufRead, Lines};

use crate::{MapError, MapResult};

/// Line iterator that tracks 1-based line numbers and strips `\r`.
pub(crate) struct NumberedLines<R> {
    inner: Lines<R>,
    line:  u64,
}

impl<R: BufRead> NumberedLines<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { inner: reader.lines(), line: 0 }
    }

    pub(crate) fn next(&mut self) -> MapResult<Option<(u64, String)>> {
        match self.inner.next() {
            None => Ok(None),
            Some(text) => {
                self.line += 1;
                let mut text = text?;
                if text.ends_with('\r') {
                    text.pop();
                }
                Ok(Some((self.line, text)))
            }
        }
    }

    /// Header line; end of file here is a malformed header.
    pub(crate) fn next_line(&mut self, what: &str) -> MapResult<(u64, String)> {
        self.next()?.ok_or_else(|| {
            MapError::malformed(self.line + 1, format!("unexpected end of file, expected {what}"))
        })
    }
}
