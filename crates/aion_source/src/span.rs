//! Line ranges within source files, with the per-location coverage flag.

use crate::file_id::FileId;
use serde::{Deserialize, Serialize};

/// The source location of a tree node.
///
/// Lines are 1-based and inclusive. `col` is the 1-based column of the first
/// token. `coverage_off` is set by the front end for text inside a
/// `coverage_off` / `coverage_on` comment region, so the flag travels with
/// every node parsed from that region.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// The source file this span belongs to.
    pub file: FileId,
    /// First source line (inclusive).
    pub first_line: u32,
    /// Last source line (inclusive).
    pub last_line: u32,
    /// Column of the first token.
    pub col: u32,
    /// Whether coverage was disabled for this source region.
    #[serde(default)]
    pub coverage_off: bool,
}

impl Span {
    /// A dummy span used when no source location is available.
    pub const DUMMY: Span = Span {
        file: FileId::DUMMY,
        first_line: 0,
        last_line: 0,
        col: 0,
        coverage_off: false,
    };

    /// Creates a span covering `first_line..=last_line` of `file`.
    pub fn new(file: FileId, first_line: u32, last_line: u32) -> Self {
        Self {
            file,
            first_line,
            last_line,
            col: 1,
            coverage_off: false,
        }
    }

    /// Creates a single-line span.
    pub fn line(file: FileId, line: u32) -> Self {
        Self::new(file, line, line)
    }

    /// Returns this span with the given starting column.
    pub fn with_col(mut self, col: u32) -> Self {
        self.col = col;
        self
    }

    /// Returns this span marked as lying inside a coverage-off region.
    pub fn without_coverage(mut self) -> Self {
        self.coverage_off = true;
        self
    }

    /// Returns `true` unless the source region disabled coverage.
    pub fn coverage_on(&self) -> bool {
        !self.coverage_off
    }

    /// Iterates over every line covered by this span.
    pub fn lines(&self) -> std::ops::RangeInclusive<u32> {
        self.first_line..=self.last_line
    }

    /// Returns `true` if both spans come from the same file.
    pub fn same_file(&self, other: &Span) -> bool {
        self.file == other.file
    }

    /// Returns `true` if this is the dummy span.
    pub fn is_dummy(&self) -> bool {
        self.file == FileId::DUMMY
    }
}
