//! Source locations.
//!
//! Locations are stored as 1-based line/column coordinates rather than byte
//! offsets: the driver renders diagnostics long after the tokenizer ran, and
//! line/column pairs survive without re-scanning the file.

use std::fmt;

use crate::SourceId;

/// A region of a source file, in 1-based line/column coordinates.
///
/// `line_end`/`col_end` are inclusive: a single-character location has
/// `col_start == col_end`. Valid only together with the driver that issued
/// the `source` id.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct SourceLocation {
    pub source: SourceId,
    pub line_start: u32,
    pub col_start: u32,
    pub line_end: u32,
    pub col_end: u32,
}

impl SourceLocation {
    /// Create a location spanning `(line_start, col_start)..=(line_end, col_end)`.
    #[inline]
    pub const fn new(
        source: SourceId,
        line_start: u32,
        col_start: u32,
        line_end: u32,
        col_end: u32,
    ) -> Self {
        SourceLocation {
            source,
            line_start,
            col_start,
            line_end,
            col_end,
        }
    }

    /// Create a single-position location.
    #[inline]
    pub const fn point(source: SourceId, line: u32, col: u32) -> Self {
        SourceLocation {
            source,
            line_start: line,
            col_start: col,
            line_end: line,
            col_end: col,
        }
    }

    /// Whether the location starts and ends on the same line.
    #[inline]
    pub const fn is_single_line(&self) -> bool {
        self.line_start == self.line_end
    }
}

impl fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line_start == self.line_end && self.col_start == self.col_end {
            write!(f, "{}:{}:{}", self.source, self.line_start, self.col_start)
        } else {
            write!(
                f,
                "{}:{}:{}..{}:{}",
                self.source, self.line_start, self.col_start, self.line_end, self.col_end
            )
        }
    }
}
