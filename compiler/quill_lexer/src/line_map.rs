//! Byte offset to line/column conversion.
//!
//! The tokenizer works in byte offsets (logos spans) but the driver's token
//! and diagnostic model stores 1-based line/column coordinates. A `LineMap`
//! is built once per file: O(n) construction for O(log L) lookups.

use std::ops::Range;

use quill_ir::{SourceId, SourceLocation};

/// Pre-computed table of line-start byte offsets.
pub(crate) struct LineMap {
    /// Byte offset of each line start. `offsets[0] == 0`.
    offsets: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    ///
    /// The caller guarantees `source.len() <= u32::MAX`.
    pub(crate) fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        let bytes = source.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => offsets.push((i + 1) as u32),
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    offsets.push((i + 1) as u32);
                }
                _ => {}
            }
            i += 1;
        }
        LineMap { offsets }
    }

    /// Get the 1-based (line, column) for a byte offset.
    ///
    /// The column counts characters (not bytes) from the line start.
    pub(crate) fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        let line_start = self.offsets[line_idx] as usize;
        let offset = (offset as usize).min(source.len());

        let col = source[line_start..offset].chars().count() as u32 + 1;
        (line_idx as u32 + 1, col)
    }

    /// Convert a byte span into a [`SourceLocation`] with inclusive end
    /// coordinates.
    pub(crate) fn location(&self, source: &str, id: SourceId, span: Range<usize>) -> SourceLocation {
        let (line_start, col_start) = self.offset_to_line_col(source, span.start as u32);

        // End coordinates name the final character of the span, so step back
        // one char (not one byte) from the exclusive end.
        let mut end = span.end.saturating_sub(1).max(span.start);
        while end > span.start && !source.is_char_boundary(end) {
            end -= 1;
        }
        let (line_end, col_end) = self.offset_to_line_col(source, end as u32);

        SourceLocation::new(id, line_start, col_start, line_end, col_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_starts_at_one_one() {
        let src = "abc\ndef";
        let map = LineMap::build(src);
        assert_eq!(map.offset_to_line_col(src, 0), (1, 1));
        assert_eq!(map.offset_to_line_col(src, 2), (1, 3));
    }

    #[test]
    fn lines_split_on_lf_cr_and_crlf() {
        let src = "a\nb\rc\r\nd";
        let map = LineMap::build(src);
        assert_eq!(map.offset_to_line_col(src, 2), (2, 1)); // b
        assert_eq!(map.offset_to_line_col(src, 4), (3, 1)); // c
        assert_eq!(map.offset_to_line_col(src, 7), (4, 1)); // d
    }

    #[test]
    fn columns_count_chars_not_bytes() {
        let src = "é x";
        let map = LineMap::build(src);
        // 'x' is at byte 3 but character column 3.
        assert_eq!(map.offset_to_line_col(src, 3), (1, 3));
    }

    #[test]
    fn span_location_is_inclusive() {
        let src = "let x\n";
        let map = LineMap::build(src);
        let loc = map.location(src, SourceId::new(0), 0..3);
        assert_eq!((loc.line_start, loc.col_start), (1, 1));
        assert_eq!((loc.line_end, loc.col_end), (1, 3));
    }

    #[test]
    fn end_of_file_maps_past_last_column() {
        let src = "ab";
        let map = LineMap::build(src);
        assert_eq!(map.offset_to_line_col(src, 2), (1, 3));
    }
}
