//! Terminal rendering for diagnostics.
//!
//! Human-readable output with optional ANSI colors: a `<Level|Code>` header
//! line, then (when the diagnostic carries a location) the source line with
//! a caret span underneath. The caller resolves `SourceId`s to file origin
//! and contents; this module only formats.
//!
//! Snippet rules:
//! - line/column coordinates are 1-based
//! - line boundaries are `\n`, `\r`, and `\r\n`
//! - leading whitespace of the displayed line is trimmed, and the caret
//!   column shifts left to match
//! - single-line spans draw `^` per column, multi-line spans draw `^~~~`
//!   to the end of the displayed line

use std::io::Write;

use quill_ir::SourceLocation;

use crate::{Diagnostic, Level};

/// ANSI color codes for terminal output.
mod colors {
    pub const FATAL: &str = "\x1b[1;31m"; // Bold red
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const INFO: &str = "\x1b[1;36m"; // Bold cyan
    pub const GRAY: &str = "\x1b[90m";
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Detect based on terminal capabilities.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorMode {
    /// Resolve to a boolean based on terminal detection.
    ///
    /// For `Auto`, `is_tty` decides; it is ignored for `Always` and `Never`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Fatal => colors::FATAL,
        Level::Error => colors::ERROR,
        Level::Warning => colors::WARNING,
        Level::Info => colors::INFO,
    }
}

fn write_colored<W: Write>(out: &mut W, text: &str, color: &str, colors_on: bool) {
    if colors_on {
        let _ = write!(out, "{color}{text}{}", colors::RESET);
    } else {
        let _ = write!(out, "{text}");
    }
}

/// Write the `<Level|Code> message` header line.
pub fn render_header<W: Write>(out: &mut W, diagnostic: &Diagnostic, colors_on: bool) {
    let header = format!(
        "<{}|{}> {}\n",
        diagnostic.level, diagnostic.code, diagnostic.message
    );
    write_colored(out, &header, level_color(diagnostic.level), colors_on);
}

/// Write a follow-on `<Info>` line.
pub fn render_info<W: Write>(out: &mut W, message: &str, colors_on: bool) {
    write_colored(out, &format!("\t<Info> {message}\n"), colors::INFO, colors_on);
}

/// Write the source snippet for a location: origin header, the (whitespace-
/// trimmed) source line, and the caret span.
///
/// `origin` is the displayable file path; `data` the file contents the
/// location was produced from.
pub fn render_snippet<W: Write>(
    out: &mut W,
    origin: &str,
    data: &str,
    level: Level,
    location: &SourceLocation,
    colors_on: bool,
) {
    write_colored(
        out,
        &format!("\t{origin}:{}:{}\n", location.line_start, location.col_start),
        colors::GRAY,
        colors_on,
    );

    let (line_str, point_col) = snippet_line(data, location.line_start, location.col_start);

    let line_number_str = location.line_start.to_string();
    write_colored(
        out,
        &format!("\t{line_number_str} | {line_str}\n"),
        colors::GRAY,
        colors_on,
    );

    let gutter = " ".repeat(line_number_str.len());
    write_colored(out, &format!("\t{gutter} | "), colors::GRAY, colors_on);

    let mut pointer = " ".repeat(point_col - 1);
    if location.is_single_line() {
        let width = location.col_end.saturating_sub(location.col_start) as usize + 1;
        pointer.extend(std::iter::repeat('^').take(width));
    } else {
        // Span continues past this line: caret at the start, tildes to the
        // end of the displayed line.
        let line_chars = line_str.chars().count();
        pointer.push('^');
        pointer.extend(std::iter::repeat('~').take((line_chars + 1).saturating_sub(point_col + 1)));
    }
    pointer.push('\n');

    write_colored(out, &pointer, level_color(level), colors_on);
}

/// Extract the 1-based `line` of `data` with leading whitespace removed,
/// returning the line text and `col` shifted by the removed prefix
/// (clamped to 1).
fn snippet_line(data: &str, line: u32, col: u32) -> (&str, usize) {
    let bytes = data.as_bytes();

    // Forward scan to the start of the requested line. `\n`, `\r`, and
    // `\r\n` each terminate a line.
    let mut cursor = 0usize;
    let mut current_line = 1u32;
    while current_line < line && cursor < bytes.len() {
        match bytes[cursor] {
            b'\n' => current_line += 1,
            b'\r' => {
                current_line += 1;
                if bytes.get(cursor + 1) == Some(&b'\n') {
                    cursor += 1;
                }
            }
            _ => {}
        }
        cursor += 1;
    }
    debug_assert!(
        current_line == line,
        "location line {line} is past the end of the source"
    );

    // Trim leading whitespace, shifting the caret column with it.
    let mut point_col = col as usize;
    let mut start = cursor;
    while start < bytes.len() && (bytes[start] == b' ' || bytes[start] == b'\t') {
        start += 1;
        point_col = point_col.saturating_sub(1);
    }

    let mut end = start;
    while end < bytes.len() && bytes[end] != b'\n' && bytes[end] != b'\r' {
        end += 1;
    }

    (&data[start..end], point_col.max(1))
}

#[cfg(test)]
mod tests;
