use quill_ir::{SourceId, SourceLocation};

use crate::render::{render_header, render_snippet, ColorMode};
use crate::{Diagnostic, DiagnosticCode, Level};

fn snippet(data: &str, location: SourceLocation) -> String {
    let mut out = Vec::new();
    render_snippet(&mut out, "main.ql", data, Level::Error, &location, false);
    String::from_utf8(out).unwrap()
}

fn span(line_start: u32, col_start: u32, line_end: u32, col_end: u32) -> SourceLocation {
    SourceLocation::new(SourceId::new(0), line_start, col_start, line_end, col_end)
}

#[test]
fn trims_leading_whitespace_and_shifts_caret() {
    let rendered = snippet("abc\n  xyz\n", span(2, 3, 2, 5));

    assert!(rendered.contains("main.ql:2:3"), "{rendered}");
    assert!(rendered.contains("2 | xyz\n"), "{rendered}");
    // Caret shifted to column 1 of the trimmed line, three columns wide.
    assert!(rendered.contains("  | ^^^\n"), "{rendered}");
}

#[test]
fn caret_stays_in_place_without_leading_whitespace() {
    let rendered = snippet("let x = 9;\n", span(1, 5, 1, 5));

    assert!(rendered.contains("1 | let x = 9;\n"), "{rendered}");
    assert!(rendered.contains("  |     ^\n"), "{rendered}");
}

#[test]
fn recognizes_crlf_line_boundaries() {
    let rendered = snippet("a\r\nbc\r\nd\r\n", span(2, 1, 2, 2));

    assert!(rendered.contains("2 | bc\n"), "{rendered}");
    assert!(rendered.contains("  | ^^\n"), "{rendered}");
}

#[test]
fn recognizes_bare_cr_line_boundaries() {
    let rendered = snippet("a\rbc\r", span(2, 2, 2, 2));

    assert!(rendered.contains("2 | bc\n"), "{rendered}");
    assert!(rendered.contains("  |  ^\n"), "{rendered}");
}

#[test]
fn multi_line_span_draws_caret_then_tildes() {
    let rendered = snippet("abcd\nxyz\n", span(1, 2, 2, 3));

    assert!(rendered.contains("1 | abcd\n"), "{rendered}");
    // From column 2 to the end of the displayed line: one caret, two tildes.
    assert!(rendered.contains("  |  ^~~\n"), "{rendered}");
}

#[test]
fn caret_clamps_when_span_starts_inside_trimmed_whitespace() {
    // Column 2 sits inside the trimmed indentation; the caret lands on
    // column 1 rather than underflowing.
    let rendered = snippet("    x\n", span(1, 2, 1, 2));

    assert!(rendered.contains("1 | x\n"), "{rendered}");
    assert!(rendered.contains("  | ^\n"), "{rendered}");
}

#[test]
fn header_formats_level_code_and_message() {
    let diag = Diagnostic::error(DiagnosticCode::MiscFileDoesNotExist)
        .with_message("file \"missing.ql\" does not exist");
    let mut out = Vec::new();
    render_header(&mut out, &diag, false);

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "<Error|MiscFileDoesNotExist> file \"missing.ql\" does not exist\n"
    );
}

#[test]
fn plain_output_has_no_escape_codes() {
    let rendered = snippet("abc\n", span(1, 1, 1, 3));
    assert!(!rendered.contains('\x1b'), "{rendered}");
}

#[test]
fn color_mode_resolution() {
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
}
