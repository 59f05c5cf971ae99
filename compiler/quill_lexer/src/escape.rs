//! Escape sequence processing for string literals.

/// An escape sequence the tokenizer does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InvalidEscape {
    /// Byte offset of the offending character within the raw content.
    pub(crate) offset: usize,
    /// The character after the backslash, or `None` for a trailing `\`.
    pub(crate) ch: Option<char>,
}

/// Process the escape sequences of a string literal's raw content (the text
/// between the quotes).
///
/// Supported: `\n`, `\r`, `\t`, `\\`, `\"`, `\'`, `\0`.
pub(crate) fn unescape(raw: &str) -> Result<String, InvalidEscape> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, 'n')) => out.push('\n'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, 't')) => out.push('\t'),
            Some((_, '\\')) => out.push('\\'),
            Some((_, '"')) => out.push('"'),
            Some((_, '\'')) => out.push('\''),
            Some((_, '0')) => out.push('\0'),
            Some((j, other)) => {
                return Err(InvalidEscape {
                    offset: j,
                    ch: Some(other),
                })
            }
            None => return Err(InvalidEscape { offset: i, ch: None }),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_plain_text_through() {
        assert_eq!(unescape("hello").unwrap(), "hello");
    }

    #[test]
    fn processes_known_escapes() {
        assert_eq!(unescape(r#"a\nb\tc\\d\"e\0"#).unwrap(), "a\nb\tc\\d\"e\0");
    }

    #[test]
    fn reports_unknown_escape_with_offset() {
        let err = unescape(r"ab\qcd").unwrap_err();
        assert_eq!(err.offset, 3);
        assert_eq!(err.ch, Some('q'));
    }

    #[test]
    fn reports_trailing_backslash() {
        let err = unescape(r"ab\").unwrap_err();
        assert_eq!(err.ch, None);
    }
}
