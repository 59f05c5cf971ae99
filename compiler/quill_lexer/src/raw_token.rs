//! Raw token definition.
//!
//! The `RawToken` enum is the logos-derived tokenizer output before escape
//! processing and conversion into the driver's token buffer. Numeric
//! literals are parsed in the logos callbacks; a failed parse (overflow)
//! surfaces as a lexer error at that span.

use logos::Logos;

/// Parse an integer literal, skipping `_` separators.
///
/// Returns `None` on overflow, which logos reports as an error token.
pub(crate) fn parse_int_skip_underscores(digits: &str, radix: u32) -> Option<u64> {
    let mut value: u64 = 0;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let digit = u64::from(c.to_digit(radix)?);
        value = value.checked_mul(u64::from(radix))?.checked_add(digit)?;
    }
    Some(value)
}

/// Parse a float literal, skipping `_` separators.
///
/// Only allocates if separators are present.
pub(crate) fn parse_float_skip_underscores(slice: &str) -> Option<f64> {
    if slice.contains('_') {
        slice.replace('_', "").parse().ok()
    } else {
        slice.parse().ok()
    }
}

/// Raw token from logos (before conversion).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")] // Whitespace
#[logos(skip r"//[^\n]*")] // Line comments
pub(crate) enum RawToken {
    #[token("let")]
    KwLet,
    #[token("fn")]
    KwFn,
    #[token("if")]
    KwIf,
    #[token("else")]
    KwElse,
    #[token("while")]
    KwWhile,
    #[token("return")]
    KwReturn,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("->")]
    Arrow,

    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

    // Hex integer (zero-allocation parsing)
    #[regex(r"0x[0-9a-fA-F][0-9a-fA-F_]*", |lex| {
        parse_int_skip_underscores(&lex.slice()[2..], 16)
    })]
    HexInt(u64),

    // Binary integer (zero-allocation parsing)
    #[regex(r"0b[01][01_]*", |lex| {
        parse_int_skip_underscores(&lex.slice()[2..], 2)
    })]
    BinInt(u64),

    // Integer (zero-allocation parsing)
    #[regex(r"[0-9][0-9_]*", |lex| {
        parse_int_skip_underscores(lex.slice(), 10)
    })]
    Int(u64),

    // Float (only allocates if underscores present)
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| {
        parse_float_skip_underscores(lex.slice())
    })]
    Float(f64),

    // String literal (no unescaped newlines allowed)
    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    String,

    // String literal that hit a newline or end of input before the closing
    // quote. Terminated strings are one character longer, so the longest
    // match rule keeps the two variants apart.
    #[regex(r#""([^"\\\n\r]|\\.)*"#)]
    UnterminatedString,

    // Identifier
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_parsing_skips_underscores() {
        assert_eq!(parse_int_skip_underscores("1_000_000", 10), Some(1_000_000));
        assert_eq!(parse_int_skip_underscores("ff_ff", 16), Some(0xffff));
        assert_eq!(parse_int_skip_underscores("1010", 2), Some(10));
    }

    #[test]
    fn int_parsing_rejects_overflow() {
        assert_eq!(parse_int_skip_underscores("18446744073709551616", 10), None);
    }

    #[test]
    fn float_parsing_handles_exponents() {
        assert_eq!(parse_float_skip_underscores("1.5e3"), Some(1500.0));
        assert_eq!(parse_float_skip_underscores("1_0.2_5"), Some(10.25));
    }
}
