//! Tokenizer for Quill source files.
//!
//! The main entry point is [`tokenize()`], which converts one source file
//! into a locked [`TokenBuffer`]. The tokenizer is pure with respect to the
//! driver: it reads the immutable source text and reports problems through
//! the [`DiagnosticSink`] it is handed, nothing else.
//!
//! # Error Handling
//!
//! Lexing continues past errors so one bad literal does not hide the rest of
//! the file's problems. Every error is emitted through the sink; if any were
//! emitted the whole call returns `Err` and the driver records the task as
//! failed.
//!
//! # File Size Limits
//!
//! Token locations use `u32` coordinates, so files over `u32::MAX` bytes are
//! rejected up front with `LexFileTooLarge`.
//!
//! # Modules
//!
//! - `raw_token`: logos-derived tokenizer definition
//! - `escape`: escape sequence processing for string literals
//! - `line_map`: byte offset to line/column conversion

mod escape;
mod line_map;
mod raw_token;

use std::fmt;

use logos::Logos;

use quill_diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSink};
use quill_ir::{SourceId, SourceLocation, TokenBuffer, TokenKind};

use crate::escape::unescape;
use crate::line_map::LineMap;
use crate::raw_token::RawToken;

/// Failure of a [`tokenize`] call.
///
/// Diagnostics have already been emitted through the sink by the time this
/// is returned; the error itself only summarizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// The file exceeds the `u32::MAX`-byte coordinate limit.
    FileTooLarge,
    /// One or more lexical errors were diagnosed.
    InvalidSource { errors: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::FileTooLarge => f.write_str("source file too large to tokenize"),
            LexError::InvalidSource { errors } => {
                write!(f, "tokenizing failed with {errors} lexical error(s)")
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Tokenize one source file.
///
/// On success the returned buffer ends with an `Eof` token and is locked.
/// On failure the partial buffer is discarded; the caller decides what the
/// failed task means for the rest of the batch.
pub fn tokenize(
    source: SourceId,
    data: &str,
    sink: &dyn DiagnosticSink,
) -> Result<TokenBuffer, LexError> {
    if data.len() > u32::MAX as usize {
        sink.emit(
            Diagnostic::error(DiagnosticCode::LexFileTooLarge)
                .with_message("Source file exceeds the 4 GiB tokenizer limit"),
        );
        return Err(LexError::FileTooLarge);
    }

    let line_map = LineMap::build(data);
    let mut buffer = TokenBuffer::with_capacity(data.len() / 8 + 1);
    let mut errors = 0usize;

    let mut lexer = RawToken::lexer(data);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let location = line_map.location(data, source, span.clone());

        let raw = match result {
            Ok(raw) => raw,
            Err(()) => {
                let slice = lexer.slice();
                let first = slice.chars().next().unwrap_or(' ');
                let diagnostic = if first.is_ascii_digit() {
                    Diagnostic::error(DiagnosticCode::LexInvalidIntLiteral)
                        .with_message(format!("Integer literal `{slice}` does not fit in 64 bits"))
                } else {
                    Diagnostic::error(DiagnosticCode::LexInvalidCharacter)
                        .with_message(format!("Invalid character `{first}`"))
                };
                sink.emit(diagnostic.with_location(location));
                errors += 1;
                continue;
            }
        };

        match raw {
            RawToken::KwLet => buffer.create_token(TokenKind::KwLet, location),
            RawToken::KwFn => buffer.create_token(TokenKind::KwFn, location),
            RawToken::KwIf => buffer.create_token(TokenKind::KwIf, location),
            RawToken::KwElse => buffer.create_token(TokenKind::KwElse, location),
            RawToken::KwWhile => buffer.create_token(TokenKind::KwWhile, location),
            RawToken::KwReturn => buffer.create_token(TokenKind::KwReturn, location),

            RawToken::True => buffer.create_token_bool(TokenKind::BoolLiteral, location, true),
            RawToken::False => buffer.create_token_bool(TokenKind::BoolLiteral, location, false),

            RawToken::LParen => buffer.create_token(TokenKind::LParen, location),
            RawToken::RParen => buffer.create_token(TokenKind::RParen, location),
            RawToken::LBrace => buffer.create_token(TokenKind::LBrace, location),
            RawToken::RBrace => buffer.create_token(TokenKind::RBrace, location),
            RawToken::LBracket => buffer.create_token(TokenKind::LBracket, location),
            RawToken::RBracket => buffer.create_token(TokenKind::RBracket, location),
            RawToken::Comma => buffer.create_token(TokenKind::Comma, location),
            RawToken::Colon => buffer.create_token(TokenKind::Colon, location),
            RawToken::Semicolon => buffer.create_token(TokenKind::Semicolon, location),
            RawToken::Arrow => buffer.create_token(TokenKind::Arrow, location),

            RawToken::EqEq => buffer.create_token(TokenKind::EqEq, location),
            RawToken::Eq => buffer.create_token(TokenKind::Eq, location),
            RawToken::NotEq => buffer.create_token(TokenKind::NotEq, location),
            RawToken::LtEq => buffer.create_token(TokenKind::LtEq, location),
            RawToken::Lt => buffer.create_token(TokenKind::Lt, location),
            RawToken::GtEq => buffer.create_token(TokenKind::GtEq, location),
            RawToken::Gt => buffer.create_token(TokenKind::Gt, location),
            RawToken::Plus => buffer.create_token(TokenKind::Plus, location),
            RawToken::Minus => buffer.create_token(TokenKind::Minus, location),
            RawToken::Star => buffer.create_token(TokenKind::Star, location),
            RawToken::Slash => buffer.create_token(TokenKind::Slash, location),
            RawToken::Percent => buffer.create_token(TokenKind::Percent, location),
            RawToken::Bang => buffer.create_token(TokenKind::Bang, location),
            RawToken::AmpAmp => buffer.create_token(TokenKind::AmpAmp, location),
            RawToken::PipePipe => buffer.create_token(TokenKind::PipePipe, location),

            RawToken::HexInt(value) | RawToken::BinInt(value) | RawToken::Int(value) => {
                buffer.create_token_int(TokenKind::IntLiteral, location, value)
            }
            RawToken::Float(value) => {
                buffer.create_token_float(TokenKind::FloatLiteral, location, value)
            }

            RawToken::Ident => {
                buffer.create_token_str(TokenKind::Ident, location, lexer.slice().to_string())
            }

            RawToken::String => {
                let content = &lexer.slice()[1..lexer.slice().len() - 1];
                match unescape(content) {
                    Ok(value) => {
                        buffer.create_token_str(TokenKind::StringLiteral, location, value)
                    }
                    Err(invalid) => {
                        let escape_offset = (span.start + 1 + invalid.offset) as u32;
                        let (line, col) = line_map.offset_to_line_col(data, escape_offset);
                        let message = match invalid.ch {
                            Some(ch) => format!("Invalid escape sequence `\\{ch}`"),
                            None => "Invalid escape sequence `\\` at end of string".to_string(),
                        };
                        sink.emit(
                            Diagnostic::error(DiagnosticCode::LexInvalidEscape)
                                .with_message(message)
                                .with_location(SourceLocation::point(source, line, col)),
                        );
                        errors += 1;
                        // Keep the raw content so later stages still see a token.
                        buffer.create_token_str(
                            TokenKind::StringLiteral,
                            location,
                            content.to_string(),
                        )
                    }
                }
            }

            RawToken::UnterminatedString => {
                sink.emit(
                    Diagnostic::error(DiagnosticCode::LexUnterminatedString)
                        .with_message("Unterminated string literal")
                        .with_location(location),
                );
                errors += 1;
                continue;
            }
        };
    }

    let (eof_line, eof_col) = line_map.offset_to_line_col(data, data.len() as u32);
    buffer.create_token(TokenKind::Eof, SourceLocation::point(source, eof_line, eof_col));
    buffer.lock();

    if errors > 0 {
        Err(LexError::InvalidSource { errors })
    } else {
        Ok(buffer)
    }
}
