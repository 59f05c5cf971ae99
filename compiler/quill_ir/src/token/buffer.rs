//! Append-only token container.

use std::fmt;

use crate::SourceLocation;

use super::{StrId, Token, TokenId, TokenKind, TokenPayload};

/// The tokens of a single source file, plus out-of-band string storage.
///
/// Tokens are appended during tokenization and addressed by dense
/// [`TokenId`]s. String payloads (identifiers, string literals) are owned by
/// the buffer in individually boxed cells, so the `&str` returned by
/// [`literal`](TokenBuffer::literal) keeps its address across arbitrarily
/// many later appends.
///
/// Once [`lock`](TokenBuffer::lock) has been called the buffer is frozen;
/// further appends are a contract violation (checked builds assert).
///
/// # Thread Safety
///
/// Not internally synchronized. A buffer is confined to the worker
/// populating it, then published whole to its owning source.
#[derive(Default)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    literals: Vec<Box<str>>,
    is_locked: bool,
}

impl TokenBuffer {
    /// Create a new empty buffer.
    #[inline]
    pub fn new() -> Self {
        TokenBuffer::default()
    }

    /// Create a buffer with pre-allocated token capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        TokenBuffer {
            tokens: Vec::with_capacity(capacity),
            literals: Vec::new(),
            is_locked: false,
        }
    }

    fn push_token(&mut self, kind: TokenKind, location: SourceLocation, payload: TokenPayload) -> TokenId {
        debug_assert!(!self.is_locked, "create_token on a locked TokenBuffer");
        debug_assert!(self.tokens.len() < u32::MAX as usize, "token buffer overflow");

        let id = TokenId::new(self.tokens.len() as u32);
        self.tokens.push(Token {
            kind,
            location,
            payload,
        });
        id
    }

    /// Append a token with no payload.
    pub fn create_token(&mut self, kind: TokenKind, location: SourceLocation) -> TokenId {
        self.push_token(kind, location, TokenPayload::None)
    }

    /// Append a token carrying a bool payload.
    pub fn create_token_bool(
        &mut self,
        kind: TokenKind,
        location: SourceLocation,
        value: bool,
    ) -> TokenId {
        self.push_token(kind, location, TokenPayload::Bool(value))
    }

    /// Append a token carrying an integer payload.
    pub fn create_token_int(
        &mut self,
        kind: TokenKind,
        location: SourceLocation,
        value: u64,
    ) -> TokenId {
        self.push_token(kind, location, TokenPayload::Int(value))
    }

    /// Append a token carrying a float payload.
    pub fn create_token_float(
        &mut self,
        kind: TokenKind,
        location: SourceLocation,
        value: f64,
    ) -> TokenId {
        self.push_token(kind, location, TokenPayload::Float(value))
    }

    /// Append a token carrying a string payload.
    ///
    /// The buffer takes ownership of `value` and stores it in its own boxed
    /// cell; the address of the stored bytes never changes afterwards.
    pub fn create_token_str(
        &mut self,
        kind: TokenKind,
        location: SourceLocation,
        value: String,
    ) -> TokenId {
        debug_assert!(self.literals.len() < u32::MAX as usize, "literal table overflow");

        let str_id = StrId::new(self.literals.len() as u32);
        self.literals.push(value.into_boxed_str());
        self.push_token(kind, location, TokenPayload::Str(str_id))
    }

    /// Get the token for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this buffer.
    #[inline]
    pub fn get(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    /// Get the token for `id` mutably.
    #[inline]
    pub fn get_mut(&mut self, id: TokenId) -> &mut Token {
        &mut self.tokens[id.index()]
    }

    /// Resolve a string payload handle.
    #[inline]
    pub fn literal(&self, id: StrId) -> &str {
        &self.literals[id.index()]
    }

    /// Resolve a token's string payload, if it has one.
    #[inline]
    pub fn str_value(&self, token: &Token) -> Option<&str> {
        token.str_id().map(|id| self.literal(id))
    }

    /// Number of tokens in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over the ids `0..len`.
    pub fn iter_ids(&self) -> impl Iterator<Item = TokenId> {
        (0..self.tokens.len() as u32).map(TokenId::new)
    }

    /// Iterate over the tokens in id order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Freeze the buffer. Irrevocable.
    #[inline]
    pub fn lock(&mut self) {
        self.is_locked = true;
    }

    /// Whether [`lock`](TokenBuffer::lock) has been called.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.is_locked
    }
}

impl std::ops::Index<TokenId> for TokenBuffer {
    type Output = Token;

    #[inline]
    fn index(&self, id: TokenId) -> &Token {
        self.get(id)
    }
}

impl fmt::Debug for TokenBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenBuffer({} tokens)", self.tokens.len())
    }
}
