//! Core data model for the Quill compiler front-end.
//!
//! Plain data shared by every stage: dense identifiers, source locations,
//! and the token buffer a tokenized file resolves to.
//!
//! # Modules
//!
//! - [`source_id`]: dense identifier for registered source files
//! - [`location`]: 1-based line/column source locations
//! - [`token`]: token kinds, payloads, and the append-only [`TokenBuffer`]

mod location;
mod source_id;
pub mod token;

pub use location::SourceLocation;
pub use source_id::SourceId;
pub use token::{StrId, Token, TokenBuffer, TokenId, TokenKind, TokenPayload};
