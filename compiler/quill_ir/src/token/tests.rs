use crate::{SourceId, SourceLocation, TokenBuffer, TokenId, TokenKind, TokenPayload};

fn loc(line: u32, col: u32) -> SourceLocation {
    SourceLocation::point(SourceId::new(0), line, col)
}

#[test]
fn ids_are_dense_and_in_append_order() {
    let mut buffer = TokenBuffer::new();
    let a = buffer.create_token(TokenKind::LParen, loc(1, 1));
    let b = buffer.create_token_int(TokenKind::IntLiteral, loc(1, 2), 42);
    let c = buffer.create_token(TokenKind::RParen, loc(1, 4));

    assert_eq!(a, TokenId::new(0));
    assert_eq!(b, TokenId::new(1));
    assert_eq!(c, TokenId::new(2));
    assert_eq!(buffer.len(), 3);

    let ids: Vec<TokenId> = buffer.iter_ids().collect();
    assert_eq!(ids, vec![a, b, c]);
}

#[test]
fn payloads_round_trip() {
    let mut buffer = TokenBuffer::new();
    let t_none = buffer.create_token(TokenKind::Comma, loc(1, 1));
    let t_bool = buffer.create_token_bool(TokenKind::BoolLiteral, loc(1, 2), true);
    let t_int = buffer.create_token_int(TokenKind::IntLiteral, loc(1, 7), u64::MAX);
    let t_float = buffer.create_token_float(TokenKind::FloatLiteral, loc(1, 9), 2.5);
    let t_str = buffer.create_token_str(TokenKind::StringLiteral, loc(1, 13), "hello".to_string());

    assert_eq!(buffer.get(t_none).payload, TokenPayload::None);
    assert_eq!(buffer.get(t_bool).bool_value(), Some(true));
    assert_eq!(buffer.get(t_int).int_value(), Some(u64::MAX));
    assert_eq!(buffer.get(t_float).float_value(), Some(2.5));
    assert_eq!(buffer.str_value(buffer.get(t_str)), Some("hello"));
    assert_eq!(buffer.get(t_none).int_value(), None);
}

#[test]
fn literal_addresses_survive_growth() {
    let mut buffer = TokenBuffer::new();
    let first = buffer.create_token_str(TokenKind::Ident, loc(1, 1), "anchor".to_string());
    let first_id = buffer.get(first).str_id().unwrap();
    let before = buffer.literal(first_id).as_ptr();

    for i in 0..1000 {
        buffer.create_token_str(TokenKind::Ident, loc(2, 1), format!("filler_{i}"));
    }

    let after = buffer.literal(first_id).as_ptr();
    assert_eq!(before, after, "string payload moved during buffer growth");
    assert_eq!(buffer.literal(first_id), "anchor");
}

#[test]
#[should_panic(expected = "locked")]
fn create_token_after_lock_asserts() {
    let mut buffer = TokenBuffer::new();
    buffer.create_token(TokenKind::Eof, loc(1, 1));
    buffer.lock();
    assert!(buffer.is_locked());
    buffer.create_token(TokenKind::Eof, loc(1, 2));
}

#[test]
fn default_buffer_is_empty_and_unlocked() {
    let buffer = TokenBuffer::default();
    assert!(buffer.is_empty());
    assert!(!buffer.is_locked());
    assert_eq!(format!("{buffer:?}"), "TokenBuffer(0 tokens)");
}

#[test]
fn index_operator_matches_get() {
    let mut buffer = TokenBuffer::new();
    let id = buffer.create_token(TokenKind::KwLet, loc(1, 1));
    assert_eq!(buffer[id].kind, TokenKind::KwLet);
    assert!(buffer[id].kind.is_keyword());
}
