//! Token streams serialize for tooling that wants to dump them.

use hilex::languages;
use hilex::token::{Token, TokenKind};

#[test]
fn test_token_json_round_trip() {
    let registry = languages::registry();
    let lexer = registry.get("sql").unwrap();
    let tokens: Vec<Token> = lexer.tokenize("SELECT 1; -- done\n").collect();

    let json = serde_json::to_string(&tokens).unwrap();
    let back: Vec<Token> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tokens);
}

#[test]
fn test_kind_serializes_as_variant_name() {
    let json = serde_json::to_string(&TokenKind::CommentSingle).unwrap();
    assert_eq!(json, "\"CommentSingle\"");
}
