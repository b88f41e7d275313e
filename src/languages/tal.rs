//! Uxntal, the assembly language of the Uxn virtual machine.
//!
//!     Everything in Uxntal is whitespace-separated, including the comment
//!     parens: `( foo )` is a comment, `(foo)` is not. The guards on each
//!     rule enforce that isolation.

use crate::engine::Lexer;
use crate::options::LexerOptions;
use crate::rule::compose::StateSpec;
use crate::rule::{rule, words};
use crate::token::TokenKind::*;

const INSTRUCTIONS: &[&str] = &[
    "BRK", "LIT", "INC", "POP", "DUP", "NIP", "SWP", "OVR", "ROT", "EQU", "NEQ", "GTH", "LTH",
    "JMP", "JCN", "JSR", "STH", "LDZ", "STZ", "LDR", "STR", "LDA", "STA", "DEI", "DEO", "ADD",
    "SUB", "MUL", "DIV", "AND", "ORA", "EOR", "SFT",
];

pub fn lexer() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "comment",
        vec![
            // nested comments
            rule(r"\(", CommentMultiline)
                .not_behind(r"\S")
                .not_ahead(r"\S")
                .push_again(),
            rule(r"\)", CommentMultiline)
                .not_behind(r"\S")
                .not_ahead(r"\S")
                .pop(),
            rule(r"(\S[()]|[()]\S|[^()])+", CommentMultiline),
        ],
    );
    spec.state(
        "root",
        vec![
            rule(r"\s+", Whitespace),
            rule(r"\(", CommentMultiline)
                .not_behind(r"\S")
                .not_ahead(r"\S")
                .push("comment"),
            rule(&words(INSTRUCTIONS, "", "2?k?r?"), KeywordReserved).not_behind(r"\S").not_ahead(r"\S"),
            rule(r"[\[\]{}]", Punctuation).not_ahead(r"\S"),
            rule(r"#([0-9a-f]{2}){1,2}", NumberHex).not_ahead(r"\S"),
            rule("\"\\S+", String),
            rule(r"'\S", StringChar).not_ahead(r"\S"),
            rule(r"([0-9a-f]{2}){1,2}", Literal).not_ahead(r"\S"),
            rule(r"[|$][0-9a-f]{1,4}", KeywordDeclaration).not_ahead(r"\S"),
            rule(r"%\S+", NameDecorator),
            rule(r"@\S+", NameFunction),
            rule(r"&\S+", NameLabel),
            rule(r"/\S+", NameTag),
            rule(r"\.\S+", NameVariableMagic),
            rule(r",\S+", NameVariableInstance),
            rule(r";\S+", NameVariableGlobal),
            rule(r":\S+", Literal),
            rule(r"~\S+", KeywordNamespace),
            rule(r"\S+", Name),
        ],
    );
    Lexer::new("Tal", &["tal", "uxntal"], &spec, LexerOptions::default()).expect("static grammar")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn kinds(text: &str) -> Vec<(TokenKind, std::string::String)> {
        lexer().tokenize(text).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_instructions_with_mode_suffixes() {
        let tokens = kinds("ADD2 DUP2k SUB\n");
        assert_eq!(tokens[0], (TokenKind::KeywordReserved, "ADD2".to_string()));
        assert_eq!(tokens[2], (TokenKind::KeywordReserved, "DUP2k".to_string()));
        assert_eq!(tokens[4], (TokenKind::KeywordReserved, "SUB".to_string()));
    }

    #[test]
    fn test_comment_needs_isolated_parens() {
        // "( foo )" is a comment
        let tokens = kinds("( foo )\n");
        assert!(tokens
            .iter()
            .all(|(k, t)| *k == TokenKind::CommentMultiline || t.trim().is_empty()));
        // "(foo)" is not
        let tokens = kinds("(foo)\n");
        assert_eq!(tokens[0], (TokenKind::Name, "(foo)".to_string()));
    }

    #[test]
    fn test_addressing_sigils() {
        let tokens = kinds("@main .ptr ;abs ,rel #12 |0100\n");
        let kinds_only: Vec<_> = tokens
            .iter()
            .filter(|(k, _)| *k != TokenKind::Whitespace)
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(
            kinds_only,
            vec![
                TokenKind::NameFunction,
                TokenKind::NameVariableMagic,
                TokenKind::NameVariableGlobal,
                TokenKind::NameVariableInstance,
                TokenKind::NumberHex,
                TokenKind::KeywordDeclaration,
            ]
        );
    }

    #[test]
    fn test_raw_hex_is_literal_only_when_isolated() {
        let tokens = kinds("12 12ab 12abc\n");
        assert_eq!(tokens[0].0, TokenKind::Literal);
        assert_eq!(tokens[2].0, TokenKind::Literal);
        // five hex chars is not a valid raw integer
        assert_eq!(tokens[4], (TokenKind::Name, "12abc".to_string()));
    }
}
