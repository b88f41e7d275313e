//! Stream-level properties of the lexer engine.
//!
//! Whatever the grammar and whatever the input, a token stream must be
//! lossless (token texts concatenate back to the input), contiguous
//! (offsets tile the input with no gaps or overlaps) and finite. These
//! tests pin those properties on hand-built grammars and, via proptest,
//! on arbitrary inputs against the shipped language tables.

use hilex::languages::sql::PostgresConsole;
use hilex::rule::compose::StateSpec;
use hilex::rule::{groups_with, rule, Embedded, GroupSpec};
use hilex::token::Token;
use hilex::{languages, Lexer, LexerOptions, Registry, TokenKind};
use once_cell::sync::Lazy;
use proptest::prelude::*;

static REGISTRY: Lazy<Registry> = Lazy::new(languages::registry);

/// Every stream invariant in one place: tokens tile the input exactly.
fn assert_stream_invariants(tokens: &[Token], input: &str) {
    let mut expected = 0;
    for token in tokens {
        assert_eq!(
            token.offset, expected,
            "token {token:?} does not start where the previous one ended"
        );
        expected += token.text.len();
    }
    assert_eq!(expected, input.len(), "stream does not cover the input");
    let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(joined, input);
}

fn digits_lexer() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state("root", vec![rule(r"[0-9]+", TokenKind::Number)]);
    Lexer::new("digits", &["digits"], &spec, LexerOptions::default()).unwrap()
}

#[test]
fn test_error_recovery_example() {
    let lexer = digits_lexer();
    let tokens: Vec<Token> = lexer.tokenize("12a3").collect();
    assert_eq!(
        tokens,
        vec![
            Token::new(0, TokenKind::Number, "12"),
            Token::new(2, TokenKind::Error, "a"),
            Token::new(3, TokenKind::Number, "3"),
        ]
    );
}

#[test]
fn test_rule_priority_is_order_not_length() {
    // an earlier rule with a 1-character match must beat a later rule
    // with a 5-character match at the same position
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"a", TokenKind::Name),
            rule(r"aaaaa", TokenKind::Keyword),
        ],
    );
    let lexer = Lexer::new("t", &[], &spec, LexerOptions::default()).unwrap();
    let tokens: Vec<Token> = lexer.tokenize("aaaaa").collect();
    assert_eq!(tokens.len(), 5);
    for (i, token) in tokens.iter().enumerate() {
        assert_eq!(token.offset, i);
        assert_eq!(token.kind, TokenKind::Name);
        assert_eq!(token.text, "a");
    }
}

#[test]
fn test_delegation_reoffsets_by_prefix_length() {
    // tokens of the delegated span must equal the sub-lexer's standalone
    // tokens shifted by the span's start
    let mut registry = Registry::new();
    registry.register(digits_lexer());

    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            groups_with(
                r"(<)([^>]*)(>)",
                vec![
                    GroupSpec::Kind(TokenKind::Punctuation),
                    GroupSpec::Using(Embedded::Named("digits")),
                    GroupSpec::Kind(TokenKind::Punctuation),
                ],
            ),
            rule(r"[^<]+", TokenKind::Text),
        ],
    );
    let parent = Lexer::new("t", &[], &spec, LexerOptions::default()).unwrap();

    let inner = "12a34";
    let prefix = "prefix";
    let input = format!("{prefix}<{inner}>suffix");
    let parent_tokens: Vec<Token> = parent.tokenize_with(&input, &registry).collect();
    assert_stream_invariants(&parent_tokens, &input);

    let standalone: Vec<Token> = registry.get("digits").unwrap().tokenize(inner).collect();
    let shift = prefix.len() + 1;
    let delegated: Vec<Token> = parent_tokens
        .iter()
        .filter(|t| t.offset >= shift && t.offset < shift + inner.len())
        .cloned()
        .collect();
    assert_eq!(delegated.len(), standalone.len());
    for (got, want) in delegated.iter().zip(&standalone) {
        assert_eq!(got.offset, want.offset + shift);
        assert_eq!(got.kind, want.kind);
        assert_eq!(got.text, want.text);
    }
}

#[test]
fn test_streams_are_lazy() {
    // pulling one token must not require scanning the whole input
    let lexer = digits_lexer();
    let big = "1".repeat(1 << 20);
    let first = lexer.tokenize(&big).next().unwrap();
    assert_eq!(first.offset, 0);
}

#[test]
fn test_concurrent_runs_share_one_lexer() {
    let lexer = std::sync::Arc::new(digits_lexer());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let lexer = std::sync::Arc::clone(&lexer);
            std::thread::spawn(move || {
                let input = format!("{i}23x{i}");
                let tokens: Vec<Token> = lexer.tokenize(&input).collect();
                assert_stream_invariants(&tokens, &input);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

/// Inputs that mix plausible code fragments with junk.
fn arbitrary_source() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z_][a-zA-Z0-9_]*",
            "[0-9]+",
            Just("SELECT * FROM t;".to_string()),
            Just("-- comment".to_string()),
            Just("/* open".to_string()),
            Just("'unterminated".to_string()),
            Just("$$".to_string()),
            Just("(".to_string()),
            "[ \t\n]{0,3}",
            "[\\x00-\\x7f]{0,8}",
        ],
        0..12,
    )
    .prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn test_tokenization_is_lossless_for_all_languages(input in arbitrary_source()) {
        for name in [
            "ada", "amdgcn", "floscript", "macaulay2", "phix", "soar",
            "sql", "postgresql", "plpgsql", "tsql", "mysql", "rql",
            "tact", "tal",
        ] {
            let lexer = REGISTRY.get(name).unwrap();
            let tokens: Vec<Token> = lexer.tokenize_with(&input, &REGISTRY).collect();
            assert_stream_invariants(&tokens, &input);
        }
    }

    #[test]
    fn test_tokenization_terminates_in_linear_token_counts(input in arbitrary_source()) {
        // zero-length tokens are possible but bounded; the stream can never
        // hold more than a small multiple of the input length
        let lexer = REGISTRY.get("postgresql").unwrap();
        let tokens: Vec<Token> = lexer.tokenize_with(&input, &REGISTRY).collect();
        prop_assert!(tokens.len() <= 4 * input.len() + 4);
    }

    #[test]
    fn test_psql_console_is_lossless(lines in prop::collection::vec(
        prop_oneof![
            Just("db=> SELECT 1;".to_string()),
            Just("db=> SELECT *".to_string()),
            Just("db-> FROM t;".to_string()),
            Just("(1 row)".to_string()),
            Just(" 1".to_string()),
            Just("ERROR:  syntax error".to_string()),
            Just("NOTICE:  something".to_string()),
            Just("$ psql".to_string()),
            Just("db=> \\d tbl".to_string()),
            "[a-z0-9 ]{0,10}",
        ],
        0..8,
    )) {
        static CONSOLE: Lazy<PostgresConsole> = Lazy::new(PostgresConsole::default);

        let mut transcript = lines.join("\n");
        if !transcript.is_empty() {
            transcript.push('\n');
        }
        let tokens: Vec<Token> = CONSOLE.tokenize(&transcript, &REGISTRY).collect();
        assert_stream_invariants(&tokens, &transcript);
    }
}
