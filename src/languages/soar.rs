//! Soar production rules.

use crate::engine::Lexer;
use crate::options::LexerOptions;
use crate::rule::compose::StateSpec;
use crate::rule::{groups, rule, words};
use crate::token::TokenKind::*;

const BUILTIN_MACROS: &[&str] = &[
    "abs",
    "atan2",
    "capitalize-symbol",
    "compute-heading",
    "compute-range",
    "concat",
    "cos",
    "dc",
    "deep-copy",
    "div",
    "dont-learn",
    "exec",
    "float",
    "force-learn",
    "ifeq",
    "int",
    "link-stm-to-ltm",
    "make-constant-symbol",
    "max",
    "min",
    "mod",
    "rand-float",
    "rand-int",
    "round-off-heading",
    "round-off",
    "size",
    "sin",
    "sqrt",
    "strlen",
    "timestamp",
    "trim",
];

const BUILTIN_FUNCTIONS: &[&str] = &["crlf", "halt", "interrupt", "log", "wait", "write", "cmd"];

pub fn lexer() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"\s+", Whitespace),
            // production header: sp {name
            groups(r"(sp)(\s)(\{)([\S]+)", &[KeywordReserved, Whitespace, Punctuation, NameFunction])
                .behind(r"\A|\n"),
            rule(&words(&["sp", "state"], "", ""), KeywordReserved),
            rule(&words(BUILTIN_MACROS, "", ""), NameFunction),
            rule(&words(BUILTIN_FUNCTIONS, "", ""), NameBuiltin),
            rule("(#|\").*", CommentSingle),
            rule(r":[a-z-]+", NameAttribute),
            rule(r"-->", Punctuation),
            rule(r"[{}()]", Punctuation),
            rule(r"<[^>]+>", NameVariable),
            rule(r"\^[^\s]+", NameVariable),
            rule(r"(-|\+|=|<>|[{}])", Operator),
            rule(r"(<=>|<>|<=|>=|<|>)", Operator),
            rule(r"(@|!@|@\+|@-)", Operator),
            rule(r"(\d+\.\d*|\.\d+|\d+)", Number),
            rule(r"\b[a-zA-Z][a-zA-Z0-9_\-*]*", Literal),
            rule(r"\|[^|]*\|", String),
        ],
    );
    Lexer::new("Soar", &["soar"], &spec, LexerOptions::default()).expect("static grammar")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn test_production_header() {
        let lexer = lexer();
        let tokens: Vec<_> = lexer.tokenize("sp {my*rule\n").collect();
        assert_eq!(tokens[0].kind, TokenKind::KeywordReserved);
        assert_eq!(tokens[0].text, "sp");
        assert_eq!(tokens[2].kind, TokenKind::Punctuation);
        assert_eq!(tokens[3].kind, TokenKind::NameFunction);
        assert_eq!(tokens[3].text, "my*rule");
    }

    #[test]
    fn test_header_only_matches_at_line_start() {
        let lexer = lexer();
        // mid-line "sp {" must not be taken for a production header
        let tokens: Vec<_> = lexer.tokenize("x sp {y\n").collect();
        let sp = tokens.iter().find(|t| t.text == "sp").unwrap();
        assert_eq!(sp.kind, TokenKind::KeywordReserved);
        let y = tokens.iter().find(|t| t.text == "y").unwrap();
        assert_ne!(y.kind, TokenKind::NameFunction);
    }

    #[test]
    fn test_variables_and_attributes() {
        let lexer = lexer();
        let tokens: Vec<_> = lexer.tokenize("(<s> ^io.input-link <il>)").collect();
        assert!(tokens.iter().any(|t| t.kind == TokenKind::NameVariable && t.text == "<s>"));
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::NameVariable && t.text == "^io.input-link"));
    }
}
