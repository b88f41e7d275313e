//! FloScript, the ioflo configuration language.

use crate::engine::Lexer;
use crate::options::LexerOptions;
use crate::rule::compose::StateSpec;
use crate::rule::{groups, include, rule};
use crate::token::TokenKind::*;

pub fn lexer() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"\s+", Whitespace),
            rule(r"[\]{}:(),;\[]", Punctuation),
            groups(r"(\\)(\n)", &[Text, Whitespace]),
            rule(r"\\", Text),
            rule(
                r"(to|by|with|from|per|for|cum|qua|via|as|at|in|of|on|re|is|if|be|into|and|not)\b",
                OperatorWord,
            ),
            rule(r"!=|==|<<|>>|[-~+/*%=<>&^|.]", Operator),
            rule(
                r"(load|init|server|logger|log|loggee|first|over|under|next|done|timeout|repeat|native|benter|enter|recur|exit|precur|renter|rexit|print|put|inc|copy|set|aux|rear|raze|go|let|do|bid|ready|start|stop|run|abort|use|flo|give|take)\b",
                NameBuiltin,
            ),
            rule(r"(frame|framer|house)\b", Keyword),
            rule("\"", String).push("string"),
            include("name"),
            include("numbers"),
            rule(r"#.+$", CommentSingle),
        ],
    );
    spec.state(
        "string",
        vec![rule("[^\"]+", String), rule("\"", String).pop()],
    );
    spec.state(
        "numbers",
        vec![
            rule(r"(\d+\.\d*|\d*\.\d+)([eE][+-]?[0-9]+)?j?", NumberFloat),
            rule(r"\d+[eE][+-]?[0-9]+j?", NumberFloat),
            rule(r"0[0-7]+j?", NumberOct),
            rule(r"0[bB][01]+", NumberBin),
            rule(r"0[xX][a-fA-F0-9]+", NumberHex),
            rule(r"\d+L", NumberIntegerLong),
            rule(r"\d+j?", NumberInteger),
        ],
    );
    spec.state(
        "name",
        vec![rule(r"@[\w.]+", NameDecorator), rule(r"[a-zA-Z_]\w*", Name)],
    );
    Lexer::new(
        "FloScript",
        &["floscript", "flo"],
        &spec,
        LexerOptions::default(),
    )
    .expect("static grammar")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn test_builtins_and_keywords() {
        let lexer = lexer();
        let tokens: Vec<_> = lexer.tokenize("house h1\n  init x to 1\n").collect();
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].text, "house");
        let init = tokens.iter().find(|t| t.text == "init").unwrap();
        assert_eq!(init.kind, TokenKind::NameBuiltin);
        let to = tokens.iter().find(|t| t.text == "to").unwrap();
        assert_eq!(to.kind, TokenKind::OperatorWord);
    }

    #[test]
    fn test_string_state_round_trips() {
        let lexer = lexer();
        let tokens: Vec<_> = lexer.tokenize("put \"hello world\" x").collect();
        let joined: std::string::String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, "put \"hello world\" x");
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenKind::String && t.text == "hello world"));
    }

    #[test]
    fn test_comment_runs_to_end_of_line() {
        let lexer = lexer();
        let tokens: Vec<_> = lexer.tokenize("x # comment\ny").collect();
        let comment = tokens.iter().find(|t| t.kind == TokenKind::CommentSingle).unwrap();
        assert_eq!(comment.text, "# comment");
    }
}
