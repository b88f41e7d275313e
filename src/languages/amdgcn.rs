//! AMD GCN ISA assembly.

use crate::engine::Lexer;
use crate::options::LexerOptions;
use crate::rule::compose::StateSpec;
use crate::rule::rule;
use crate::token::TokenKind::*;

pub fn lexer() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"\s+", Whitespace),
            rule(r"[\r\n]+", Text),
            rule(r"([a-z_0-9])*:([a-z_0-9])*", NameAttribute),
            rule(r"[\[\](),:&]", Text),
            rule(r"([;#]|//).*?\n", CommentSingle),
            rule(r"(s_)?(ds|buffer|flat|image)_[a-z0-9_]+", KeywordReserved),
            rule(r"_lo|_hi", NameVariable),
            rule(r"vmcnt|lgkmcnt|expcnt|lit|unorm|glc", NameAttribute),
            rule(r"label_[a-z0-9]+", Keyword),
            rule(r"_L[0-9]*", NameVariable),
            rule(r"(s|v)_[a-z0-9_]+", Keyword),
            rule(r"v[0-9.]+|vcc|exec|v", NameVariable),
            rule(r"s[0-9.]+|s", NameVariable),
            rule(r"[0-9]+\.[^0-9]+", NumberFloat),
            rule(r"(0[xX][a-z0-9]+)|([0-9]+)", NumberInteger),
        ],
    );
    Lexer::new("AMDGCN", &["amdgcn"], &spec, LexerOptions::case_insensitive())
        .expect("static grammar")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn test_instruction_classification() {
        let lexer = lexer();
        let tokens: Vec<_> = lexer.tokenize("s_load_dword s0, s[0:1]\n").collect();
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].text, "s_load_dword");
        let joined: std::string::String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, "s_load_dword s0, s[0:1]\n");
    }

    #[test]
    fn test_memory_op_is_reserved() {
        let lexer = lexer();
        let first = lexer.tokenize("buffer_load_format_x v0").next().unwrap();
        assert_eq!(first.kind, TokenKind::KeywordReserved);
    }
}
