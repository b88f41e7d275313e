//! Tact, the TON smart-contract language.
//!
//!     The grammar drives nearly everything off assertions: declaration
//!     states are entered on a look at the declaration head without
//!     consuming it, and left again once the closing brace of the body has
//!     gone by. Guard-only rules carry those assertions.

use crate::engine::Lexer;
use crate::options::LexerOptions;
use crate::rule::compose::StateSpec;
use crate::rule::{groups, include, jump, rule};
use crate::token::TokenKind::*;

/// Declaration keywords may follow a spread `...` but not a plain `.` or
/// `$`; used as a negative behind-guard.
const NOT_AFTER_DOT_OR_DOLLAR: &str = r"\$|(?:\A|[^.])\.{1,2}";

const FUN_MODIFIERS: &str = r"(?:(?:get|native|extends|mutates|virtual|override|inline|abstract)\s*)*";

pub fn lexer() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"\s+", Whitespace),
            rule(r"[.;(),\[\]{}]", Punctuation),
            rule(r"\?|!!", Operator),
            include("comments"),
            include("import-in"),
            include("struct-in"),
            include("contract-or-trait-in"),
            include("annotation-in"),
            include("fun-declaration-in"),
            include("const-declaration-in"),
            include("statements"),
        ],
    );
    spec.state(
        "import-in",
        vec![groups(r"(import)\b(\s*)", &[Keyword, Whitespace])
            .not_behind(NOT_AFTER_DOT_OR_DOLLAR)
            .push("import")],
    );
    spec.state(
        "import",
        vec![
            rule(r"\s*;", Punctuation).pop(),
            include("comments"),
            include("string-in"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "struct-in",
        vec![groups(r"(struct|message)\b", &[Keyword])
            .not_behind(NOT_AFTER_DOT_OR_DOLLAR)
            .push("struct")],
    );
    spec.state(
        "struct",
        vec![
            jump().behind(r"\}").pop(),
            include("comments"),
            include("struct-header"),
            include("struct-body-in"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "struct-header",
        vec![
            include("comments"),
            rule(r"\b[\w]+\b", NameClass),
            rule(
                r"\(((?:\b0(?:x|X)[0-9a-fA-F][0-9a-fA-F_]*\b)|(?:\b[0-9]+\b))\)",
                Number,
            ),
        ],
    );
    spec.state(
        "struct-body-in",
        vec![rule(r"\{", Punctuation).push("struct-body")],
    );
    spec.state(
        "struct-body",
        vec![
            rule(r"\}", Punctuation).pop(),
            include("comments"),
            include("field-declaration-in"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "contract-or-trait-in",
        vec![rule(r"(?:contract|trait)\b", Keyword)
            .not_behind(NOT_AFTER_DOT_OR_DOLLAR)
            .push("contract-or-trait")],
    );
    spec.state(
        "contract-or-trait",
        vec![
            jump().behind(r"\}").pop(),
            include("comments"),
            rule("with", Keyword),
            rule(r"\b[\w]+\b", NameClass),
            include("contract-or-trait-body-in"),
            rule(r"\s+", Whitespace),
            rule(",", Punctuation),
        ],
    );
    spec.state(
        "contract-or-trait-body-in",
        vec![rule(r"\{", Punctuation).push("contract-or-trait-body")],
    );
    spec.state(
        "contract-or-trait-body",
        vec![
            rule(r"\}", Punctuation).pop(),
            include("comments"),
            include("init-declaration-in"),
            include("receive-declaration-in"),
            include("bounce-declaration-in"),
            include("fun-declaration-in"),
            include("const-declaration-in"),
            include("field-declaration-in"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "field-declaration-in",
        vec![rule(r"\b[\w]+\b", NameProperty).push("field-declaration")],
    );
    spec.state(
        "field-declaration",
        vec![
            rule(r";", Punctuation).pop(),
            include("comments"),
            include("type-annotation-in"),
            include("variable-init-in"),
        ],
    );
    spec.state(
        "const-declaration-in",
        vec![jump()
            .ahead(&format!(r"{FUN_MODIFIERS}const\b"))
            .push("const-declaration")],
    );
    spec.state(
        "const-declaration",
        vec![
            rule(r";", Punctuation).pop(),
            rule(r"const", Keyword),
            rule(
                r"\b(get|native|extends|mutates|virtual|override|inline|abstract)\b",
                Keyword,
            ),
            rule(r"\b[\w]+\b", NameConstant),
            include("comments"),
            include("type-annotation-in"),
            include("variable-init-in"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "init-declaration-in",
        vec![rule(r"init", Keyword).push("init-declaration")],
    );
    spec.state(
        "init-declaration",
        vec![
            jump().behind(r"\}").pop(),
            include("comments"),
            include("fun-arguments-in"),
            include("block-declaration-in"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "receive-declaration-in",
        vec![rule(r"receive|external", Keyword).push("receive-declaration")],
    );
    spec.state(
        "receive-declaration",
        vec![
            jump().behind(r"\}").pop(),
            include("comments"),
            include("fun-arguments-in"),
            include("block-declaration-in"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "bounce-declaration-in",
        vec![rule(r"bounced", Keyword).push("bounce-declaration")],
    );
    spec.state(
        "bounce-declaration",
        vec![
            jump().behind(r"\}").pop(),
            include("comments"),
            include("fun-arguments-in"),
            include("block-declaration-in"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "fun-declaration-in",
        vec![jump()
            .ahead(&format!(r"{FUN_MODIFIERS}fun\b"))
            .push("fun-declaration")],
    );
    spec.state(
        "fun-declaration",
        vec![
            jump().behind(r"[};]").pop(),
            rule(r"fun", Keyword),
            rule(
                r"\b(get|native|extends|mutates|virtual|override|inline|abstract)\b",
                Keyword,
            ),
            rule(r"\b[\w]+\b", NameFunction),
            include("fun-declaration-body"),
            rule(r"[,;]", Punctuation),
        ],
    );
    spec.state(
        "fun-declaration-body",
        vec![
            include("comments"),
            include("fun-arguments-in"),
            include("type-annotation-in"),
            include("block-declaration-in"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "fun-arguments-in",
        vec![rule(r"\(", Punctuation).push("fun-arguments")],
    );
    spec.state(
        "fun-arguments",
        vec![
            rule(r"\)", Punctuation).pop(),
            include("comments"),
            include("string-in"),
            include("type-annotation-in"),
            rule(r"(self)|(\b[\w]+\b)", NameVariable),
            rule(",", Punctuation),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "block-declaration-in",
        vec![rule(r"\{", Punctuation).push("block-declaration")],
    );
    spec.state(
        "block-declaration",
        vec![rule(r"\}", Punctuation).pop(), include("statements")],
    );
    spec.state(
        "statements",
        vec![
            include("comments"),
            include("block-declaration-in"),
            include("expressions"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "annotation-in",
        vec![groups(r"(@)([\w_]+)(\()", &[KeywordPseudo, Keyword, Punctuation]).push("annotation")],
    );
    spec.state(
        "annotation",
        vec![
            rule(r"\)", Punctuation).pop(),
            include("annotation-argument"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "annotation-argument",
        vec![rule(r"[\w_]+", NameFunctionMagic)],
    );
    spec.state(
        "expressions",
        vec![
            include("comments"),
            include("type-annotation-in"),
            include("keywords"),
            include("numeric"),
            include("string-in"),
            include("variable"),
            include("function-call"),
            include("struct-init-in"),
        ],
    );
    spec.state(
        "struct-init-in",
        vec![groups(r"(\b[\w]+\b)(\s*)(\{)", &[NameClass, Whitespace, Punctuation])
            .push("struct-init")],
    );
    spec.state(
        "struct-init",
        vec![
            rule(r"\}", Punctuation).pop(),
            include("comments"),
            include("struct-property-in"),
            rule(r"\s+", Whitespace),
            rule(",", Punctuation),
        ],
    );
    spec.state(
        "struct-property-in",
        vec![groups(r"(\b[\w]+\b)(\s*)(:)", &[NameProperty, Whitespace, Punctuation])
            .push("struct-property")],
    );
    spec.state(
        "struct-property",
        vec![
            jump().ahead(r"[},]").pop(),
            include("comments"),
            include("expressions"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "variable-init-in",
        vec![rule(r"=", Operator).push("variable-init")],
    );
    spec.state(
        "variable-init",
        vec![
            jump().ahead(r"[}{,;]").pop(),
            include("comments"),
            include("expressions"),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "type-annotation-in",
        vec![rule(r":\s+", Punctuation).push("type-annotation")],
    );
    spec.state(
        "type-annotation",
        vec![
            jump().ahead(r"[{;=,)]").pop(),
            include("comments"),
            include("type-as-in"),
            include("type-generic-in"),
            rule(r"\?", Operator),
            rule(r"\b[\w]+\b", KeywordType),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "type-generic-in",
        vec![rule("<", Punctuation).push("type-generic")],
    );
    spec.state(
        "type-generic",
        vec![
            rule(">", Punctuation).pop(),
            include("comments"),
            include("type-as-in"),
            rule(r"\b[\w]+\b", KeywordType),
            rule(r"\s+", Whitespace),
            rule(",", Punctuation),
        ],
    );
    spec.state(
        "type-as-in",
        vec![rule(r"(as)\s+", Keyword).push("type-as")],
    );
    spec.state(
        "type-as",
        vec![
            jump().ahead(r"[{;=,)>]").pop(),
            include("comments"),
            rule(r"\b[\w]+\b", KeywordType),
            rule(r"\s+", Whitespace),
        ],
    );
    spec.state(
        "keywords",
        vec![
            rule(
                r"\b(if|else|while|do|until|repeat|return|extends|mutates|virtual|override|inline|native|let|const|fun|self|is|initOf|map|bounced|get|as)\b",
                Keyword,
            ),
            rule(
                r"<=>|>=|<=|!=|==|\^>>|~>>|>>|<<|/%|\^%|~%|\^/|~/|\+=|-=|\*=|/=|~/=|\^/=|%=|\^%=|<<=|>>=|~>>=|\^>>=|&=|\|=|\^=|\^|=|~|/|%|-|\*|\+|>|<|&|\||:|\?",
                Operator,
            )
            .ahead(r"\s"),
            rule(r"\b(true|false)\b", KeywordConstant),
        ],
    );
    spec.state("string-in", vec![rule("\"", String).push("string")]);
    spec.state(
        "string",
        vec![
            rule("\"", String).pop(),
            rule(r"\\.", StringEscape),
            rule("[^\\\\\"]+", StringDouble),
        ],
    );
    spec.state(
        "numeric",
        vec![rule(
            r"(?:\b0(?:x|X)[0-9a-fA-F][0-9a-fA-F_]*\b)|(?:\b[0-9]+\b)",
            Number,
        )],
    );
    spec.state(
        "comments",
        vec![
            rule(r"//(.*)", CommentSingle),
            rule(r"/\*", CommentMultiline).push("comments-multiline"),
        ],
    );
    spec.state(
        "comments-multiline",
        vec![
            rule(r"\*/", CommentMultiline).pop(),
            rule(r"[^*]+", CommentMultiline),
            rule(r"[*]", CommentMultiline),
        ],
    );
    spec.state(
        "variable",
        vec![rule(r"[\w]+\b", NameVariable).not_ahead(r"\s*[({]")],
    );
    spec.state(
        "function-call",
        vec![rule(r"[\w]+\b", NameFunction).ahead(r"\s*\(").not_ahead(r"\s*\{")],
    );
    Lexer::new("Tact", &["tact"], &spec, LexerOptions::default()).expect("static grammar")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn collect(text: &str) -> Vec<crate::token::Token> {
        lexer().tokenize(text).collect()
    }

    fn joined(tokens: &[crate::token::Token]) -> std::string::String {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_contract_declaration() {
        let source = "contract Wallet with Ownable {\n}\n";
        let tokens = collect(source);
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].text, "contract");
        let class = tokens.iter().find(|t| t.text == "Wallet").unwrap();
        assert_eq!(class.kind, TokenKind::NameClass);
        assert_eq!(joined(&tokens), source);
    }

    #[test]
    fn test_fun_declaration_dispatch() {
        let source = "fun add(a: Int, b: Int) {\nreturn a;\n}\n";
        let tokens = collect(source);
        let fun_kw = tokens.iter().find(|t| t.text == "fun").unwrap();
        assert_eq!(fun_kw.kind, TokenKind::Keyword);
        let name = tokens.iter().find(|t| t.text == "add").unwrap();
        assert_eq!(name.kind, TokenKind::NameFunction);
        let ty = tokens.iter().find(|t| t.text == "Int").unwrap();
        assert_eq!(ty.kind, TokenKind::KeywordType);
        assert_eq!(joined(&tokens), source);
    }

    #[test]
    fn test_variable_vs_function_call() {
        let source = "fun f() {\nfoo(bar);\n}\n";
        let tokens = collect(source);
        let foo = tokens.iter().find(|t| t.text == "foo").unwrap();
        assert_eq!(foo.kind, TokenKind::NameFunction);
        let bar = tokens.iter().find(|t| t.text == "bar").unwrap();
        assert_eq!(bar.kind, TokenKind::NameVariable);
    }

    #[test]
    fn test_struct_with_message_id() {
        let source = "message(0x7362d09c) TokenNotification {\namount: Int as coins;\n}\n";
        let tokens = collect(source);
        assert_eq!(tokens[0].text, "message");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        let id = tokens.iter().find(|t| t.kind == TokenKind::Number).unwrap();
        assert_eq!(id.text, "(0x7362d09c)");
        let prop = tokens.iter().find(|t| t.text == "amount").unwrap();
        assert_eq!(prop.kind, TokenKind::NameProperty);
        let as_ty = tokens.iter().find(|t| t.text == "coins").unwrap();
        assert_eq!(as_ty.kind, TokenKind::KeywordType);
        assert_eq!(joined(&tokens), source);
    }

    #[test]
    fn test_import_not_after_dot() {
        // "a.import" is property access, not an import statement
        let tokens = collect("a.import x;\n");
        let import = tokens.iter().find(|t| t.text == "import").unwrap();
        assert_ne!(import.kind, TokenKind::Keyword);
    }

    #[test]
    fn test_import_statement() {
        let source = "import \"@stdlib/deploy\";\n";
        let tokens = collect(source);
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(joined(&tokens), source);
    }

    #[test]
    fn test_comments_nested_states() {
        let source = "// line\n/* block */ let x = 1;\n";
        let tokens = collect(source);
        assert_eq!(tokens[0].kind, TokenKind::CommentSingle);
        assert!(tokens.iter().any(|t| t.kind == TokenKind::CommentMultiline));
        assert_eq!(joined(&tokens), source);
    }
}
