//! Ada 95/2005 source code.
//!
//!     The heaviest user of nested states in the crate: subprogram, type,
//!     package and formal-part declarations each get their own state, most
//!     of which splice the root rules back in underneath their specific
//!     ones. Identifier-plus-separator pairs re-tokenize the separator by
//!     delegating back into the same lexer.

use crate::engine::Lexer;
use crate::options::LexerOptions;
use crate::rule::compose::StateSpec;
use crate::rule::{groups, groups_with, include, jump, rule, words, Embedded, GroupSpec};
use crate::token::TokenKind::*;

const KEYWORDS: &[&str] = &[
    "abort", "abs", "abstract", "accept", "access", "aliased", "all", "array", "at", "begin",
    "body", "case", "constant", "declare", "delay", "delta", "digits", "do", "else", "elsif",
    "end", "entry", "exception", "exit", "for", "goto", "if", "interface", "is", "limited",
    "loop", "new", "null", "of", "others", "out", "overriding", "pragma", "protected", "raise",
    "range", "record", "renames", "requeue", "return", "reverse", "select", "separate", "some",
    "subtype", "synchronized", "tagged", "task", "terminate", "then", "type", "until", "when",
    "while",
];

const BUILTINS: &[&str] = &[
    "Address",
    "Boolean",
    "Character",
    "Controlled",
    "Count",
    "Cursor",
    "Duration",
    "File_Mode",
    "File_Type",
    "Float",
    "Integer",
    "Long_Float",
    "Long_Integer",
    "Long_Long_Float",
    "Long_Long_Integer",
    "Natural",
    "Positive",
    "Short_Float",
    "Short_Integer",
    "Short_Short_Integer",
    "String",
    "Wide_Character",
    "Wide_String",
    "Wide_Wide_Character",
    "Wide_Wide_String",
];

pub fn lexer() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"[^\S\n]+", Text),
            rule(r"--.*?\n", CommentSingle),
            rule(r"function|procedure|entry", KeywordDeclaration).push("subprogram"),
            groups(r"(subtype|type)(\s+)(\w+)", &[KeywordDeclaration, Text, KeywordType])
                .push("type_def"),
            rule(r"task|protected", KeywordDeclaration),
            groups(r"(subtype)(\s+)", &[KeywordDeclaration, Text]),
            groups(r"(end)(\s+)", &[KeywordReserved, Text]).push("end"),
            groups(r"(pragma)(\s+)(\w+)", &[KeywordReserved, Text, CommentPreproc]),
            rule(r"(true|false|null)\b", KeywordConstant),
            rule(&words(BUILTINS, "", r"\b"), KeywordType),
            rule(r"(and(\s+then)?|in|mod|not|or(\s+else)|rem)\b", OperatorWord),
            rule(r"generic|private", KeywordDeclaration),
            rule(r"package", KeywordDeclaration).push("package"),
            rule(r"array\b", KeywordReserved).push("array_def"),
            groups(r"(with|use)(\s+)", &[KeywordNamespace, Text]).push("import"),
            groups(
                r"(\w+)(\s*)(:)(\s*)(constant)",
                &[NameConstant, Text, Punctuation, Text, KeywordReserved],
            ),
            rule(r"<<\w+>>", NameLabel),
            groups(
                r"(\w+)(\s*)(:)(\s*)(declare|begin|loop|for|while)",
                &[NameLabel, Text, Punctuation, Text, KeywordReserved],
            ),
            rule(&words(KEYWORDS, r"\b", r"\b"), KeywordReserved),
            rule(r#""[^"]*""#, String),
            include("attribute"),
            include("numbers"),
            rule(r"'[^']'", StringChar),
            groups_with(
                r"(\w+)(\s*|[(,])",
                vec![GroupSpec::Kind(Name), GroupSpec::Using(Embedded::This)],
            ),
            rule(r"(<>|=>|:=|@|[\[\]]|[()|:;,.'])", Punctuation),
            rule(r"[*<>+=/&-]", Operator),
            rule(r"\n+", Text),
        ],
    );
    spec.state(
        "numbers",
        vec![
            rule(r"[0-9_]+#[0-9a-f_.]+#", NumberHex),
            rule(r"[0-9_]+\.[0-9_]*", NumberFloat),
            rule(r"[0-9_]+", NumberInteger),
        ],
    );
    spec.state(
        "attribute",
        vec![groups(r"(')(\w+)", &[Punctuation, NameAttribute])],
    );
    spec.state(
        "subprogram",
        vec![
            rule(r"\(", Punctuation).pop().push("formal_part"),
            rule(r";", Punctuation).pop(),
            rule(r"is\b", KeywordReserved).pop(),
            rule(r#""[^"]+"|\w+"#, NameFunction),
            include("root"),
        ],
    );
    spec.state(
        "end",
        vec![
            rule("(if|case|record|loop|select)", KeywordReserved),
            rule(r#""[^"]+"|[\w.]+"#, NameFunction),
            rule(r"\s+", Text),
            rule(";", Punctuation).pop(),
        ],
    );
    spec.state(
        "type_def",
        vec![
            rule(r";", Punctuation).pop(),
            rule(r"\(", Punctuation).push("formal_part"),
            rule(r"\[", Punctuation).push("formal_part"),
            rule(r"with|and|use", KeywordReserved),
            rule(r"array\b", KeywordReserved).pop().push("array_def"),
            rule(r"record\b", KeywordReserved).push("record_def"),
            groups(r"(null record)(;)", &[KeywordReserved, Punctuation]).pop(),
            include("root"),
        ],
    );
    spec.state(
        "array_def",
        vec![
            rule(r";", Punctuation).pop(),
            groups(r"(\w+)(\s+)(range)", &[KeywordType, Text, KeywordReserved]),
            include("root"),
        ],
    );
    spec.state(
        "record_def",
        vec![rule(r"end record", KeywordReserved).pop(), include("root")],
    );
    spec.state(
        "import",
        vec![rule(r"[\w.]+", Name).pop(), jump().pop()],
    );
    spec.state(
        "formal_part",
        vec![
            rule(r"\)", Punctuation).pop(),
            rule(r"\]", Punctuation).pop(),
            rule(r"\w+", NameVariable),
            rule(r",|:[^=]", Punctuation),
            rule(r"(in|not|null|out|access)\b", KeywordReserved),
            include("root"),
        ],
    );
    spec.state(
        "package",
        vec![
            rule("body", KeywordDeclaration),
            rule(r"is\s+new|renames", KeywordReserved),
            rule("is", KeywordReserved).pop(),
            rule(";", Punctuation).pop(),
            rule(r"\(", Punctuation).push("package_instantiation"),
            rule(r"[\w.]+", NameClass),
            include("root"),
        ],
    );
    spec.state(
        "package_instantiation",
        vec![
            groups(r#"("[^"]+"|\w+)(\s+)(=>)"#, &[NameVariable, Text, Punctuation]),
            rule(r#"[\w.'"]"#, Text),
            rule(r"\)", Punctuation).pop(),
            include("root"),
        ],
    );
    Lexer::new(
        "Ada",
        &["ada", "ada95", "ada2005"],
        &spec,
        LexerOptions::case_insensitive(),
    )
    .expect("static grammar")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn collect(text: &str) -> Vec<crate::token::Token> {
        lexer().tokenize(text).collect()
    }

    #[test]
    fn test_procedure_declaration() {
        let tokens = collect("procedure Hello is\n");
        assert_eq!(tokens[0].kind, TokenKind::KeywordDeclaration);
        assert_eq!(tokens[0].text, "procedure");
        let name = tokens.iter().find(|t| t.text == "Hello").unwrap();
        assert_eq!(name.kind, TokenKind::NameFunction);
        let is_kw = tokens.iter().find(|t| t.text == "is").unwrap();
        assert_eq!(is_kw.kind, TokenKind::KeywordReserved);
    }

    #[test]
    fn test_with_clause_enters_import_state() {
        let tokens = collect("with Ada.Text_IO;\n");
        assert_eq!(tokens[0].kind, TokenKind::KeywordNamespace);
        let unit = tokens.iter().find(|t| t.text == "Ada.Text_IO").unwrap();
        assert_eq!(unit.kind, TokenKind::Name);
    }

    #[test]
    fn test_attribute_after_tick() {
        let tokens = collect("X'First\n");
        let attr = tokens.iter().find(|t| t.text == "First").unwrap();
        assert_eq!(attr.kind, TokenKind::NameAttribute);
    }

    #[test]
    fn test_based_literal() {
        let tokens = collect("16#FF_FF#\n");
        assert_eq!(tokens[0].kind, TokenKind::NumberHex);
        assert_eq!(tokens[0].text, "16#FF_FF#");
    }

    #[test]
    fn test_case_insensitivity() {
        let tokens = collect("PROCEDURE P IS\n");
        assert_eq!(tokens[0].kind, TokenKind::KeywordDeclaration);
    }

    #[test]
    fn test_lossless_over_sample() {
        let sample = "package body Stack is\n   procedure Push (X : Integer) is\n   begin\n      null;\n   end Push;\nend Stack;\n";
        let joined: std::string::String =
            collect(sample).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, sample);
    }
}
