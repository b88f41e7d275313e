//! Macaulay2, the computer algebra system.
//!
//!     The language exports thousands of types, functions and constants;
//!     the vocabulary tables here are representative subsets.

use crate::engine::Lexer;
use crate::options::LexerOptions;
use crate::rule::compose::StateSpec;
use crate::rule::{rule, words};
use crate::token::TokenKind::*;

const M2_KEYWORDS: &[&str] = &[
    "and",
    "break",
    "catch",
    "continue",
    "do",
    "elapsedTime",
    "elapsedTiming",
    "else",
    "for",
    "from",
    "global",
    "if",
    "in",
    "list",
    "local",
    "new",
    "not",
    "of",
    "or",
    "return",
    "shield",
    "SPACE",
    "step",
    "symbol",
    "then",
    "threadVariable",
    "throw",
    "time",
    "timing",
    "to",
    "try",
    "when",
    "while",
    "xor",
];

const M2_DATATYPES: &[&str] = &[
    "Array",
    "BasicList",
    "Boolean",
    "CC",
    "ChainComplex",
    "CoherentSheaf",
    "Function",
    "GradedModule",
    "GroebnerBasis",
    "HashTable",
    "Ideal",
    "List",
    "Matrix",
    "Module",
    "MonomialIdeal",
    "MutableHashTable",
    "MutableList",
    "Net",
    "Number",
    "OptionTable",
    "PolynomialRing",
    "ProjectiveVariety",
    "QQ",
    "Ring",
    "RingElement",
    "RingMap",
    "RR",
    "Sequence",
    "Set",
    "String",
    "Symbol",
    "Tally",
    "Thing",
    "Type",
    "Variety",
    "Vector",
    "VisibleList",
    "ZZ",
];

const M2_FUNCTIONS: &[&str] = &[
    "accumulate",
    "apply",
    "ascii",
    "basis",
    "betti",
    "ceiling",
    "char",
    "coefficients",
    "cokernel",
    "decompose",
    "degree",
    "determinant",
    "diff",
    "dim",
    "factor",
    "flatten",
    "floor",
    "gcd",
    "generators",
    "genus",
    "getChange",
    "homology",
    "ideal",
    "image",
    "intersect",
    "inverse",
    "kernel",
    "koszul",
    "leadTerm",
    "map",
    "matrix",
    "minors",
    "monomialIdeal",
    "needsPackage",
    "netList",
    "peek",
    "primaryDecomposition",
    "print",
    "product",
    "quotient",
    "radical",
    "rank",
    "resolution",
    "ring",
    "saturate",
    "scan",
    "select",
    "sort",
    "source",
    "sum",
    "syz",
    "target",
    "toString",
    "trim",
    "vars",
];

const M2_CONSTANTS: &[&str] = &[
    "applicationDirectorySuffix",
    "CacheDirectory",
    "currentFileName",
    "DegreeLimit",
    "environment",
    "false",
    "homeDirectory",
    "infinity",
    "Limit",
    "MonomialOrder",
    "newline",
    "null",
    "pi",
    "prefixDirectory",
    "Strategy",
    "true",
    "Variable",
    "Verbose",
    "version",
];

pub fn lexer() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"--.*$", CommentSingle),
            rule(r"-\*", CommentMultiline).push("block comment"),
            rule("\"", String).push("quote string"),
            rule(r"///", String).push("slash string"),
            rule(&words(M2_KEYWORDS, r"\b", r"\b"), Keyword),
            rule(&words(M2_DATATYPES, r"\b", r"\b"), NameBuiltin),
            rule(&words(M2_FUNCTIONS, r"\b", r"\b"), NameFunction),
            rule(&words(M2_CONSTANTS, r"\b", r"\b"), NameConstant),
            rule(r"\s+", Whitespace),
            rule(r".", Text),
        ],
    );
    spec.state(
        "block comment",
        vec![
            rule(r"[^*-]+", CommentMultiline),
            rule(r"\*-", CommentMultiline).pop(),
            rule(r"[*-]", CommentMultiline),
        ],
    );
    spec.state(
        "quote string",
        vec![
            rule(r#"[^\\"]+"#, String),
            rule("\"", String).pop(),
            rule(r#"\\"?"#, String),
        ],
    );
    spec.state(
        "slash string",
        vec![
            rule(r"[^/]+", String),
            rule(r"(//)+", String).not_ahead("/"),
            rule(r"/(//)+", String).not_ahead("/").pop(),
            rule(r"/", String),
        ],
    );
    Lexer::new("Macaulay2", &["macaulay2"], &spec, LexerOptions::default())
        .expect("static grammar")
}
