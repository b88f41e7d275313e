//! Phix (.exw) source files.
//!
//!     The full builtin routine/constant vocabulary runs to over a thousand
//!     names; the tables here are representative subsets.

use crate::engine::Lexer;
use crate::options::LexerOptions;
use crate::rule::compose::StateSpec;
use crate::rule::{rule, words};
use crate::token::TokenKind::*;

const PREPROC: &[&str] = &["ifdef", "elsifdef", "elsedef"];

const TYPES: &[&str] = &[
    "string",
    "nullable_string",
    "atom_string",
    "atom",
    "bool",
    "boolean",
    "cdCanvas",
    "complex",
    "dictionary",
    "int",
    "integer",
    "Ihandle",
    "Ihandln",
    "mpfr",
    "mpq",
    "mpz",
    "number",
    "rid_string",
    "seq",
    "sequence",
    "timedate",
    "object",
];

const KEYWORDS: &[&str] = &[
    "abstract", "class", "continue", "export", "extends", "nullable", "private", "public",
    "static", "struct", "trace", "and", "break", "by", "case", "catch", "const", "constant",
    "debug", "default", "do", "else", "elsif", "end", "enum", "exit", "fallthru", "fallthrough",
    "for", "forward", "function", "global", "if", "in", "include", "js", "javascript", "let",
    "not", "or", "procedure", "profile", "return", "switch", "then", "to", "try", "type",
    "until", "warning", "while", "with", "without", "xor",
];

const ROUTINES: &[&str] = &[
    "abort",
    "abs",
    "append",
    "apply",
    "assert",
    "atan2",
    "binary_search",
    "call_func",
    "call_proc",
    "ceil",
    "columnize",
    "command_line",
    "compare",
    "concat",
    "cos",
    "crash",
    "custom_sort",
    "date",
    "deep_copy",
    "equal",
    "even",
    "exp",
    "extract",
    "factorial",
    "filter",
    "find",
    "find_all",
    "flatten",
    "floor",
    "format",
    "free_console",
    "gcd",
    "get_file_extension",
    "get_file_name",
    "get_file_path",
    "getd",
    "gets",
    "getc",
    "getenv",
    "head",
    "iff",
    "iif",
    "insert",
    "join",
    "join_path",
    "largest",
    "lcm",
    "length",
    "log",
    "log10",
    "log2",
    "lower",
    "machine_bits",
    "match",
    "max",
    "min",
    "mod",
    "odd",
    "open",
    "pad_head",
    "pad_tail",
    "peek",
    "permute",
    "platform",
    "poke",
    "power",
    "prepend",
    "printf",
    "product",
    "prompt_number",
    "prompt_string",
    "puts",
    "rand",
    "remainder",
    "remove",
    "repeat",
    "replace",
    "reverse",
    "rfind",
    "round",
    "routine_id",
    "scanf",
    "series",
    "setd",
    "shuffle",
    "sign",
    "sin",
    "smallest",
    "sort",
    "speak",
    "splice",
    "split",
    "split_path",
    "sprint",
    "sprintf",
    "sqrt",
    "sum",
    "system",
    "system_exec",
    "tail",
    "tan",
    "time",
    "to_integer",
    "to_number",
    "to_string",
    "trim",
    "trim_head",
    "trim_tail",
    "trunc",
    "typeof",
    "unique",
    "upper",
    "version",
    "vslice",
    "walk_dir",
    "wildcard_match",
];

const CONSTANTS: &[&str] = &[
    "ASCENDING",
    "BLACK",
    "BLUE",
    "BRIGHT_GREEN",
    "BRIGHT_RED",
    "BRIGHT_WHITE",
    "C_INT",
    "C_POINTER",
    "CYAN",
    "D_NAME",
    "DT_YEAR",
    "DT_MONTH",
    "DT_DAY",
    "EULER",
    "E_CODE",
    "false",
    "False",
    "FALSE",
    "GET_EOF",
    "GET_SUCCESS",
    "GRAY",
    "GREEN",
    "LINUX",
    "MAGENTA",
    "Nan",
    "null",
    "NULL",
    "PI",
    "RED",
    "SEEK_OK",
    "SLASH",
    "true",
    "True",
    "TRUE",
    "WHITE",
    "WINDOWS",
    "YELLOW",
];

pub fn lexer() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"\s+", Whitespace),
            rule(r"/\*|--/\*|#\[", CommentMultiline).push("comment"),
            rule(r"(?://|--|#!).*$", CommentSingle),
            rule(r#""([^"\\]|\\.)*""#, StringOther),
            rule(r"'[^']*'", StringOther),
            rule(r"`[^`]*`", StringOther),
            rule(&words(TYPES, r"\b", r"\b"), NameFunction),
            rule(&words(ROUTINES, r"\b", r"\b"), NameFunction),
            rule(&words(PREPROC, r"\b", r"\b"), KeywordDeclaration),
            rule(&words(KEYWORDS, r"\b", r"\b"), KeywordDeclaration),
            rule(&words(CONSTANTS, r"\b", r"\b"), NameConstant),
            rule(r"!=|==|<<|>>|:=|[-~+/*%=<>&^|.(){},?:\[\]$\\;#]", Operator),
            rule(r"[\w-]+", Text),
        ],
    );
    spec.state(
        "comment",
        vec![
            rule(r"[^*/#]+", CommentMultiline),
            rule(r"/\*|#\[", CommentMultiline).push_again(),
            rule(r"\*/|#\]", CommentMultiline).pop(),
            rule(r"[*/#]", CommentMultiline),
        ],
    );
    Lexer::new("Phix", &["phix"], &spec, LexerOptions::default()).expect("static grammar")
}
