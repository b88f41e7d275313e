//! The SQL family: ANSI SQL, PostgreSQL, PL/pgSQL, Transact-SQL, MySQL,
//! RQL, plus the psql and sqlite3 console session lexers.
//!
//!     PostgreSQL is the interesting one. Its dollar-quoted strings embed a
//!     procedural-language body whose language is named *near* the literal,
//!     not inside it, so the rule is a callback: it matches the opening
//!     delimiter, finds the matching closer itself, picks the embedded
//!     lexer from the surrounding text, and delegates the body. PL/pgSQL
//!     and the psql grammar are derived from the PostgreSQL table by
//!     fragment replacement and splicing rather than inheritance.
//!
//!     The console lexers segment a transcript into prompt, command and
//!     output regions line by line, tokenize each command region with the
//!     SQL grammar, and splice the prompt tokens back in. Unlike engine
//!     lexers they emit tokens in transcript coordinates directly.

use std::collections::VecDeque;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::engine::Lexer;
use crate::options::LexerOptions;
use crate::registry::Registry;
use crate::rule::compose::StateSpec;
use crate::rule::{callback, groups, rule, words, CallbackCtx, CallbackOutcome};
use crate::session::{merge_insertions, InsertionSpan, Lines};
use crate::token::Token;
use crate::token::TokenKind::{self, *};

/// How far after a dollar-quoted string a `LANGUAGE` clause is honored.
const LANGUAGE_WINDOW: usize = 100;
/// How far before a `DO` keyword implies a PL/pgSQL body.
const DO_WINDOW: usize = 25;

static RE_LANGUAGE_AFTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\A\s+LANGUAGE\s+'?(\w+)'?").unwrap());
static RE_LANGUAGE_BEFORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+LANGUAGE\s+'?(\w+)'?").unwrap());
static RE_DO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bDO\b").unwrap());

static RE_PROMPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\A(?:(\S.*?)??[=\-(\$'"][#>] ?)"#).unwrap());
static RE_PSQL_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A(\s*)(\\.+?)(\s+)$").unwrap());
static RE_END_COMMAND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m);\s*(--.*?)?$").unwrap());
static RE_MESSAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\A((?:DEBUG|INFO|NOTICE|WARNING|ERROR|FATAL|HINT|DETAIL|CONTEXT|LINE [0-9]+):)(.*\n?)",
    )
    .unwrap()
});

const SQL_KEYWORDS: &[&str] = &[
    "ABORT", "ABS", "ABSOLUTE", "ACCESS", "ADA", "ADD", "ADMIN", "AFTER", "AGGREGATE", "ALIAS",
    "ALL", "ALLOCATE", "ALTER", "ANALYSE", "ANALYZE", "AND", "ANY", "ARE", "AS", "ASC",
    "ASENSITIVE", "ASSERTION", "ASSIGNMENT", "ASYMMETRIC", "AT", "ATOMIC", "AUTHORIZATION",
    "AVG", "BACKWARD", "BEFORE", "BEGIN", "BETWEEN", "BITVAR", "BIT_LENGTH", "BOTH", "BREADTH",
    "BY", "C", "CACHE", "CALL", "CALLED", "CARDINALITY", "CASCADE", "CASCADED", "CASE", "CAST",
    "CATALOG", "CATALOG_NAME", "CHAIN", "CHARACTERISTICS", "CHARACTER_LENGTH",
    "CHARACTER_SET_CATALOG", "CHARACTER_SET_NAME", "CHARACTER_SET_SCHEMA", "CHAR_LENGTH",
    "CHECK", "CHECKED", "CHECKPOINT", "CLASS", "CLASS_ORIGIN", "CLOB", "CLOSE", "CLUSTER",
    "COALSECE", "COBOL", "COLLATE", "COLLATION", "COLLATION_CATALOG", "COLLATION_NAME",
    "COLLATION_SCHEMA", "COLUMN", "COLUMN_NAME", "COMMAND_FUNCTION", "COMMAND_FUNCTION_CODE",
    "COMMENT", "COMMIT", "COMMITTED", "COMPLETION", "CONDITION_NUMBER", "CONNECT", "CONNECTION",
    "CONNECTION_NAME", "CONSTRAINT", "CONSTRAINTS", "CONSTRAINT_CATALOG", "CONSTRAINT_NAME",
    "CONSTRAINT_SCHEMA", "CONSTRUCTOR", "CONTAINS", "CONTINUE", "CONVERSION", "CONVERT", "COPY",
    "CORRESPONTING", "COUNT", "CREATE", "CREATEDB", "CREATEUSER", "CROSS", "CUBE", "CURRENT",
    "CURRENT_DATE", "CURRENT_PATH", "CURRENT_ROLE", "CURRENT_TIME", "CURRENT_TIMESTAMP",
    "CURRENT_USER", "CURSOR", "CURSOR_NAME", "CYCLE", "DATA", "DATABASE",
    "DATETIME_INTERVAL_CODE", "DATETIME_INTERVAL_PRECISION", "DAY", "DEALLOCATE", "DECLARE",
    "DEFAULT", "DEFAULTS", "DEFERRABLE", "DEFERRED", "DEFINED", "DEFINER", "DELETE",
    "DELIMITER", "DELIMITERS", "DEREF", "DESC", "DESCRIBE", "DESCRIPTOR", "DESTROY",
    "DESTRUCTOR", "DETERMINISTIC", "DIAGNOSTICS", "DICTIONARY", "DISCONNECT", "DISPATCH",
    "DISTINCT", "DO", "DOMAIN", "DROP", "DYNAMIC", "DYNAMIC_FUNCTION", "DYNAMIC_FUNCTION_CODE",
    "EACH", "ELSE", "ELSIF", "ENCODING", "ENCRYPTED", "END", "END-EXEC", "EQUALS", "ESCAPE",
    "EVERY", "EXCEPTION", "EXCEPT", "EXCLUDING", "EXCLUSIVE", "EXEC", "EXECUTE", "EXISTING",
    "EXISTS", "EXPLAIN", "EXTERNAL", "EXTRACT", "FALSE", "FETCH", "FINAL", "FIRST", "FOR",
    "FORCE", "FOREIGN", "FORTRAN", "FORWARD", "FOUND", "FREE", "FREEZE", "FROM", "FULL",
    "FUNCTION", "G", "GENERAL", "GENERATED", "GET", "GLOBAL", "GO", "GOTO", "GRANT", "GRANTED",
    "GROUP", "GROUPING", "HANDLER", "HAVING", "HIERARCHY", "HOLD", "HOST", "IDENTITY", "IF",
    "IGNORE", "ILIKE", "IMMEDIATE", "IMMEDIATELY", "IMMUTABLE", "IMPLEMENTATION", "IMPLICIT",
    "IN", "INCLUDING", "INCREMENT", "INDEX", "INDITCATOR", "INFIX", "INHERITS", "INITIALIZE",
    "INITIALLY", "INNER", "INOUT", "INPUT", "INSENSITIVE", "INSERT", "INSTANTIABLE", "INSTEAD",
    "INTERSECT", "INTO", "INVOKER", "IS", "ISNULL", "ISOLATION", "ITERATE", "JOIN", "KEY",
    "KEY_MEMBER", "KEY_TYPE", "LANCOMPILER", "LANGUAGE", "LARGE", "LAST", "LATERAL", "LEADING",
    "LEFT", "LENGTH", "LESS", "LEVEL", "LIKE", "LIMIT", "LISTEN", "LOAD", "LOCAL", "LOCALTIME",
    "LOCALTIMESTAMP", "LOCATION", "LOCATOR", "LOCK", "LOWER", "MAP", "MATCH", "MAX", "MAXVALUE",
    "MESSAGE_LENGTH", "MESSAGE_OCTET_LENGTH", "MESSAGE_TEXT", "METHOD", "MIN", "MINUTE",
    "MINVALUE", "MOD", "MODE", "MODIFIES", "MODIFY", "MONTH", "MORE", "MOVE", "MUMPS", "NAMES",
    "NATIONAL", "NATURAL", "NCHAR", "NCLOB", "NEW", "NEXT", "NO", "NOCREATEDB", "NOCREATEUSER",
    "NONE", "NOT", "NOTHING", "NOTIFY", "NOTNULL", "NULL", "NULLABLE", "NULLIF", "OBJECT",
    "OCTET_LENGTH", "OF", "OFF", "OFFSET", "OIDS", "OLD", "ON", "ONLY", "OPEN", "OPERATION",
    "OPERATOR", "OPTION", "OPTIONS", "OR", "ORDER", "ORDINALITY", "OUT", "OUTER", "OUTPUT",
    "OVERLAPS", "OVERLAY", "OVERRIDING", "OWNER", "PAD", "PARAMETER", "PARAMETERS",
    "PARAMETER_MODE", "PARAMATER_NAME", "PARAMATER_ORDINAL_POSITION",
    "PARAMETER_SPECIFIC_CATALOG", "PARAMETER_SPECIFIC_NAME", "PARAMATER_SPECIFIC_SCHEMA",
    "PARTIAL", "PASCAL", "PENDANT", "PERIOD", "PLACING", "PLI", "POSITION", "POSTFIX",
    "PRECEEDS", "PRECISION", "PREFIX", "PREORDER", "PREPARE", "PRESERVE", "PRIMARY", "PRIOR",
    "PRIVILEGES", "PROCEDURAL", "PROCEDURE", "PUBLIC", "READ", "READS", "RECHECK", "RECURSIVE",
    "REF", "REFERENCES", "REFERENCING", "REINDEX", "RELATIVE", "RENAME", "REPEATABLE",
    "REPLACE", "RESET", "RESTART", "RESTRICT", "RESULT", "RETURN", "RETURNED_LENGTH",
    "RETURNED_OCTET_LENGTH", "RETURNED_SQLSTATE", "RETURNS", "REVOKE", "RIGHT", "ROLE",
    "ROLLBACK", "ROLLUP", "ROUTINE", "ROUTINE_CATALOG", "ROUTINE_NAME", "ROUTINE_SCHEMA",
    "ROW", "ROWS", "ROW_COUNT", "RULE", "SAVE_POINT", "SCALE", "SCHEMA", "SCHEMA_NAME",
    "SCOPE", "SCROLL", "SEARCH", "SECOND", "SECURITY", "SELECT", "SELF", "SENSITIVE",
    "SERIALIZABLE", "SERVER_NAME", "SESSION", "SESSION_USER", "SET", "SETOF", "SETS", "SHARE",
    "SHOW", "SIMILAR", "SIMPLE", "SIZE", "SOME", "SOURCE", "SPACE", "SPECIFIC", "SPECIFICTYPE",
    "SPECIFIC_NAME", "SQL", "SQLCODE", "SQLERROR", "SQLEXCEPTION", "SQLSTATE", "SQLWARNINIG",
    "STABLE", "START", "STATE", "STATEMENT", "STATIC", "STATISTICS", "STDIN", "STDOUT",
    "STORAGE", "STRICT", "STRUCTURE", "STYPE", "SUBCLASS_ORIGIN", "SUBLIST", "SUBSTRING",
    "SUCCEEDS", "SUM", "SYMMETRIC", "SYSID", "SYSTEM", "SYSTEM_USER", "TABLE", "TABLE_NAME",
    "TEMP", "TEMPLATE", "TEMPORARY", "TERMINATE", "THAN", "THEN", "TIME", "TIMESTAMP",
    "TIMEZONE_HOUR", "TIMEZONE_MINUTE", "TO", "TOAST", "TRAILING", "TRANSATION",
    "TRANSACTIONS_COMMITTED", "TRANSACTIONS_ROLLED_BACK", "TRANSATION_ACTIVE", "TRANSFORM",
    "TRANSFORMS", "TRANSLATE", "TRANSLATION", "TREAT", "TRIGGER", "TRIGGER_CATALOG",
    "TRIGGER_NAME", "TRIGGER_SCHEMA", "TRIM", "TRUE", "TRUNCATE", "TRUSTED", "TYPE",
    "UNCOMMITTED", "UNDER", "UNENCRYPTED", "UNION", "UNIQUE", "UNKNOWN", "UNLISTEN", "UNNAMED",
    "UNNEST", "UNTIL", "UPDATE", "UPPER", "USAGE", "USER", "USER_DEFINED_TYPE_CATALOG",
    "USER_DEFINED_TYPE_NAME", "USER_DEFINED_TYPE_SCHEMA", "USING", "VACUUM", "VALID",
    "VALIDATOR", "VALUES", "VARIABLE", "VERBOSE", "VERSION", "VERSIONS", "VERSIONING", "VIEW",
    "VOLATILE", "WHEN", "WHENEVER", "WHERE", "WITH", "WITHOUT", "WORK", "WRITE", "YEAR", "ZONE",
];

const SQL_DATATYPES: &[&str] = &[
    "ARRAY", "BIGINT", "BINARY", "BIT", "BLOB", "BOOLEAN", "CHAR", "CHARACTER", "DATE", "DEC",
    "DECIMAL", "FLOAT", "INT", "INTEGER", "INTERVAL", "NUMBER", "NUMERIC", "REAL", "SERIAL",
    "SMALLINT", "VARCHAR", "VARYING", "INT8", "SERIAL8", "TEXT",
];

const POSTGRES_KEYWORDS: &[&str] = &[
    "ABORT", "ABSOLUTE", "ACCESS", "ACTION", "ADD", "ADMIN", "AFTER", "AGGREGATE", "ALL",
    "ALSO", "ALTER", "ALWAYS", "ANALYSE", "ANALYZE", "AND", "ANY", "ARRAY", "AS", "ASC",
    "ASSERTION", "ASSIGNMENT", "ASYMMETRIC", "AT", "ATTRIBUTE", "AUTHORIZATION", "BACKWARD",
    "BEFORE", "BEGIN", "BETWEEN", "BOTH", "BY", "CACHE", "CALLED", "CASCADE", "CASE", "CAST",
    "CHECK", "CHECKPOINT", "CLASS", "CLOSE", "CLUSTER", "COALESCE", "COLLATE", "COLLATION",
    "COLUMN", "COMMENT", "COMMIT", "COMMITTED", "CONCURRENTLY", "CONSTRAINT", "COPY", "COST",
    "CREATE", "CROSS", "CURRENT", "CURSOR", "CYCLE", "DATA", "DATABASE", "DEALLOCATE",
    "DECLARE", "DEFAULT", "DEFERRABLE", "DEFERRED", "DELETE", "DESC", "DISTINCT", "DO",
    "DOMAIN", "DROP", "EACH", "ELSE", "ENABLE", "ENCODING", "END", "ESCAPE", "EXCEPT",
    "EXCLUDE", "EXECUTE", "EXISTS", "EXPLAIN", "EXTENSION", "FALSE", "FETCH", "FILTER",
    "FIRST", "FOLLOWING", "FOR", "FOREIGN", "FORWARD", "FROM", "FULL", "FUNCTION", "GENERATED",
    "GRANT", "GROUP", "GROUPING", "HANDLER", "HAVING", "HOLD", "IDENTITY", "IF", "ILIKE",
    "IMMEDIATE", "IMMUTABLE", "IN", "INDEX", "INHERIT", "INNER", "INSERT", "INSTEAD",
    "INTERSECT", "INTO", "IS", "ISOLATION", "JOIN", "KEY", "LANGUAGE", "LATERAL", "LEADING",
    "LEFT", "LEVEL", "LIKE", "LIMIT", "LISTEN", "LOAD", "LOCAL", "LOCK", "MATERIALIZED",
    "NATURAL", "NEXT", "NO", "NOT", "NOTHING", "NOTIFY", "NULL", "NULLIF", "OF", "OFF",
    "OFFSET", "ON", "ONLY", "OPERATOR", "OPTION", "OR", "ORDER", "OUTER", "OVER", "OVERLAPS",
    "OWNER", "PARTITION", "POLICY", "PRECEDING", "PREPARE", "PRIMARY", "PRIOR", "PRIVILEGES",
    "PROCEDURE", "PUBLICATION", "RANGE", "READ", "REASSIGN", "RECURSIVE", "REFERENCES",
    "REFRESH", "REINDEX", "RELEASE", "RENAME", "REPEATABLE", "REPLACE", "REPLICA", "RESET",
    "RESTART", "RESTRICT", "RETURNING", "RETURNS", "REVOKE", "RIGHT", "ROLE", "ROLLBACK",
    "ROW", "ROWS", "RULE", "SAVEPOINT", "SCHEMA", "SELECT", "SEQUENCE", "SERIALIZABLE",
    "SESSION", "SET", "SHOW", "SIMILAR", "SOME", "STABLE", "START", "STATEMENT", "STRICT",
    "SUBSCRIPTION", "SYMMETRIC", "TABLE", "TABLESPACE", "TEMPORARY", "THEN", "TO", "TRAILING",
    "TRANSACTION", "TRIGGER", "TRUE", "TRUNCATE", "TRUSTED", "TYPE", "UNION", "UNIQUE",
    "UNLISTEN", "UNLOGGED", "UPDATE", "USING", "VACUUM", "VALID", "VALIDATE", "VALUES",
    "VARIADIC", "VERBOSE", "VIEW", "VOLATILE", "WHEN", "WHERE", "WINDOW", "WITH", "WORK",
];

const POSTGRES_DATATYPES: &[&str] = &[
    "bigint",
    "bigserial",
    "bit",
    "bit varying",
    "bool",
    "boolean",
    "box",
    "bytea",
    "char",
    "character",
    "character varying",
    "cidr",
    "circle",
    "date",
    "decimal",
    "double precision",
    "float4",
    "float8",
    "inet",
    "int",
    "int2",
    "int4",
    "int8",
    "integer",
    "interval",
    "json",
    "jsonb",
    "line",
    "lseg",
    "macaddr",
    "money",
    "numeric",
    "path",
    "point",
    "polygon",
    "real",
    "serial",
    "serial2",
    "serial4",
    "serial8",
    "smallint",
    "smallserial",
    "text",
    "time",
    "timestamp",
    "timestamptz",
    "timetz",
    "tsquery",
    "tsvector",
    "uuid",
    "varchar",
    "xml",
];

const POSTGRES_PSEUDO_TYPES: &[&str] = &[
    "any",
    "anyarray",
    "anyelement",
    "anyenum",
    "anynonarray",
    "anyrange",
    "cstring",
    "event_trigger",
    "fdw_handler",
    "internal",
    "language_handler",
    "opaque",
    "record",
    "trigger",
    "void",
];

const PLPGSQL_KEYWORDS: &[&str] = &[
    "ALIAS", "CONSTANT", "DIAGNOSTICS", "ELSIF", "EXCEPTION", "EXIT", "FOREACH", "GET", "LOOP",
    "NOTICE", "OPEN", "PERFORM", "QUERY", "RAISE", "RETURN", "REVERSE", "SQLSTATE", "WHILE",
];

/// Alternation over type names where a space in a name matches any run of
/// whitespace, e.g. `double precision`.
fn types_pattern(lists: &[&[&str]]) -> std::string::String {
    let mut names = Vec::new();
    for list in lists {
        for name in *list {
            names.push(name.replace(' ', r"\s+"));
        }
    }
    format!(r"({})\b", names.join("|"))
}

/// The psql variable form `:name`, `:'name'` or `:"name"`; one alternative
/// per quote style so the quotes pair up.
const PSQL_VARIABLE: &str = r#":'[a-z]\w*'|:"[a-z]\w*"|:[a-z]\w*\b"#;

// ---------------------------------------------------------------------------
// ANSI SQL

pub fn sql() -> Lexer {
    sql_with(LexerOptions::case_insensitive())
}

fn sql_with(options: LexerOptions) -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"\s+", Text),
            rule(r"--.*\n?", CommentSingle),
            rule(r"/\*", CommentMultiline).push("multiline-comments"),
            rule(&words(SQL_KEYWORDS, "", r"\b"), Keyword),
            rule(&words(SQL_DATATYPES, "", r"\b"), NameBuiltin),
            rule(r"[+*/<>=~!@#%^&|`?-]", Operator),
            rule(r"[0-9]+", NumberInteger),
            rule(r"'(''|[^'])*'", StringSingle),
            rule(r#""(""|[^"])*""#, StringSymbol),
            rule(r"[a-z_][\w$]*", Name),
            rule(r"[;:()\[\],.]", Punctuation),
        ],
    );
    spec.state("multiline-comments", multiline_comments());
    Lexer::new("SQL", &["sql"], &spec, options).expect("static grammar")
}

fn multiline_comments() -> Vec<crate::rule::RuleSpec> {
    vec![
        rule(r"/\*", CommentMultiline).push("multiline-comments"),
        rule(r"\*/", CommentMultiline).pop(),
        rule(r"[^/*]+", CommentMultiline),
        rule(r"[/*]", CommentMultiline),
    ]
}

// ---------------------------------------------------------------------------
// PostgreSQL and derivatives

fn postgres_states() -> StateSpec {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"\s+", Text),
            rule(r"--.*\n?", CommentSingle),
            rule(r"/\*", CommentMultiline).push("multiline-comments"),
            rule(
                &types_pattern(&[POSTGRES_DATATYPES, POSTGRES_PSEUDO_TYPES]),
                NameBuiltin,
            ),
            rule(&words(POSTGRES_KEYWORDS, "", r"\b"), Keyword).tagged("keywords"),
            rule(r"[+*/<>=~!@#%^&|`?-]+", Operator),
            // cast
            rule(r"::", Operator),
            rule(r"\$\d+", NameVariable),
            rule(r"([0-9]*\.[0-9]*|[0-9]+)(e[+-]?[0-9]+)?", NumberFloat),
            rule(r"[0-9]+", NumberInteger),
            groups(r"((?:E|U&)?)(')", &[StringAffix, StringSingle]).push("string"),
            // quoted identifier
            groups(r#"((?:U&)?)(")"#, &[StringAffix, StringName]).push("quoted-ident"),
            callback(r"(\$)([^$]*)(\$)", dollar_string),
            rule(r"[a-z_]\w*", Name),
            // psql variable in SQL
            rule(PSQL_VARIABLE, NameVariable),
            rule(r"[;:()\[\]{},.]", Punctuation),
        ],
    );
    spec.state("multiline-comments", multiline_comments());
    spec.state(
        "string",
        vec![
            rule(r"[^']+", StringSingle),
            rule(r"''", StringSingle),
            rule(r"'", StringSingle).pop(),
        ],
    );
    spec.state(
        "quoted-ident",
        vec![
            rule(r#"[^"]+"#, StringName),
            rule(r#""""#, StringName),
            rule(r#"""#, StringName).pop(),
        ],
    );
    spec
}

pub fn postgres() -> Lexer {
    postgres_with(LexerOptions::case_insensitive())
}

fn postgres_with(options: LexerOptions) -> Lexer {
    Lexer::new(
        "PostgreSQL",
        &["postgresql", "postgres"],
        &postgres_states(),
        options,
    )
    .expect("static grammar")
}

/// PL/pgSQL: the PostgreSQL table with an extended keyword fragment and a
/// few extra rules spliced in front of `root`.
pub fn plpgsql() -> Lexer {
    let mut spec = postgres_states();
    let mut keywords: Vec<&str> = Vec::new();
    keywords.extend_from_slice(POSTGRES_KEYWORDS);
    keywords.extend_from_slice(PLPGSQL_KEYWORDS);
    spec.replace_tagged(
        "root",
        "keywords",
        vec![rule(&words(&keywords, "", r"\b"), Keyword)],
    );
    spec.prepend(
        "root",
        vec![
            // actually, a datatype
            rule(r"%[a-z]\w*\b", NameBuiltin),
            rule(r":=", Operator),
            rule(r"<<[a-z]\w*>>", NameLabel),
            // #variable_conflict
            rule(r"#[a-z]\w*\b", KeywordPseudo),
        ],
    );
    Lexer::new(
        "PL/pgSQL",
        &["plpgsql"],
        &spec,
        LexerOptions::case_insensitive(),
    )
    .expect("static grammar")
}

/// The PostgreSQL grammar extended with psql backslash-command support.
/// Not registered under any alias; it exists for the console lexer.
pub fn psql() -> Lexer {
    psql_with(LexerOptions::case_insensitive())
}

fn psql_with(options: LexerOptions) -> Lexer {
    let mut spec = postgres_states();
    spec.append(
        "root",
        vec![rule(r"\\[^\s]+", KeywordPseudo).push("psql-command")],
    );
    spec.state(
        "psql-command",
        vec![
            rule(r"\n", Text).push("root"),
            rule(r"\s+", Text),
            rule(r"\\[^\s]+", KeywordPseudo),
            rule(PSQL_VARIABLE, NameVariable),
            rule(r"'(''|[^'])*'", StringSingle),
            rule(r"`([^`])*`", StringBacktick),
            rule(r"[^\s]+", StringSymbol),
        ],
    );
    Lexer::new("psql", &[], &spec, options).expect("static grammar")
}

/// Tokenize a dollar-quoted string, delegating its body to the lexer for
/// the procedural language named near it.
///
/// The rule's pattern matches only the opening `$tag$`; the callback
/// locates the identical closing delimiter itself, declining when the
/// literal is unterminated so the ordinary rules take over.
fn dollar_string(ctx: &CallbackCtx<'_>) -> Option<CallbackOutcome> {
    let tag_span = ctx.group_span(2)?;
    let tag = ctx.group_text(2)?;
    let closer = format!("${tag}$");
    let body_start = ctx.end;
    let body_end = body_start + ctx.text[body_start..].find(&closer)?;
    let end = body_end + closer.len();

    let mut tokens = vec![
        Token::new(ctx.start, String, "$"),
        Token::new(tag_span.start, StringDelimiter, tag),
        Token::new(tag_span.end, String, "$"),
    ];

    let body = &ctx.text[body_start..body_end];
    let embedded = nearby_language(ctx.text, ctx.start, end)
        .and_then(|lang| lookup_embedded(ctx.registry, &lang));
    match embedded {
        Some(sub) => {
            let mut inner: Vec<Token> = sub.tokenize_with(body, ctx.registry).collect();
            for token in &mut inner {
                token.offset += body_start;
            }
            tokens.extend(inner);
        }
        None => {
            if !body.is_empty() {
                tokens.push(Token::new(body_start, String, body));
            }
        }
    }

    tokens.push(Token::new(body_end, String, "$"));
    tokens.push(Token::new(body_end + 1, StringDelimiter, tag));
    tokens.push(Token::new(end - 1, String, "$"));
    Some(CallbackOutcome { tokens, end })
}

/// Find the language annotation governing a dollar-quoted string: a
/// `LANGUAGE` clause shortly after it, else the last one shortly before,
/// else PL/pgSQL when an enclosing `DO` sits just before it.
fn nearby_language(text: &str, start: usize, end: usize) -> Option<std::string::String> {
    let after = window_after(text, end, LANGUAGE_WINDOW);
    if let Some(caps) = RE_LANGUAGE_AFTER.captures(after) {
        return Some(caps[1].to_string());
    }
    let before = window_before(text, start, LANGUAGE_WINDOW);
    if let Some(caps) = RE_LANGUAGE_BEFORE.captures_iter(before).last() {
        return Some(caps[1].to_string());
    }
    if RE_DO.is_match(window_before(text, start, DO_WINDOW)) {
        return Some("plpgsql".to_string());
    }
    None
}

fn window_after(text: &str, from: usize, len: usize) -> &str {
    let mut end = (from + len).min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[from..end]
}

fn window_before(text: &str, to: usize, len: usize) -> &str {
    let mut start = to.saturating_sub(len);
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..to]
}

/// Resolve an embedded-language name the way psql users spell them:
/// `plpythonu` falls back through `pythonu`, `plpython` and `python`;
/// plain `sql` means the PostgreSQL dialect itself.
fn lookup_embedded(registry: &Registry, lang: &str) -> Option<Arc<Lexer>> {
    let lang = lang.to_lowercase();
    if lang == "sql" {
        return registry.get("postgresql");
    }
    let mut tries = vec![lang.clone()];
    if let Some(rest) = lang.strip_prefix("pl") {
        tries.push(rest.to_string());
    }
    if let Some(rest) = lang.strip_suffix('u') {
        tries.push(rest.to_string());
    }
    if lang.starts_with("pl") && lang.ends_with('u') {
        tries.push(lang[2..lang.len() - 1].to_string());
    }
    for name in tries {
        if let Some(lexer) = registry.get(&name) {
            return Some(lexer);
        }
    }
    log::debug!("no lexer registered for embedded language {lang:?}");
    None
}

// ---------------------------------------------------------------------------
// Transact-SQL

// longer operators first: the alternation is first-match, so a prefix
// listed early would shadow its extensions
const TSQL_OPERATORS: &[&str] = &[
    "!<", "!=", "!>", "<=", "<>", "<", ">=", ">", "+=", "+", "-=", "-", "*=", "*", "/=", "/",
    "%=", "%", "&=", "&", "|=", "|", "^=", "^", "~", "::", "=",
];

const TSQL_OPERATOR_WORDS: &[&str] = &[
    "all", "and", "any", "between", "except", "exists", "in", "intersect", "like", "not", "or",
    "some", "union",
];

const TSQL_TYPES: &[&str] = &[
    "bigint",
    "binary",
    "bit",
    "char",
    "date",
    "datetime",
    "datetime2",
    "datetimeoffset",
    "decimal",
    "float",
    "image",
    "int",
    "money",
    "nchar",
    "ntext",
    "numeric",
    "nvarchar",
    "real",
    "smalldatetime",
    "smallint",
    "smallmoney",
    "sql_variant",
    "table",
    "text",
    "time",
    "timestamp",
    "tinyint",
    "uniqueidentifier",
    "varbinary",
    "varchar",
    "xml",
];

const TSQL_FUNCTIONS: &[&str] = &[
    "abs",
    "avg",
    "cast",
    "ceiling",
    "charindex",
    "coalesce",
    "concat",
    "convert",
    "count",
    "current_timestamp",
    "current_user",
    "datalength",
    "dateadd",
    "datediff",
    "datename",
    "datepart",
    "day",
    "floor",
    "getdate",
    "getutcdate",
    "isnull",
    "isnumeric",
    "lag",
    "lead",
    "left",
    "len",
    "lower",
    "ltrim",
    "max",
    "min",
    "month",
    "nullif",
    "rand",
    "replace",
    "right",
    "round",
    "row_number",
    "rtrim",
    "session_user",
    "str",
    "string_agg",
    "substring",
    "sum",
    "system_user",
    "upper",
    "year",
];

const TSQL_KEYWORDS: &[&str] = &[
    "add", "alter", "as", "asc", "authorization", "backup", "begin", "break", "browse", "bulk",
    "by", "cascade", "case", "catch", "check", "checkpoint", "close", "clustered", "column",
    "commit", "constraint", "contains", "continue", "create", "cross", "current", "cursor",
    "database", "deallocate", "declare", "default", "delete", "deny", "desc", "distinct",
    "double", "drop", "else", "end", "escape", "exec", "execute", "exit", "external", "fetch",
    "for", "foreign", "from", "full", "function", "goto", "grant", "group", "having",
    "holdlock", "identity", "if", "index", "inner", "insert", "into", "is", "join", "key",
    "kill", "left", "merge", "national", "nocheck", "nonclustered", "null", "of", "off", "on",
    "open", "option", "order", "outer", "over", "percent", "pivot", "plan", "precision",
    "primary", "print", "proc", "procedure", "public", "raiserror", "read", "reconfigure",
    "references", "restore", "restrict", "return", "revert", "revoke", "right", "rollback",
    "rowcount", "rule", "save", "schema", "select", "set", "shutdown", "statistics", "table",
    "then", "to", "top", "tran", "transaction", "trigger", "truncate", "try", "unique",
    "unpivot", "update", "use", "user", "values", "view", "waitfor", "when", "where", "while",
    "with",
];

pub fn transact_sql() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"\s+", Whitespace),
            rule(r"--.*?$\n?", CommentSingle),
            rule(r"/\*", CommentMultiline).push("multiline-comments"),
            rule(&words(TSQL_OPERATORS, "", ""), Operator),
            rule(&words(TSQL_OPERATOR_WORDS, "", r"\b"), OperatorWord),
            rule(&words(TSQL_TYPES, "", r"\b"), NameClass),
            rule(&words(TSQL_FUNCTIONS, "", r"\b"), NameFunction),
            groups(r"(goto)(\s+)(\w+\b)", &[Keyword, Whitespace, NameLabel]),
            rule(&words(TSQL_KEYWORDS, "", r"\b"), Keyword),
            groups(r"(\[)([^\]]+)(\])", &[Operator, Name, Operator]),
            rule(r"0x[0-9a-f]+", NumberHex),
            // float variants: 1. / 1.e2 / .1 / 123e45
            rule(r"[0-9]+\.[0-9]*(e[+-]?[0-9]+)?", NumberFloat),
            rule(r"\.[0-9]+(e[+-]?[0-9]+)?", NumberFloat),
            rule(r"[0-9]+e[+-]?[0-9]+", NumberFloat),
            rule(r"[0-9]+", NumberInteger),
            rule(r"'(''|[^'])*'", StringSingle),
            rule(r#""(""|[^"])*""#, StringSymbol),
            rule(r"[;(),.]", Punctuation),
            rule(r"@@\w+", NameBuiltin),
            rule(r"@\w+", NameVariable),
            groups(r"(\w+)(:)", &[NameLabel, Punctuation]),
            rule(r"#?#?\w+", Name),
            // parameter for prepared statements
            rule(r"\?", NameVariableMagic),
        ],
    );
    spec.state("multiline-comments", multiline_comments());
    Lexer::new(
        "Transact-SQL",
        &["tsql", "t-sql"],
        &spec,
        LexerOptions::case_insensitive(),
    )
    .expect("static grammar")
}

// ---------------------------------------------------------------------------
// MySQL

const MYSQL_CONSTANTS: &[&str] = &["false", "null", "true", "unknown"];

const MYSQL_DATATYPES: &[&str] = &[
    "bigint",
    "binary",
    "bit",
    "blob",
    "bool",
    "boolean",
    "char",
    "date",
    "datetime",
    "dec",
    "decimal",
    "double",
    "enum",
    "fixed",
    "float",
    "geometry",
    "int",
    "integer",
    "json",
    "linestring",
    "longblob",
    "longtext",
    "mediumblob",
    "mediumint",
    "mediumtext",
    "multipoint",
    "numeric",
    "point",
    "polygon",
    "real",
    "serial",
    "set",
    "smallint",
    "text",
    "time",
    "timestamp",
    "tinyblob",
    "tinyint",
    "tinytext",
    "varbinary",
    "varchar",
    "year",
];

const MYSQL_KEYWORDS: &[&str] = &[
    "accessible", "add", "all", "alter", "analyze", "and", "as", "asc", "before", "between",
    "by", "call", "cascade", "case", "change", "check", "collate", "column", "condition",
    "constraint", "continue", "convert", "create", "cross", "cursor", "database", "databases",
    "declare", "default", "delayed", "delete", "desc", "describe", "deterministic", "distinct",
    "div", "drop", "each", "else", "elseif", "enclosed", "escaped", "exists", "exit",
    "explain", "fetch", "for", "force", "foreign", "from", "full", "fulltext", "generated",
    "grant", "group", "having", "high_priority", "if", "ignore", "in", "index", "infile",
    "inner", "inout", "insert", "interval", "into", "is", "iterate", "join", "key", "keys",
    "kill", "leading", "leave", "left", "like", "limit", "lines", "load", "lock", "loop",
    "low_priority", "match", "modifies", "natural", "not", "on", "optimize", "option",
    "optionally", "or", "order", "out", "outer", "outfile", "partition", "primary",
    "procedure", "purge", "range", "reads", "references", "regexp", "release", "rename",
    "repeat", "replace", "require", "resignal", "restrict", "return", "revoke", "right",
    "rlike", "schema", "schemas", "select", "show", "signal", "spatial", "sql", "sqlexception",
    "sqlstate", "sqlwarning", "ssl", "starting", "straight_join", "table", "terminated",
    "then", "to", "trailing", "trigger", "undo", "union", "unique", "unlock", "unsigned",
    "update", "usage", "use", "using", "values", "virtual", "when", "where", "while", "with",
    "write", "xor", "zerofill",
];

const MYSQL_FUNCTIONS: &[&str] = &[
    "abs",
    "avg",
    "bit_and",
    "bit_or",
    "cast",
    "ceil",
    "ceiling",
    "char_length",
    "coalesce",
    "concat",
    "concat_ws",
    "count",
    "curdate",
    "curtime",
    "date_add",
    "date_format",
    "date_sub",
    "datediff",
    "dayname",
    "dayofmonth",
    "dayofweek",
    "extract",
    "field",
    "floor",
    "format",
    "from_unixtime",
    "greatest",
    "group_concat",
    "hour",
    "ifnull",
    "instr",
    "json_extract",
    "last_insert_id",
    "lcase",
    "least",
    "length",
    "locate",
    "lower",
    "lpad",
    "ltrim",
    "max",
    "md5",
    "min",
    "minute",
    "mod",
    "month",
    "monthname",
    "now",
    "nullif",
    "position",
    "pow",
    "power",
    "quarter",
    "rand",
    "reverse",
    "round",
    "rpad",
    "rtrim",
    "second",
    "sha1",
    "sha2",
    "sign",
    "sqrt",
    "std",
    "stddev",
    "substr",
    "substring",
    "sum",
    "sysdate",
    "timestampdiff",
    "trim",
    "ucase",
    "unix_timestamp",
    "upper",
    "uuid",
    "week",
    "weekday",
];

const MYSQL_OPTIMIZER_HINTS: &[&str] = &[
    "bka",
    "bnl",
    "dupsweedout",
    "firstmatch",
    "hash_join",
    "index_merge",
    "intoexists",
    "join_fixed_order",
    "join_index",
    "join_order",
    "join_prefix",
    "join_suffix",
    "loosescan",
    "materialization",
    "max_execution_time",
    "merge",
    "mrr",
    "no_bka",
    "no_bnl",
    "no_hash_join",
    "no_icp",
    "no_index_merge",
    "no_join_index",
    "no_merge",
    "no_mrr",
    "no_range_optimization",
    "no_semijoin",
    "no_skip_scan",
    "qb_name",
    "resource_group",
    "semijoin",
    "set_var",
    "skip_scan",
    "subquery",
];

pub fn mysql() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"\s+", Text),
            // comments
            rule(r"(?:#|--\s+).*", CommentSingle),
            rule(r"/\*\+", CommentSpecial).push("optimizer-hints"),
            rule(r"/\*", CommentMultiline).push("multiline-comment"),
            // hexadecimal literals
            rule(r"x'([0-9a-f]{2})+'", NumberHex),
            rule(r"0x[0-9a-f]+", NumberHex),
            // binary literals
            rule(r"b'[01]+'", NumberBin),
            rule(r"0b[01]+", NumberBin),
            // numeric literals
            rule(r"[0-9]+\.[0-9]*(e[+-]?[0-9]+)?", NumberFloat),
            rule(r"[0-9]*\.[0-9]+(e[+-]?[0-9]+)?", NumberFloat),
            rule(r"[0-9]+e[+-]?[0-9]+", NumberFloat),
            rule(r"[0-9]+", NumberInteger),
            // date/time/timestamp literals, one rule per quote style so the
            // quotes pair up
            rule(r"\{\s*d\s*'\s*\d{2}(\d{2})?.?\d{2}.?\d{2}\s*'\s*\}", LiteralDate),
            rule(r#"\{\s*d\s*"\s*\d{2}(\d{2})?.?\d{2}.?\d{2}\s*"\s*\}"#, LiteralDate),
            rule(
                r"\{\s*t\s*'\s*(?:\d+\s+)?\d{1,2}.?\d{1,2}.?\d{1,2}(\.\d*)?\s*'\s*\}",
                LiteralDate,
            ),
            rule(
                r#"\{\s*t\s*"\s*(?:\d+\s+)?\d{1,2}.?\d{1,2}.?\d{1,2}(\.\d*)?\s*"\s*\}"#,
                LiteralDate,
            ),
            rule(
                r"\{\s*ts\s*'\s*\d{2}(?:\d{2})?.?\d{2}.?\d{2}\s+\d{1,2}.?\d{1,2}.?\d{1,2}(\.\d*)?\s*'\s*\}",
                LiteralDate,
            ),
            rule(
                r#"\{\s*ts\s*"\s*\d{2}(?:\d{2})?.?\d{2}.?\d{2}\s+\d{1,2}.?\d{1,2}.?\d{1,2}(\.\d*)?\s*"\s*\}"#,
                LiteralDate,
            ),
            // string literals
            rule(r"'", StringSingle).push("single-quoted-string"),
            rule(r#"""#, StringDouble).push("double-quoted-string"),
            // variables
            rule(
                r"@@(?:global\.|persist\.|persist_only\.|session\.)?[a-z_]+",
                NameVariable,
            ),
            rule(r"@[a-z0-9_$.]+", NameVariable),
            rule(r"@'", NameVariable).push("single-quoted-variable"),
            rule(r#"@""#, NameVariable).push("double-quoted-variable"),
            rule(r"@`", NameVariable).push("backtick-quoted-variable"),
            rule(r"\?", NameVariable),
            // operators
            rule(r"[!%&*+/:<=>^|~-]+", Operator),
            // exceptions; these words tokenize differently in different
            // contexts
            rule(r"\bset\b", Keyword).not_ahead(r"\s*\("),
            groups(r"(character)(\s+)(set)\b", &[Keyword, Text, Keyword]),
            rule(&words(MYSQL_CONSTANTS, r"\b", r"\b"), NameConstant),
            rule(&words(MYSQL_DATATYPES, r"\b", r"\b"), KeywordType),
            rule(&words(MYSQL_KEYWORDS, r"\b", r"\b"), Keyword),
            groups(
                &words(MYSQL_FUNCTIONS, r"\b(", r")\b(\s*)(\()"),
                &[NameFunction, Text, Punctuation],
            ),
            // schema object names
            rule(r"[0-9a-z$_\x{0080}-\x{d7ff}\x{e000}-\x{ffff}]+", Name),
            rule(r"`", Name).push("schema-object-name"),
            rule(r"[(),.;]", Punctuation),
        ],
    );
    spec.state(
        "optimizer-hints",
        vec![
            rule(r"[^*a-z]+", CommentSpecial),
            rule(r"\*/", CommentSpecial).pop(),
            rule(&words(MYSQL_OPTIMIZER_HINTS, "", r"\b"), CommentPreproc),
            rule(r"[a-z]+", CommentSpecial),
            rule(r"\*", CommentSpecial),
        ],
    );
    spec.state(
        "multiline-comment",
        vec![
            rule(r"[^*]+", CommentMultiline),
            rule(r"\*/", CommentMultiline).pop(),
            rule(r"\*", CommentMultiline),
        ],
    );
    spec.state(
        "single-quoted-string",
        vec![
            rule(r"[^'\\]+", StringSingle),
            rule(r"''", StringEscape),
            rule(r#"\\[0'"bnrtZ\\%_]"#, StringEscape),
            rule(r"'", StringSingle).pop(),
        ],
    );
    spec.state(
        "double-quoted-string",
        vec![
            rule(r#"[^"\\]+"#, StringDouble),
            rule(r#""""#, StringEscape),
            rule(r#"\\[0'"bnrtZ\\%_]"#, StringEscape),
            rule(r#"""#, StringDouble).pop(),
        ],
    );
    spec.state(
        "single-quoted-variable",
        vec![
            rule(r"[^']+", NameVariable),
            rule(r"''", NameVariable),
            rule(r"'", NameVariable).pop(),
        ],
    );
    spec.state(
        "double-quoted-variable",
        vec![
            rule(r#"[^"]+"#, NameVariable),
            rule(r#""""#, NameVariable),
            rule(r#"""#, NameVariable).pop(),
        ],
    );
    spec.state(
        "backtick-quoted-variable",
        vec![
            rule(r"[^`]+", NameVariable),
            rule(r"``", NameVariable),
            rule(r"`", NameVariable).pop(),
        ],
    );
    spec.state(
        "schema-object-name",
        vec![
            rule(r"[^`\\]+", Name),
            rule(r"(?:\\\\|\\`|``)", Name),
            rule(r"`", Name).pop(),
        ],
    );
    Lexer::new("MySQL", &["mysql"], &spec, LexerOptions::case_insensitive())
        .expect("static grammar")
}

// ---------------------------------------------------------------------------
// RQL

pub fn rql() -> Lexer {
    let mut spec = StateSpec::new();
    spec.state(
        "root",
        vec![
            rule(r"\s+", Text),
            rule(
                r"(DELETE|SET|INSERT|UNION|DISTINCT|WITH|WHERE|BEING|OR|AND|NOT|GROUPBY|HAVING|ORDERBY|ASC|DESC|LIMIT|OFFSET|TODAY|NOW|TRUE|FALSE|NULL|EXISTS)\b",
                Keyword,
            ),
            rule(r"[+*/<>=%-]", Operator),
            rule(r"(Any|is|instance_of|CWEType|CWRelation)\b", NameBuiltin),
            rule(r"[0-9]+", NumberInteger),
            rule(r"[A-Z_]\w*\??", Name),
            rule(r"'(''|[^'])*'", StringSingle),
            rule(r#""(""|[^"])*""#, StringSingle),
            rule(r"[;:()\[\],.]", Punctuation),
        ],
    );
    Lexer::new("RQL", &["rql"], &spec, LexerOptions::case_insensitive())
        .expect("static grammar")
}

// ---------------------------------------------------------------------------
// psql console sessions

/// Lexer for interactive psql transcripts: prompts, commands spanning
/// several prompt lines, output, and server diagnostics.
pub struct PostgresConsole {
    sql: Lexer,
}

impl Default for PostgresConsole {
    fn default() -> PostgresConsole {
        PostgresConsole::new(LexerOptions::case_insensitive())
    }
}

impl PostgresConsole {
    pub fn new(options: LexerOptions) -> PostgresConsole {
        PostgresConsole {
            sql: psql_with(options),
        }
    }

    /// Tokenize a transcript. Tokens come out in transcript coordinates:
    /// offsets are byte positions into `text` itself and the stream is
    /// lossless over the whole transcript.
    pub fn tokenize<'a>(&'a self, text: &'a str, registry: &'a Registry) -> PsqlSessionStream<'a> {
        PsqlSessionStream {
            sql: &self.sql,
            registry,
            lines: Lines::new(text),
            queue: VecDeque::new(),
            done: false,
        }
    }
}

/// Token stream over one psql transcript; one prompt-command-output cycle
/// is processed at a time.
pub struct PsqlSessionStream<'a> {
    sql: &'a Lexer,
    registry: &'a Registry,
    lines: Lines<'a>,
    queue: VecDeque<Token>,
    done: bool,
}

impl<'a> PsqlSessionStream<'a> {
    fn cycle(&mut self) {
        // accumulate the command: an optional prompt per line, until the
        // buffer ends a statement or holds a backslash command
        let mut curcode = std::string::String::new();
        let mut insertions: Vec<InsertionSpan> = Vec::new();
        let mut seg_start = None;
        let mut saw_line = false;

        while let Some((start, line)) = self.lines.next() {
            saw_line = true;

            // a shell prompt line short-circuits: that one line is a shell
            // command, not SQL
            if line.starts_with('$') && curcode.is_empty() {
                match self.registry.get("console") {
                    Some(shell) => {
                        let mut tokens: Vec<Token> =
                            shell.tokenize_with(line, self.registry).collect();
                        for token in &mut tokens {
                            token.offset += start;
                        }
                        self.queue.extend(tokens);
                    }
                    None => self
                        .queue
                        .push_back(Token::new(start, TokenKind::GenericOutput, line)),
                }
                break;
            }

            if seg_start.is_none() {
                seg_start = Some(start);
            }
            match RE_PROMPT.find(line) {
                Some(m) => {
                    insertions.push(InsertionSpan {
                        offset: curcode.len(),
                        tokens: vec![Token::new(0, TokenKind::GenericPrompt, m.as_str())],
                    });
                    curcode.push_str(&line[m.end()..]);
                }
                None => curcode.push_str(line),
            }

            if RE_PSQL_COMMAND.is_match(&curcode) || RE_END_COMMAND.is_match(&curcode) {
                break;
            }
        }

        if !saw_line {
            self.done = true;
            return;
        }

        if !curcode.is_empty() || !insertions.is_empty() {
            let base = seg_start.unwrap_or(0);
            let sql_tokens: Vec<Token> = self.sql.tokenize_with(&curcode, self.registry).collect();
            for mut token in merge_insertions(insertions, sql_tokens) {
                token.offset += base;
                self.queue.push_back(token);
            }
        }

        // consume output until the next prompt line, classifying server
        // diagnostics; an ERROR/FATAL turns the rest of the block red
        let mut out_kind = TokenKind::GenericOutput;
        while let Some((start, line)) = self.lines.next() {
            if RE_PROMPT.is_match(line) {
                self.lines.push_back(start, line);
                return;
            }
            match RE_MESSAGE.captures(line) {
                Some(caps) => {
                    let severity = &caps[1];
                    if severity.starts_with("ERROR") || severity.starts_with("FATAL") {
                        out_kind = TokenKind::GenericError;
                    }
                    self.queue
                        .push_back(Token::new(start, TokenKind::GenericStrong, severity));
                    self.queue.push_back(Token::new(
                        start + severity.len(),
                        out_kind,
                        &caps[2],
                    ));
                }
                None => self.queue.push_back(Token::new(start, out_kind, line)),
            }
        }
        self.done = true;
    }
}

impl<'a> Iterator for PsqlSessionStream<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }
            if self.done {
                return None;
            }
            self.cycle();
        }
    }
}

// ---------------------------------------------------------------------------
// sqlite3 console sessions

const SQLITE_PROMPTS: [&str; 2] = ["sqlite> ", "   ...> "];

/// Lexer for example sessions using sqlite3.
pub struct SqliteConsole {
    sql: Lexer,
}

impl Default for SqliteConsole {
    fn default() -> SqliteConsole {
        SqliteConsole::new(LexerOptions::case_insensitive())
    }
}

impl SqliteConsole {
    pub fn new(options: LexerOptions) -> SqliteConsole {
        SqliteConsole {
            sql: sql_with(options),
        }
    }

    /// Tokenize a transcript into transcript-coordinate tokens, like
    /// [`PostgresConsole::tokenize`].
    pub fn tokenize<'a>(
        &'a self,
        text: &'a str,
        registry: &'a Registry,
    ) -> SqliteSessionStream<'a> {
        SqliteSessionStream {
            sql: &self.sql,
            registry,
            lines: Lines::new(text),
            queue: VecDeque::new(),
            done: false,
        }
    }
}

/// Token stream over one sqlite3 transcript.
pub struct SqliteSessionStream<'a> {
    sql: &'a Lexer,
    registry: &'a Registry,
    lines: Lines<'a>,
    queue: VecDeque<Token>,
    done: bool,
}

impl<'a> SqliteSessionStream<'a> {
    fn cycle(&mut self) {
        let mut curcode = std::string::String::new();
        let mut insertions: Vec<InsertionSpan> = Vec::new();
        let mut seg_start = None;
        let mut saw_line = false;

        while let Some((start, line)) = self.lines.next() {
            saw_line = true;
            if let Some(prompt) = SQLITE_PROMPTS.iter().find(|p| line.starts_with(**p)) {
                if seg_start.is_none() {
                    seg_start = Some(start);
                }
                insertions.push(InsertionSpan {
                    offset: curcode.len(),
                    tokens: vec![Token::new(0, TokenKind::GenericPrompt, *prompt)],
                });
                curcode.push_str(&line[prompt.len()..]);
                continue;
            }

            // a non-command line flushes the pending command, then goes out
            // as output
            self.flush(&curcode, std::mem::take(&mut insertions), seg_start);

            let kind = if line.starts_with("SQL error: ") {
                TokenKind::GenericTraceback
            } else {
                TokenKind::GenericOutput
            };
            self.queue.push_back(Token::new(start, kind, line));
            return;
        }

        self.flush(&curcode, insertions, seg_start);
        if !saw_line {
            self.done = true;
        } else if self.queue.is_empty() {
            self.done = true;
        }
    }

    fn flush(&mut self, curcode: &str, insertions: Vec<InsertionSpan>, seg_start: Option<usize>) {
        if curcode.is_empty() && insertions.is_empty() {
            return;
        }
        let base = seg_start.unwrap_or(0);
        let sql_tokens: Vec<Token> = self.sql.tokenize_with(curcode, self.registry).collect();
        for mut token in merge_insertions(insertions, sql_tokens) {
            token.offset += base;
            self.queue.push_back(token);
        }
    }
}

impl<'a> Iterator for SqliteSessionStream<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }
            if self.done {
                return None;
            }
            self.cycle();
        }
    }
}
