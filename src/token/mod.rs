//! Token kinds and the token triple shared by every lexer in the crate.
//!
//!     Kinds form a fixed hierarchy: `String.Single` is-a `String` is-a
//!     `Literal` is-a the root kind. Renderers that have no mapping for a
//!     specific kind walk the ancestor chain until one resolves, so the
//!     chain must be total; every kind bottoms out at [`TokenKind::Token`].
//!
//!     The hierarchy is closed: each kind carries an explicit parent, looked
//!     up by [`TokenKind::parent`], rather than being spelled out of dotted
//!     strings at run time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The classification of a span of source text.
///
/// Variant names read as the dotted path of the hierarchy with the dots
/// removed: `StringSingle` is `String.Single`, `NameFunctionMagic` is
/// `Name.Function.Magic`, and so on. [`TokenKind::name`] renders the dotted
/// form back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// The root of the hierarchy. Never emitted directly.
    Token,

    Text,
    Whitespace,
    Error,
    Other,

    Keyword,
    KeywordConstant,
    KeywordDeclaration,
    KeywordNamespace,
    KeywordPseudo,
    KeywordReserved,
    KeywordType,

    Name,
    NameAttribute,
    NameBuiltin,
    NameClass,
    NameConstant,
    NameDecorator,
    NameFunction,
    NameFunctionMagic,
    NameLabel,
    NameProperty,
    NameTag,
    NameVariable,
    NameVariableGlobal,
    NameVariableInstance,
    NameVariableMagic,

    Literal,
    LiteralDate,

    String,
    StringAffix,
    StringBacktick,
    StringChar,
    StringDelimiter,
    StringDouble,
    StringEscape,
    StringInterpol,
    StringName,
    StringOther,
    StringSingle,
    StringSymbol,

    Number,
    NumberBin,
    NumberFloat,
    NumberHex,
    NumberInteger,
    NumberIntegerLong,
    NumberOct,

    Operator,
    OperatorWord,

    Punctuation,

    Comment,
    CommentMultiline,
    CommentPreproc,
    CommentSingle,
    CommentSpecial,

    Generic,
    GenericError,
    GenericOutput,
    GenericPrompt,
    GenericStrong,
    GenericTraceback,
}

impl TokenKind {
    /// The kind one level up the hierarchy, or `None` for the root.
    pub fn parent(self) -> Option<TokenKind> {
        use TokenKind::*;
        let parent = match self {
            Token => return None,

            Text | Error | Other | Keyword | Name | Literal | Operator | Punctuation | Comment
            | Generic => Token,

            Whitespace => Text,

            KeywordConstant | KeywordDeclaration | KeywordNamespace | KeywordPseudo
            | KeywordReserved | KeywordType => Keyword,

            NameAttribute | NameBuiltin | NameClass | NameConstant | NameDecorator
            | NameFunction | NameLabel | NameProperty | NameTag | NameVariable => Name,
            NameFunctionMagic => NameFunction,
            NameVariableGlobal | NameVariableInstance | NameVariableMagic => NameVariable,

            LiteralDate => Literal,

            String | Number => Literal,
            StringAffix | StringBacktick | StringChar | StringDelimiter | StringDouble
            | StringEscape | StringInterpol | StringName | StringOther | StringSingle
            | StringSymbol => String,
            NumberBin | NumberFloat | NumberHex | NumberInteger | NumberOct => Number,
            NumberIntegerLong => NumberInteger,

            OperatorWord => Operator,

            CommentMultiline | CommentPreproc | CommentSingle | CommentSpecial => Comment,

            GenericError | GenericOutput | GenericPrompt | GenericStrong | GenericTraceback => {
                Generic
            }
        };
        Some(parent)
    }

    /// Walk from this kind to the root, starting with the kind itself.
    pub fn ancestors(self) -> Ancestors {
        Ancestors { next: Some(self) }
    }

    /// Whether this kind is `other` or a descendant of it.
    ///
    /// `StringSingle.is_a(Literal)` holds; `Literal.is_a(StringSingle)` does
    /// not. Every kind is-a [`TokenKind::Token`].
    pub fn is_a(self, other: TokenKind) -> bool {
        self.ancestors().any(|k| k == other)
    }

    /// The dotted name of this kind, e.g. `"String.Single"`.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Token => "Token",
            Text => "Text",
            Whitespace => "Text.Whitespace",
            Error => "Error",
            Other => "Other",
            Keyword => "Keyword",
            KeywordConstant => "Keyword.Constant",
            KeywordDeclaration => "Keyword.Declaration",
            KeywordNamespace => "Keyword.Namespace",
            KeywordPseudo => "Keyword.Pseudo",
            KeywordReserved => "Keyword.Reserved",
            KeywordType => "Keyword.Type",
            Name => "Name",
            NameAttribute => "Name.Attribute",
            NameBuiltin => "Name.Builtin",
            NameClass => "Name.Class",
            NameConstant => "Name.Constant",
            NameDecorator => "Name.Decorator",
            NameFunction => "Name.Function",
            NameFunctionMagic => "Name.Function.Magic",
            NameLabel => "Name.Label",
            NameProperty => "Name.Property",
            NameTag => "Name.Tag",
            NameVariable => "Name.Variable",
            NameVariableGlobal => "Name.Variable.Global",
            NameVariableInstance => "Name.Variable.Instance",
            NameVariableMagic => "Name.Variable.Magic",
            Literal => "Literal",
            LiteralDate => "Literal.Date",
            String => "Literal.String",
            StringAffix => "Literal.String.Affix",
            StringBacktick => "Literal.String.Backtick",
            StringChar => "Literal.String.Char",
            StringDelimiter => "Literal.String.Delimiter",
            StringDouble => "Literal.String.Double",
            StringEscape => "Literal.String.Escape",
            StringInterpol => "Literal.String.Interpol",
            StringName => "Literal.String.Name",
            StringOther => "Literal.String.Other",
            StringSingle => "Literal.String.Single",
            StringSymbol => "Literal.String.Symbol",
            Number => "Literal.Number",
            NumberBin => "Literal.Number.Bin",
            NumberFloat => "Literal.Number.Float",
            NumberHex => "Literal.Number.Hex",
            NumberInteger => "Literal.Number.Integer",
            NumberIntegerLong => "Literal.Number.Integer.Long",
            NumberOct => "Literal.Number.Oct",
            Operator => "Operator",
            OperatorWord => "Operator.Word",
            Punctuation => "Punctuation",
            Comment => "Comment",
            CommentMultiline => "Comment.Multiline",
            CommentPreproc => "Comment.Preproc",
            CommentSingle => "Comment.Single",
            CommentSpecial => "Comment.Special",
            Generic => "Generic",
            GenericError => "Generic.Error",
            GenericOutput => "Generic.Output",
            GenericPrompt => "Generic.Prompt",
            GenericStrong => "Generic.Strong",
            GenericTraceback => "Generic.Traceback",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Iterator over a kind and its ancestors, ending at the root.
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<TokenKind>,
}

impl Iterator for Ancestors {
    type Item = TokenKind;

    fn next(&mut self) -> Option<TokenKind> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

/// One classified span of source text.
///
/// `offset` is the byte position of `text` in the tokenized input. Tokens of
/// one run are emitted in non-decreasing offset order and their texts
/// concatenate back to the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub offset: usize,
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(offset: usize, kind: TokenKind, text: impl Into<String>) -> Token {
        Token {
            offset,
            kind,
            text: text.into(),
        }
    }

    /// The byte range this token covers in the input.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.text.len()
    }
}
