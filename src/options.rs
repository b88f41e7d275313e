//! Lexer configuration options.
//!
//!     `case_insensitive` feeds straight into pattern compilation when a
//!     lexer is constructed. The remaining options only affect the optional
//!     [`normalize`] pre-pass; the engine itself always tokenizes the text it
//!     is handed, byte for byte, so callers that need lossless offsets into
//!     the original buffer simply skip normalization.

/// Recognized options for lexer construction and input normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexerOptions {
    /// Compile the lexer's patterns case-insensitively.
    pub case_insensitive: bool,
    /// Strip leading and trailing newlines from the input in [`normalize`].
    pub strip_nl: bool,
    /// Strip all leading and trailing whitespace from the input in
    /// [`normalize`]. Implies `strip_nl`.
    pub strip_all: bool,
    /// Expand tabs to this many spaces in [`normalize`]. Zero leaves tabs
    /// alone.
    pub tab_size: usize,
}

impl LexerOptions {
    /// Options with case-insensitive matching switched on, the common base
    /// for the SQL family of lexers.
    pub fn case_insensitive() -> LexerOptions {
        LexerOptions {
            case_insensitive: true,
            ..LexerOptions::default()
        }
    }
}

/// Normalize input text before tokenization.
///
/// Converts `\r\n` and `\r` line endings to `\n`, expands tabs when
/// `tab_size` is non-zero, and strips outer newlines/whitespace per the
/// options. This changes byte offsets relative to the caller's original
/// buffer, which is why it is a separate opt-in step and not part of the
/// engine.
pub fn normalize(text: &str, options: &LexerOptions) -> String {
    let mut text = text.replace("\r\n", "\n").replace('\r', "\n");
    if options.tab_size > 0 {
        text = text.replace('\t', &" ".repeat(options.tab_size));
    }
    if options.strip_all {
        text = text.trim().to_string();
    } else if options.strip_nl {
        text = text.trim_matches('\n').to_string();
    }
    text
}
