//! Rule specifications: what a lexer's states are made of.
//!
//!     A rule pairs a pattern with an action and an optional state-stack
//!     transition. Rules are authored as [`RuleSpec`] values through the small
//!     builder functions in this module and compiled into their runnable form
//!     when a [`Lexer`](crate::engine::Lexer) is constructed, so one spec can
//!     be compiled under different option sets.
//!
//! Patterns and guards
//!
//!     The consuming pattern is an ordinary regex, anchored by the engine at
//!     the cursor. The regex crate has no lookaround, so rules additionally
//!     carry zero-width context guards:
//!
//!         .behind(p) / .not_behind(p)   the text before the cursor must
//!                                       (not) end with a match of `p`
//!         .ahead(p) / .not_ahead(p)     the text after the consumed span
//!                                       must (not) start with a match of `p`
//!
//!     A rule may also have no consuming pattern at all ([`jump`]): it
//!     matches zero-width, subject to its guards, and exists only for its
//!     transition. Guard-only rules express the pure-assertion rules some
//!     grammars rely on.
//!
//! Ordering
//!
//!     Rule order within a state is significant: the first rule that accepts
//!     at the cursor wins, even when a later rule would match a longer span.
//!     This is leftmost-rule priority, not longest match, and grammars are
//!     written against it.

pub mod compose;

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::options::LexerOptions;
use crate::registry::Registry;
use crate::token::{Token, TokenKind};

/// Reference to an embedded lexer used for delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Embedded {
    /// Recurse into the current lexer with a fresh state stack.
    This,
    /// Look the lexer up in the registry by alias at tokenize time.
    Named(&'static str),
}

/// What to emit for one capture group of a [`groups_with`] rule.
#[derive(Clone)]
pub enum GroupSpec {
    /// Emit the group's text as one token of this kind.
    Kind(TokenKind),
    /// Tokenize the group's text with an embedded lexer, re-offset into the
    /// parent's coordinates.
    Using(Embedded),
}

/// The outcome a [`Callback`] hands back to the engine.
///
/// `tokens` carry absolute offsets into the full input and must tile the
/// span from the match start to `end` exactly; `end` may extend past the
/// consuming pattern's match when the callback recognized a longer
/// construct.
pub struct CallbackOutcome {
    pub tokens: Vec<Token>,
    pub end: usize,
}

/// Context handed to a [`Callback`] when its rule's pattern matched.
pub struct CallbackCtx<'a> {
    /// The entire input being tokenized.
    pub text: &'a str,
    /// Absolute byte offset of the match start.
    pub start: usize,
    /// Absolute byte offset of the consuming pattern's match end.
    pub end: usize,
    /// Absolute spans of the match's capture groups; index 0 is the whole
    /// match, groups that did not participate are `None`.
    groups: Vec<Option<(usize, usize)>>,
    pub registry: &'a Registry,
    pub options: &'a LexerOptions,
}

impl<'a> CallbackCtx<'a> {
    pub(crate) fn new(
        text: &'a str,
        groups: Vec<Option<(usize, usize)>>,
        registry: &'a Registry,
        options: &'a LexerOptions,
    ) -> CallbackCtx<'a> {
        let (start, end) = groups[0].unwrap_or((0, 0));
        CallbackCtx {
            text,
            start,
            end,
            groups,
            registry,
            options,
        }
    }

    /// Absolute span of capture group `i` (0 = whole match), if it
    /// participated in the match.
    pub fn group_span(&self, i: usize) -> Option<Range<usize>> {
        self.groups.get(i).copied().flatten().map(|(s, e)| s..e)
    }

    /// Text of capture group `i`, if it participated in the match.
    pub fn group_text(&self, i: usize) -> Option<&'a str> {
        self.group_span(i).map(|r| &self.text[r])
    }
}

/// A custom rule action.
///
/// Returning `None` declines the match: the engine carries on with the next
/// rule as if the pattern had not matched. This is how a callback rejects a
/// construct its pattern alone cannot fully validate (an unterminated
/// delimited literal, say).
pub type Callback = Arc<dyn Fn(&CallbackCtx<'_>) -> Option<CallbackOutcome> + Send + Sync>;

/// What a rule does once its pattern accepts.
#[derive(Clone)]
pub enum Action {
    /// Emit the whole match as one token.
    Emit(TokenKind),
    /// Emit one token per capture group, in group order.
    Groups(Vec<GroupSpec>),
    /// Tokenize the whole match with an embedded lexer.
    Using(Embedded),
    /// Run a callback.
    Call(Callback),
    /// Emit nothing; the rule exists for its transition.
    Nothing,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Emit(kind) => write!(f, "Emit({})", kind),
            Action::Groups(specs) => write!(f, "Groups(..{} groups)", specs.len()),
            Action::Using(embedded) => write!(f, "Using({:?})", embedded),
            Action::Call(_) => write!(f, "Call(..)"),
            Action::Nothing => write!(f, "Nothing"),
        }
    }
}

/// One operation on the state stack. A rule's transition is an ordered list
/// of these, applied left to right after the rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOp {
    /// Push the named state.
    Push(&'static str),
    /// Push the state currently on top again.
    PushAgain,
    /// Pop `n` states; the root state at the bottom is never popped.
    Pop(usize),
    /// Drop everything above the root state.
    Clear,
}

/// An uncompiled rule, or an `include` splice, inside a state definition.
///
/// Built via [`rule`], [`groups`], [`groups_with`], [`delegate`],
/// [`callback`], [`jump`] and [`include`]; refined with the builder methods.
#[derive(Clone)]
pub struct RuleSpec {
    pub(crate) include: Option<&'static str>,
    pub(crate) body: Option<String>,
    pub(crate) behind: Option<(String, bool)>,
    pub(crate) ahead: Option<(String, bool)>,
    pub(crate) action: Action,
    pub(crate) ops: Vec<StackOp>,
    pub(crate) tag: Option<&'static str>,
}

impl fmt::Debug for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.include {
            return write!(f, "include({:?})", name);
        }
        f.debug_struct("RuleSpec")
            .field("body", &self.body)
            .field("action", &self.action)
            .field("ops", &self.ops)
            .finish()
    }
}

fn spec(body: Option<String>, action: Action) -> RuleSpec {
    RuleSpec {
        include: None,
        body,
        behind: None,
        ahead: None,
        action,
        ops: Vec::new(),
        tag: None,
    }
}

/// A rule emitting its whole match as one token.
pub fn rule(pattern: &str, kind: TokenKind) -> RuleSpec {
    spec(Some(pattern.to_string()), Action::Emit(kind))
}

/// A rule emitting one token per capture group.
pub fn groups(pattern: &str, kinds: &[TokenKind]) -> RuleSpec {
    groups_with(pattern, kinds.iter().copied().map(GroupSpec::Kind).collect())
}

/// Like [`groups`], but individual groups may delegate to an embedded lexer.
pub fn groups_with(pattern: &str, specs: Vec<GroupSpec>) -> RuleSpec {
    spec(Some(pattern.to_string()), Action::Groups(specs))
}

/// A rule tokenizing its whole match with an embedded lexer.
pub fn delegate(pattern: &str, embedded: Embedded) -> RuleSpec {
    spec(Some(pattern.to_string()), Action::Using(embedded))
}

/// A rule running a callback on match.
pub fn callback<F>(pattern: &str, f: F) -> RuleSpec
where
    F: Fn(&CallbackCtx<'_>) -> Option<CallbackOutcome> + Send + Sync + 'static,
{
    spec(Some(pattern.to_string()), Action::Call(Arc::new(f)))
}

/// A zero-width rule with no consuming pattern: it always accepts (subject
/// to guards) and exists for its transition.
pub fn jump() -> RuleSpec {
    spec(None, Action::Nothing)
}

/// Splice another state's rules in at this position.
pub fn include(state: &'static str) -> RuleSpec {
    RuleSpec {
        include: Some(state),
        ..spec(None, Action::Nothing)
    }
}

impl RuleSpec {
    /// Push the named state after this rule fires.
    pub fn push(mut self, state: &'static str) -> RuleSpec {
        self.ops.push(StackOp::Push(state));
        self
    }

    /// Push the current state again after this rule fires.
    pub fn push_again(mut self) -> RuleSpec {
        self.ops.push(StackOp::PushAgain);
        self
    }

    /// Pop one state after this rule fires.
    pub fn pop(self) -> RuleSpec {
        self.pop_n(1)
    }

    /// Pop `n` states after this rule fires.
    pub fn pop_n(mut self, n: usize) -> RuleSpec {
        self.ops.push(StackOp::Pop(n));
        self
    }

    /// Drop back to the root state after this rule fires.
    pub fn reset(mut self) -> RuleSpec {
        self.ops.push(StackOp::Clear);
        self
    }

    /// Require the text before the cursor to end with a match of `pattern`.
    pub fn behind(mut self, pattern: &str) -> RuleSpec {
        self.behind = Some((pattern.to_string(), false));
        self
    }

    /// Require the text before the cursor to not end with a match of
    /// `pattern`.
    pub fn not_behind(mut self, pattern: &str) -> RuleSpec {
        self.behind = Some((pattern.to_string(), true));
        self
    }

    /// Require the text after the consumed span to start with a match of
    /// `pattern`.
    pub fn ahead(mut self, pattern: &str) -> RuleSpec {
        self.ahead = Some((pattern.to_string(), false));
        self
    }

    /// Require the text after the consumed span to not start with a match of
    /// `pattern`.
    pub fn not_ahead(mut self, pattern: &str) -> RuleSpec {
        self.ahead = Some((pattern.to_string(), true));
        self
    }

    /// Name this rule so a derived grammar can replace it wholesale.
    pub fn tagged(mut self, tag: &'static str) -> RuleSpec {
        self.tag = Some(tag);
        self
    }
}

/// Build an alternation pattern matching any of `words`, each
/// regex-escaped, wrapped in `prefix`/`suffix`.
///
/// Keyword tables use this instead of spelling hundreds of alternatives by
/// hand. With a `\b` suffix the alternation behaves like longest-keyword
/// match under leftmost-first semantics: a shorter keyword that is a prefix
/// of a longer one fails its boundary check and the longer alternative is
/// taken.
pub fn words(words: &[&str], prefix: &str, suffix: &str) -> String {
    let mut pattern = String::from(prefix);
    pattern.push_str("(?:");
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            pattern.push('|');
        }
        pattern.push_str(&regex::escape(word));
    }
    pattern.push(')');
    pattern.push_str(suffix);
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_escapes_and_wraps() {
        let pattern = words(&["a+b", "c"], r"\b", r"\b");
        assert_eq!(pattern, r"\b(?:a\+b|c)\b");
    }

    #[test]
    fn test_builder_accumulates_ops_in_order() {
        let spec = rule(r"\(", TokenKind::Punctuation).pop().push("formal_part");
        assert_eq!(spec.ops, vec![StackOp::Pop(1), StackOp::Push("formal_part")]);
    }

    #[test]
    fn test_guards_record_polarity() {
        let spec = rule(r"x", TokenKind::Name)
            .not_behind(r"\S")
            .ahead(r"\s");
        assert_eq!(spec.behind, Some((r"\S".to_string(), true)));
        assert_eq!(spec.ahead, Some((r"\s".to_string(), false)));
    }

    #[test]
    fn test_include_is_marked() {
        assert_eq!(include("comments").include, Some("comments"));
        assert!(rule("x", TokenKind::Name).include.is_none());
    }
}
