//! The lexer engine: state flattening, pattern compilation, and the token
//! stream driver.
//!
//!     A [`Lexer`] is an immutable, flattened rule table. Construction
//!     resolves state composition, compiles every pattern under the lexer's
//!     options, and validates transition targets, so a constructed lexer can
//!     never fail at tokenize time. Multiple concurrent runs may share one
//!     lexer; each run owns nothing but its own cursor and state stack.
//!
//! The scan loop
//!
//!     At each cursor position the top state's rules are tried in declaration
//!     order, each anchored exactly at the cursor. The first rule whose
//!     pattern and guards accept wins outright; an earlier rule with a
//!     shorter match beats a later rule with a longer one. That ordered-first
//!     tie-break is load-bearing: grammars order a fallback rule after the
//!     specific ones and rely on the specific ones winning even when the
//!     fallback would consume more.
//!
//!     When no rule accepts, the engine emits a one-character `Error` token
//!     and moves on. Tokenization therefore never fails and never loses
//!     text; the worst outcome of malformed input is a stream sprinkled with
//!     single-character error tokens. An unterminated nested state at end of
//!     input is not an error either: the stream just ends.
//!
//! Forward progress
//!
//!     A zero-width acceptance is only useful for its transition. One with no
//!     transition is skipped during the scan, and a run of consecutive
//!     zero-width firings at a single position is cut off at
//!     [`MAX_STATES_PER_POSITION`] by error-recovery, which keeps the whole
//!     run linear in the input length no matter what the grammar does.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::options::LexerOptions;
use crate::registry::Registry;
use crate::rule::compose::StateSpec;
use crate::rule::{Action, CallbackCtx, Embedded, GroupSpec, RuleSpec, StackOp};
use crate::token::{Token, TokenKind};

/// The state every lexer starts in, permanently at the bottom of the stack.
pub const ROOT_STATE: &str = "root";

/// Bound on consecutive zero-width rule firings at one cursor position.
/// Grammars that ping-pong between states without consuming input hit this
/// and fall into error recovery instead of spinning.
pub const MAX_STATES_PER_POSITION: u32 = 64;

/// A static configuration problem found while constructing a lexer.
///
/// These are the only fatal errors in the crate; tokenization itself cannot
/// fail.
#[derive(Debug)]
pub enum GrammarError {
    /// A state referenced by `include` or a transition is not defined, or
    /// the `root` state is missing entirely.
    MissingState { state: String },
    /// State composition includes a state into itself, possibly indirectly.
    IncludeCycle { state: String },
    /// A rule's pattern or guard failed to compile.
    BadPattern {
        state: String,
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::MissingState { state } => {
                write!(f, "state {state:?} is referenced but never defined")
            }
            GrammarError::IncludeCycle { state } => {
                write!(f, "state {state:?} is included into itself")
            }
            GrammarError::BadPattern {
                state,
                pattern,
                source,
            } => write!(f, "bad pattern {pattern:?} in state {state:?}: {source}"),
        }
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrammarError::BadPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A compiled rule: the runnable form of a [`RuleSpec`].
struct Rule {
    /// Consuming pattern, compiled as `\A(?:…)` and matched against the
    /// text from the cursor on. `None` for guard-only zero-width rules.
    body: Option<Regex>,
    /// Compiled `(?:…)\z` matched against the text before the cursor, with
    /// its negation flag.
    behind: Option<(Regex, bool)>,
    /// Compiled `\A(?:…)` matched after the consumed span, with its
    /// negation flag.
    ahead: Option<(Regex, bool)>,
    action: Action,
    ops: Vec<StackOp>,
}

/// An immutable tokenizer for one language: a flattened state table plus
/// the options its patterns were compiled under.
pub struct Lexer {
    name: String,
    aliases: Vec<String>,
    options: LexerOptions,
    states: HashMap<&'static str, Vec<Rule>>,
}

impl fmt::Debug for Lexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("states", &self.states.len())
            .finish()
    }
}

impl Lexer {
    /// Build a lexer from a state spec.
    ///
    /// Resolves composition, compiles every pattern with the options'
    /// compilation flags, and checks that `root` exists and every transition
    /// target is defined. All grammar problems surface here.
    pub fn new(
        name: &str,
        aliases: &[&str],
        spec: &StateSpec,
        options: LexerOptions,
    ) -> Result<Lexer, GrammarError> {
        if !spec.contains(ROOT_STATE) {
            return Err(GrammarError::MissingState {
                state: ROOT_STATE.to_string(),
            });
        }

        let flattened = spec.flatten()?;
        let mut states = HashMap::with_capacity(flattened.len());
        for (state_name, rules) in flattened {
            let compiled = rules
                .iter()
                .map(|r| compile_rule(state_name, r, &options))
                .collect::<Result<Vec<_>, _>>()?;
            states.insert(state_name, compiled);
        }

        // Transition targets must exist; a typo in a push is a grammar bug,
        // not something to discover mid-run.
        for rules in states.values() {
            for rule in rules {
                for op in &rule.ops {
                    if let StackOp::Push(target) = op {
                        if !states.contains_key(target) {
                            return Err(GrammarError::MissingState {
                                state: target.to_string(),
                            });
                        }
                    }
                }
            }
        }

        Ok(Lexer {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            options,
            states,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// Tokenize `text` without a registry: embedded-language references
    /// degrade to literal string tokens.
    pub fn tokenize<'a>(&'a self, text: &'a str) -> TokenStream<'a> {
        self.tokenize_with(text, Registry::empty())
    }

    /// Tokenize `text`, resolving embedded-language references through
    /// `registry`.
    pub fn tokenize_with<'a>(&'a self, text: &'a str, registry: &'a Registry) -> TokenStream<'a> {
        TokenStream {
            lexer: self,
            registry,
            text,
            pos: 0,
            stack: vec![ROOT_STATE],
            pending: VecDeque::new(),
            stalls: 0,
        }
    }
}

fn compile_rule(
    state: &'static str,
    spec: &RuleSpec,
    options: &LexerOptions,
) -> Result<Rule, GrammarError> {
    let compile = |pattern: String, raw: &str| -> Result<Regex, GrammarError> {
        RegexBuilder::new(&pattern)
            .multi_line(true)
            .case_insensitive(options.case_insensitive)
            .build()
            .map_err(|source| GrammarError::BadPattern {
                state: state.to_string(),
                pattern: raw.to_string(),
                source,
            })
    };

    let body = match &spec.body {
        Some(b) => Some(compile(format!(r"\A(?:{b})"), b)?),
        None => None,
    };
    let behind = match &spec.behind {
        Some((p, neg)) => Some((compile(format!(r"(?:{p})\z"), p)?, *neg)),
        None => None,
    };
    let ahead = match &spec.ahead {
        Some((p, neg)) => Some((compile(format!(r"\A(?:{p})"), p)?, *neg)),
        None => None,
    };

    Ok(Rule {
        body,
        behind,
        ahead,
        action: spec.action.clone(),
        ops: spec.ops.clone(),
    })
}

/// A lazy, finite stream of tokens over one input.
///
/// Produced by [`Lexer::tokenize`]; pull-based, so a consumer that stops
/// early simply drops the stream. Restart by calling `tokenize` again.
pub struct TokenStream<'a> {
    lexer: &'a Lexer,
    registry: &'a Registry,
    text: &'a str,
    pos: usize,
    stack: Vec<&'static str>,
    pending: VecDeque<Token>,
    stalls: u32,
}

impl<'a> TokenStream<'a> {
    /// One scan step: try the top state's rules at the cursor, queue
    /// whatever tokens result, and advance cursor and stack. May queue
    /// nothing (a pure transition).
    fn step(&mut self) {
        let lexer = self.lexer;
        let text = self.text;
        let state = self.stack.last().copied().unwrap_or(ROOT_STATE);
        let rules = match lexer.states.get(state) {
            Some(rules) => rules,
            None => {
                self.recover();
                return;
            }
        };
        let rest = &text[self.pos..];

        'scan: for rule in rules {
            if let Some((guard, negative)) = &rule.behind {
                if guard.is_match(&text[..self.pos]) == *negative {
                    continue;
                }
            }

            let (end_rel, captures) = match &rule.body {
                Some(re) => match re.captures(rest) {
                    Some(caps) => {
                        let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
                        (end, Some(caps))
                    }
                    None => continue,
                },
                None => (0, None),
            };

            if let Some((guard, negative)) = &rule.ahead {
                if guard.is_match(&text[self.pos + end_rel..]) == *negative {
                    continue;
                }
            }

            // A zero-width acceptance with nothing to do cannot make
            // progress; let a later rule (or error recovery) have the spot.
            if end_rel == 0 && rule.ops.is_empty() {
                continue;
            }

            let mut end_abs = self.pos + end_rel;
            match &rule.action {
                Action::Emit(kind) => {
                    if end_rel > 0 {
                        let token = Token::new(self.pos, *kind, &rest[..end_rel]);
                        self.pending.push_back(token);
                    }
                }
                Action::Groups(specs) => {
                    if let Some(caps) = &captures {
                        for (i, group_spec) in specs.iter().enumerate() {
                            let group = match caps.get(i + 1) {
                                Some(g) => g,
                                None => continue,
                            };
                            let span = self.pos + group.start()..self.pos + group.end();
                            match group_spec {
                                GroupSpec::Kind(kind) => {
                                    let token = Token::new(span.start, *kind, group.as_str());
                                    self.pending.push_back(token);
                                }
                                GroupSpec::Using(embedded) => {
                                    if !group.as_str().is_empty() {
                                        let sub = self.delegate(*embedded, span);
                                        self.pending.extend(sub);
                                    }
                                }
                            }
                        }
                    }
                }
                Action::Using(embedded) => {
                    if end_rel > 0 {
                        let sub = self.delegate(*embedded, self.pos..end_abs);
                        self.pending.extend(sub);
                    }
                }
                Action::Call(callback) => {
                    let group_spans = match &captures {
                        Some(caps) => (0..caps.len())
                            .map(|i| {
                                caps.get(i)
                                    .map(|g| (self.pos + g.start(), self.pos + g.end()))
                            })
                            .collect(),
                        None => vec![Some((self.pos, self.pos))],
                    };
                    let ctx =
                        CallbackCtx::new(text, group_spans, self.registry, &lexer.options);
                    match callback(&ctx) {
                        Some(outcome) => {
                            self.pending.extend(outcome.tokens);
                            end_abs = outcome.end.clamp(self.pos, text.len());
                        }
                        // Declined: scan on as if the pattern had not matched.
                        None => continue 'scan,
                    }
                }
                Action::Nothing => {}
            }

            if end_abs == self.pos {
                self.stalls += 1;
                if self.stalls > MAX_STATES_PER_POSITION {
                    self.recover();
                    return;
                }
            } else {
                self.stalls = 0;
            }
            self.pos = end_abs;
            self.apply_ops(&rule.ops);
            return;
        }

        self.recover();
    }

    /// No rule accepted: emit one character as `Error` and move past it.
    fn recover(&mut self) {
        if let Some(ch) = self.text[self.pos..].chars().next() {
            let len = ch.len_utf8();
            let token = Token::new(
                self.pos,
                TokenKind::Error,
                &self.text[self.pos..self.pos + len],
            );
            self.pending.push_back(token);
            self.pos += len;
            self.stalls = 0;
        }
    }

    fn apply_ops(&mut self, ops: &[StackOp]) {
        for op in ops {
            match op {
                StackOp::Push(state) => self.stack.push(*state),
                StackOp::PushAgain => {
                    if let Some(&top) = self.stack.last() {
                        self.stack.push(top);
                    }
                }
                StackOp::Pop(n) => {
                    let keep = self.stack.len().saturating_sub(*n).max(1);
                    self.stack.truncate(keep);
                }
                StackOp::Clear => self.stack.truncate(1),
            }
        }
    }

    /// Tokenize `span` of the input with an embedded lexer and re-offset
    /// the result into this run's coordinates. An unresolvable reference
    /// degrades to a single literal token; it never fails the run.
    fn delegate(&self, embedded: Embedded, span: Range<usize>) -> Vec<Token> {
        let slice = &self.text[span.clone()];
        let mut produced: Vec<Token> = match embedded {
            Embedded::This => self.lexer.tokenize_with(slice, self.registry).collect(),
            Embedded::Named(name) => match self.registry.get(name) {
                Some(sub) => sub.tokenize_with(slice, self.registry).collect(),
                None => {
                    log::debug!("embedded lexer {name:?} not in registry; emitting literal span");
                    vec![Token::new(0, TokenKind::String, slice)]
                }
            },
        };
        for token in &mut produced {
            token.offset += span.start;
        }
        produced
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.pos >= self.text.len() {
                return None;
            }
            self.step();
        }
    }
}
