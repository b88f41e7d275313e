//! State composition: building and deriving rule tables.
//!
//!     A [`StateSpec`] is an ordered set of named states, each an ordered
//!     list of rules. `include` entries splice another state's rules in
//!     verbatim at their position; splicing is resolved once, when a lexer is
//!     constructed, and a cycle among includes is a construction-time error,
//!     never a tokenize-time one.
//!
//!     Derived grammars do not inherit: they take a base spec and rewrite it
//!     through [`StateSpec::prepend`], [`StateSpec::append`] and
//!     [`StateSpec::replace_tagged`] before construction. A tagged rule is a
//!     named fragment a derived grammar may swap out, the way a dialect
//!     splices an extended keyword table over the base one.

use crate::engine::GrammarError;
use crate::rule::RuleSpec;

/// An ordered collection of named states, the unit a lexer is built from.
#[derive(Debug, Clone, Default)]
pub struct StateSpec {
    states: Vec<(&'static str, Vec<RuleSpec>)>,
}

impl StateSpec {
    pub fn new() -> StateSpec {
        StateSpec::default()
    }

    /// Define a state. Redefining an existing name replaces its rules.
    pub fn state(&mut self, name: &'static str, rules: Vec<RuleSpec>) -> &mut StateSpec {
        if let Some(entry) = self.states.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = rules;
        } else {
            self.states.push((name, rules));
        }
        self
    }

    /// Splice rules at the front of an existing state.
    pub fn prepend(&mut self, name: &'static str, rules: Vec<RuleSpec>) -> &mut StateSpec {
        if let Some(entry) = self.states.iter_mut().find(|(n, _)| *n == name) {
            entry.1.splice(0..0, rules);
        }
        self
    }

    /// Splice rules at the end of an existing state.
    pub fn append(&mut self, name: &'static str, rules: Vec<RuleSpec>) -> &mut StateSpec {
        if let Some(entry) = self.states.iter_mut().find(|(n, _)| *n == name) {
            entry.1.extend(rules);
        }
        self
    }

    /// Replace the first rule tagged `tag` in `name` with `replacement`.
    ///
    /// Panics when the fragment is absent: a derived grammar asking for a
    /// fragment its base does not carry is a bug in the grammar, caught the
    /// first time the grammar is built.
    pub fn replace_tagged(
        &mut self,
        name: &'static str,
        tag: &'static str,
        replacement: Vec<RuleSpec>,
    ) -> &mut StateSpec {
        let entry = self
            .states
            .iter_mut()
            .find(|(n, _)| *n == name)
            .unwrap_or_else(|| panic!("no state {name:?} to replace fragment {tag:?} in"));
        let at = entry
            .1
            .iter()
            .position(|r| r.tag == Some(tag))
            .unwrap_or_else(|| panic!("no fragment tagged {tag:?} in state {name:?}"));
        entry.1.splice(at..at + 1, replacement);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.states.iter().any(|(n, _)| *n == name)
    }

    fn get(&self, name: &str) -> Option<&[RuleSpec]> {
        self.states
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, rules)| rules.as_slice())
    }

    /// Resolve every `include` splice, yielding one flat rule list per
    /// state. Unknown targets and include cycles fail here.
    pub(crate) fn flatten(
        &self,
    ) -> Result<Vec<(&'static str, Vec<RuleSpec>)>, GrammarError> {
        let mut flattened = Vec::with_capacity(self.states.len());
        for (name, _) in &self.states {
            let mut visiting = Vec::new();
            flattened.push((*name, self.resolve(name, &mut visiting)?));
        }
        Ok(flattened)
    }

    fn resolve(
        &self,
        name: &'static str,
        visiting: &mut Vec<&'static str>,
    ) -> Result<Vec<RuleSpec>, GrammarError> {
        if visiting.contains(&name) {
            return Err(GrammarError::IncludeCycle {
                state: name.to_string(),
            });
        }
        let rules = self.get(name).ok_or_else(|| GrammarError::MissingState {
            state: name.to_string(),
        })?;
        visiting.push(name);
        let mut out = Vec::with_capacity(rules.len());
        for rule in rules {
            match rule.include {
                Some(target) => out.extend(self.resolve(target, visiting)?),
                None => out.push(rule.clone()),
            }
        }
        visiting.pop();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{include, rule};
    use crate::token::TokenKind;

    fn bodies(rules: &[RuleSpec]) -> Vec<String> {
        rules.iter().filter_map(|r| r.body.clone()).collect()
    }

    #[test]
    fn test_include_splices_in_place() {
        let mut spec = StateSpec::new();
        spec.state(
            "root",
            vec![
                rule("a", TokenKind::Name),
                include("shared"),
                rule("z", TokenKind::Name),
            ],
        );
        spec.state("shared", vec![rule("m", TokenKind::Name), rule("n", TokenKind::Name)]);

        let flat = spec.flatten().unwrap();
        let root = &flat.iter().find(|(n, _)| *n == "root").unwrap().1;
        assert_eq!(bodies(root), vec!["a", "m", "n", "z"]);
    }

    #[test]
    fn test_nested_includes_resolve() {
        let mut spec = StateSpec::new();
        spec.state("root", vec![include("mid")]);
        spec.state("mid", vec![include("leaf"), rule("m", TokenKind::Name)]);
        spec.state("leaf", vec![rule("l", TokenKind::Name)]);

        let flat = spec.flatten().unwrap();
        let root = &flat.iter().find(|(n, _)| *n == "root").unwrap().1;
        assert_eq!(bodies(root), vec!["l", "m"]);
    }

    #[test]
    fn test_include_cycle_is_fatal() {
        let mut spec = StateSpec::new();
        spec.state("root", vec![include("a")]);
        spec.state("a", vec![include("b")]);
        spec.state("b", vec![include("a")]);

        match spec.flatten() {
            Err(GrammarError::IncludeCycle { state }) => assert_eq!(state, "a"),
            other => panic!("expected include cycle, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_self_include_is_a_cycle() {
        let mut spec = StateSpec::new();
        spec.state("root", vec![include("root")]);
        assert!(matches!(
            spec.flatten(),
            Err(GrammarError::IncludeCycle { .. })
        ));
    }

    #[test]
    fn test_unknown_include_target_is_fatal() {
        let mut spec = StateSpec::new();
        spec.state("root", vec![include("missing")]);
        assert!(matches!(
            spec.flatten(),
            Err(GrammarError::MissingState { .. })
        ));
    }

    #[test]
    fn test_replace_tagged_swaps_fragment() {
        let mut spec = StateSpec::new();
        spec.state(
            "root",
            vec![
                rule("a", TokenKind::Name),
                rule("kw", TokenKind::Keyword).tagged("keywords"),
                rule("z", TokenKind::Name),
            ],
        );
        spec.replace_tagged("root", "keywords", vec![rule("kw|more", TokenKind::Keyword)]);

        let flat = spec.flatten().unwrap();
        let root = &flat[0].1;
        assert_eq!(bodies(root), vec!["a", "kw|more", "z"]);
    }

    #[test]
    fn test_prepend_and_append() {
        let mut spec = StateSpec::new();
        spec.state("root", vec![rule("m", TokenKind::Name)]);
        spec.prepend("root", vec![rule("first", TokenKind::Name)]);
        spec.append("root", vec![rule("last", TokenKind::Name)]);

        let flat = spec.flatten().unwrap();
        assert_eq!(bodies(&flat[0].1), vec!["first", "m", "last"]);
    }
}
