//! Explicit lexer registry used for embedded-language delegation.
//!
//!     Delegation rules name their target language ("python", "plpgsql");
//!     something has to turn that name into a lexer. Rather than a
//!     process-wide lookup, the registry is a plain value handed to
//!     [`Lexer::tokenize_with`](crate::engine::Lexer::tokenize_with), so a
//!     tokenization run touches nothing outside what it was given and tests
//!     can run lexers against a registry of their own making.
//!
//!     Lookup is by lowercased alias. A miss is not an error anywhere in the
//!     crate: every caller has a degraded-but-lossless fallback.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::engine::Lexer;

static EMPTY: Lazy<Registry> = Lazy::new(Registry::new);

/// Maps language aliases to shared lexers.
#[derive(Debug, Default)]
pub struct Registry {
    lexers: HashMap<String, Arc<Lexer>>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// A shared registry with nothing in it; what [`Lexer::tokenize`] uses.
    pub fn empty() -> &'static Registry {
        &EMPTY
    }

    /// Register a lexer under its name and all of its aliases, returning
    /// the shared handle.
    pub fn register(&mut self, lexer: Lexer) -> Arc<Lexer> {
        let lexer = Arc::new(lexer);
        self.register_shared(Arc::clone(&lexer));
        lexer
    }

    /// Register an already-shared lexer under its name and aliases.
    pub fn register_shared(&mut self, lexer: Arc<Lexer>) {
        self.lexers
            .insert(lexer.name().to_lowercase(), Arc::clone(&lexer));
        for alias in lexer.aliases() {
            self.lexers.insert(alias.to_lowercase(), Arc::clone(&lexer));
        }
    }

    /// Look up a lexer by name or alias, case-insensitively.
    pub fn get(&self, name: &str) -> Option<Arc<Lexer>> {
        self.lexers.get(&name.to_lowercase()).cloned()
    }

    /// Number of distinct aliases registered.
    pub fn len(&self) -> usize {
        self.lexers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexers.is_empty()
    }
}
