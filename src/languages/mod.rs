//! The per-language rule tables.
//!
//!     Each module exports a `lexer()` constructor (the SQL module exports
//!     one per dialect); [`registry`] builds the full registry the way a
//!     host application would, which is also what embedded-language
//!     delegation resolves against.

pub mod ada;
pub mod amdgcn;
pub mod floscript;
pub mod macaulay2;
pub mod phix;
pub mod soar;
pub mod sql;
pub mod tact;
pub mod tal;

use crate::registry::Registry;

/// A registry holding every lexer in the crate under its usual aliases.
pub fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(ada::lexer());
    registry.register(amdgcn::lexer());
    registry.register(floscript::lexer());
    registry.register(macaulay2::lexer());
    registry.register(phix::lexer());
    registry.register(soar::lexer());
    registry.register(sql::sql());
    registry.register(sql::postgres());
    registry.register(sql::plpgsql());
    registry.register(sql::transact_sql());
    registry.register(sql::mysql());
    registry.register(sql::rql());
    registry.register(tact::lexer());
    registry.register(tal::lexer());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_all_languages() {
        let registry = registry();
        for alias in [
            "ada", "amdgcn", "floscript", "flo", "macaulay2", "phix", "soar", "sql",
            "postgresql", "postgres", "plpgsql", "tsql", "mysql", "rql", "tact", "tal", "uxntal",
        ] {
            assert!(registry.get(alias).is_some(), "missing alias {alias:?}");
        }
    }

    #[test]
    fn test_every_lexer_survives_arbitrary_input() {
        // not valid in any of the languages; every lexer must still produce
        // a lossless stream
        let garbage = "\u{0}\u{1}«weird» \\x00 $$$ ((( \n\t\r\n end";
        let registry = registry();
        for name in [
            "ada", "amdgcn", "floscript", "macaulay2", "phix", "soar", "sql", "postgresql",
            "plpgsql", "tsql", "mysql", "rql", "tact", "tal",
        ] {
            let lexer = registry.get(name).unwrap();
            let joined: String = lexer
                .tokenize_with(garbage, &registry)
                .map(|t| t.text)
                .collect();
            assert_eq!(joined, garbage, "lossy stream from {name}");
        }
    }
}
