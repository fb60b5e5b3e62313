//! Language dialect selection for entries whose definition depends on C vs C++.

use std::fmt;

/// Dialect a unit is compiled in. Chosen once per registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    #[default]
    C,
    Cxx,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::C => f.write_str("C"),
            Dialect::Cxx => f.write_str("C++"),
        }
    }
}

/// Which dialects an entry is defined for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DialectScope {
    #[default]
    Any,
    C,
    Cxx,
}

impl DialectScope {
    pub fn admits(self, dialect: Dialect) -> bool {
        matches!(
            (self, dialect),
            (DialectScope::Any, _) | (DialectScope::C, Dialect::C) | (DialectScope::Cxx, Dialect::Cxx)
        )
    }

    pub fn overlaps(self, other: DialectScope) -> bool {
        [Dialect::C, Dialect::Cxx]
            .into_iter()
            .any(|dialect| self.admits(dialect) && other.admits(dialect))
    }
}
