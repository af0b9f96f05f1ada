//! This module defines [Predicate] and [BuiltinPredicate].

use std::{fmt::Display, str::FromStr, sync::Arc};

use enum_assoc::Assoc;
use strum_macros::{EnumIter, EnumString};

/// Predicate
///
/// A name together with an arity.
/// Predicates also serve as the symbols of function terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Predicate {
    /// Name of the predicate
    name: Arc<str>,
    /// Number of arguments
    arity: usize,
}

impl Predicate {
    /// Create a new [Predicate].
    pub fn new(name: &str, arity: usize) -> Self {
        Self {
            name: Arc::from(name),
            arity,
        }
    }

    /// Return the name of this predicate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the arity of this predicate.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Return a predicate with the same name but a different arity.
    pub fn with_arity(&self, arity: usize) -> Self {
        Self {
            name: self.name.clone(),
            arity,
        }
    }

    /// Return the [BuiltinPredicate] denoted by this predicate, if any.
    pub fn builtin(&self) -> Option<BuiltinPredicate> {
        BuiltinPredicate::from_str(&self.name)
            .ok()
            .filter(|builtin| builtin.arity() == self.arity)
    }

    /// Return whether this is a built-in boolean predicate.
    pub fn is_builtin(&self) -> bool {
        self.builtin().is_some()
    }
}

impl From<BuiltinPredicate> for Predicate {
    fn from(value: BuiltinPredicate) -> Self {
        Self::new(value.name(), value.arity())
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Boolean predicates with a fixed interpretation
///
/// Atoms over these predicates are conditions
/// and are never unfolded.
#[derive(Assoc, Debug, Copy, Clone, PartialEq, Eq, Hash, EnumString, EnumIter)]
#[func(pub fn name(&self) -> &'static str)]
#[func(pub fn arity(&self) -> usize)]
pub enum BuiltinPredicate {
    /// Equality
    #[strum(serialize = "EQ")]
    #[assoc(name = "EQ")]
    #[assoc(arity = 2)]
    Equal,
    /// Inequality
    #[strum(serialize = "NEQ")]
    #[assoc(name = "NEQ")]
    #[assoc(arity = 2)]
    Unequal,
    /// Less than
    #[strum(serialize = "LT")]
    #[assoc(name = "LT")]
    #[assoc(arity = 2)]
    Less,
    /// Less than or equal
    #[strum(serialize = "LTE")]
    #[assoc(name = "LTE")]
    #[assoc(arity = 2)]
    LessEqual,
    /// Greater than
    #[strum(serialize = "GT")]
    #[assoc(name = "GT")]
    #[assoc(arity = 2)]
    Greater,
    /// Greater than or equal
    #[strum(serialize = "GTE")]
    #[assoc(name = "GTE")]
    #[assoc(arity = 2)]
    GreaterEqual,
    /// Value is null
    #[strum(serialize = "IS_NULL")]
    #[assoc(name = "IS_NULL")]
    #[assoc(arity = 1)]
    IsNull,
    /// Value is not null
    #[strum(serialize = "IS_NOT_NULL")]
    #[assoc(name = "IS_NOT_NULL")]
    #[assoc(arity = 1)]
    IsNotNull,
    /// Conjunction
    #[strum(serialize = "AND")]
    #[assoc(name = "AND")]
    #[assoc(arity = 2)]
    And,
    /// Disjunction
    #[strum(serialize = "OR")]
    #[assoc(name = "OR")]
    #[assoc(arity = 2)]
    Or,
    /// Negation
    #[strum(serialize = "NOT")]
    #[assoc(name = "NOT")]
    #[assoc(arity = 1)]
    Not,
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::{BuiltinPredicate, Predicate};

    #[test]
    fn predicate_identity() {
        assert_eq!(Predicate::new("p", 2), Predicate::new("p", 2));
        assert_ne!(Predicate::new("p", 2), Predicate::new("p", 1));
        assert_ne!(Predicate::new("p", 2), Predicate::new("q", 2));
    }

    #[test]
    fn builtin_recognition() {
        for builtin in BuiltinPredicate::iter() {
            assert_eq!(Predicate::from(builtin).builtin(), Some(builtin));
        }

        assert!(Predicate::new("EQ", 2).is_builtin());
        assert!(!Predicate::new("EQ", 3).is_builtin());
        assert!(!Predicate::new("http://example.org/EQ", 2).is_builtin());
    }
}
