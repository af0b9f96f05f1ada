//! This module defines [FunctionTerm].

use std::{
    collections::hash_map::DefaultHasher,
    fmt::Display,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::rule_model::{
    components::{predicate::Predicate, IterableVariables, ProgramComponentKind},
    error::ModelError,
};

use super::{variable::Variable, Term};

/// Function term
///
/// A function symbol applied to a list of [Term]s,
/// e.g. object terms like `s(?y, "Student")`.
///
/// The argument list is shared between clones
/// and the structural hash is computed once on construction.
#[derive(Debug, Clone)]
pub struct FunctionTerm {
    /// Function symbol
    symbol: Predicate,
    /// Subterms of the function
    arguments: Arc<[Term]>,
    /// Precomputed structural hash
    hash: u64,
}

impl FunctionTerm {
    /// Create a new [FunctionTerm].
    ///
    /// Returns an error if the number of arguments
    /// does not match the arity of the symbol.
    pub fn new<Terms: IntoIterator<Item = Term>>(
        symbol: Predicate,
        arguments: Terms,
    ) -> Result<Self, ModelError> {
        let arguments: Arc<[Term]> = arguments.into_iter().collect();

        if arguments.len() != symbol.arity() {
            return Err(ModelError::ArityMismatch {
                kind: ProgramComponentKind::FunctionTerm,
                symbol: symbol.name().to_string(),
                expected: symbol.arity(),
                found: arguments.len(),
            });
        }

        Ok(Self::from_parts(symbol, arguments))
    }

    /// Create a new [FunctionTerm] whose symbol arity is the number of given arguments.
    pub fn with_name<Terms: IntoIterator<Item = Term>>(name: &str, arguments: Terms) -> Self {
        let arguments: Arc<[Term]> = arguments.into_iter().collect();
        let symbol = Predicate::new(name, arguments.len());

        Self::from_parts(symbol, arguments)
    }

    fn from_parts(symbol: Predicate, arguments: Arc<[Term]>) -> Self {
        let mut hasher = DefaultHasher::new();
        symbol.hash(&mut hasher);
        arguments.hash(&mut hasher);

        Self {
            symbol,
            arguments,
            hash: hasher.finish(),
        }
    }

    /// Return a function term with the same symbol but different arguments.
    ///
    /// The number of arguments must not change.
    pub(crate) fn with_arguments(&self, arguments: Vec<Term>) -> Self {
        debug_assert_eq!(arguments.len(), self.symbol.arity());
        Self::from_parts(self.symbol.clone(), Arc::from(arguments))
    }

    /// Return the function symbol.
    pub fn symbol(&self) -> &Predicate {
        &self.symbol
    }

    /// Return the arguments of this function term.
    pub fn arguments(&self) -> &[Term] {
        &self.arguments
    }

    /// Return the number of arguments.
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Return `true` if no variable occurs in this term.
    pub fn is_ground(&self) -> bool {
        self.arguments.iter().all(Term::is_ground)
    }

    /// Return the nesting depth of this term.
    pub fn depth(&self) -> usize {
        1 + self.arguments.iter().map(Term::depth).max().unwrap_or(0)
    }
}

impl Display for FunctionTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}(", self.symbol))?;

        for (term_index, term) in self.arguments.iter().enumerate() {
            term.fmt(f)?;

            if term_index < self.arguments.len() - 1 {
                f.write_str(", ")?;
            }
        }

        f.write_str(")")
    }
}

impl PartialEq for FunctionTerm {
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }

        self.symbol == other.symbol
            && (Arc::ptr_eq(&self.arguments, &other.arguments) || self.arguments == other.arguments)
    }
}

impl Eq for FunctionTerm {}

impl PartialOrd for FunctionTerm {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FunctionTerm {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.symbol.cmp(&other.symbol) {
            std::cmp::Ordering::Equal => {}
            ord => return ord,
        }

        self.arguments.cmp(&other.arguments)
    }
}

impl Hash for FunctionTerm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl IterableVariables for FunctionTerm {
    fn variables<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Variable> + 'a> {
        Box::new(self.arguments.iter().flat_map(|term| term.variables()))
    }
}

#[cfg(test)]
mod test {
    use std::{
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher},
    };

    use crate::rule_model::{
        components::{
            predicate::Predicate,
            term::{variable::Variable, Term},
            IterableVariables,
        },
        error::ModelError,
    };

    use super::FunctionTerm;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn function_basic() {
        let variable = Variable::new("u");
        let function = function!("f"; 12i64, variable, "abc", ?v);

        assert_eq!(function.symbol(), &Predicate::new("f", 4));

        let variables = function.variables().cloned().collect::<Vec<_>>();
        assert_eq!(variables, vec![Variable::new("u"), Variable::new("v")]);
    }

    #[test]
    fn function_arity_mismatch() {
        let result = FunctionTerm::new(Predicate::new("s", 2), vec![Term::variable("y")]);

        assert!(matches!(
            result,
            Err(ModelError::ArityMismatch {
                expected: 2,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn function_structural_hash() {
        let left = function!("r"; "FUB", (function!("s"; ?y, "Student")));
        let right = FunctionTerm::new(
            Predicate::new("r", 2),
            vec![
                Term::from("FUB"),
                Term::from(
                    FunctionTerm::new(
                        Predicate::new("s", 2),
                        vec![Term::variable("y"), Term::from("Student")],
                    )
                    .unwrap(),
                ),
            ],
        )
        .unwrap();

        assert_eq!(left, right);
        assert_eq!(hash_of(&left), hash_of(&right));
        assert_eq!(hash_of(&Term::from(left)), hash_of(&Term::from(right)));
    }
}
