//! This module defines [Term].

pub mod constant;
pub mod function;
pub mod variable;

use std::fmt::Display;

use constant::{UriConstant, ValueConstant, ValueType};
use function::FunctionTerm;
use variable::Variable;

use super::{IterableVariables, ProgramComponentKind};

/// Term
///
/// Basic building block for atoms.
/// Terms are immutable values compared by structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// Variable
    Variable(Variable),
    /// Constant identified by an IRI
    Uri(UriConstant),
    /// Constant value with a datatype
    Value(ValueConstant),
    /// Function symbol applied to a list of terms
    Function(FunctionTerm),
}

impl Term {
    /// Create a variable term.
    pub fn variable(name: &str) -> Self {
        Self::Variable(Variable::new(name))
    }

    /// Create an iri constant term.
    pub fn uri(iri: &str) -> Self {
        Self::Uri(UriConstant::new(iri))
    }

    /// Create a plain string constant term.
    pub fn string(value: &str) -> Self {
        Self::Value(ValueConstant::new(value, ValueType::String))
    }

    /// Create a constant term with the given datatype.
    pub fn value(value: &str, value_type: ValueType) -> Self {
        Self::Value(ValueConstant::new(value, value_type))
    }

    /// Return the [ProgramComponentKind] of this term.
    pub fn kind(&self) -> ProgramComponentKind {
        match self {
            Term::Variable(_) => ProgramComponentKind::Variable,
            Term::Uri(_) => ProgramComponentKind::Iri,
            Term::Value(_) => ProgramComponentKind::Value,
            Term::Function(_) => ProgramComponentKind::FunctionTerm,
        }
    }

    /// Return the name of an atomic term,
    /// i.e. the name of a variable, the iri of a uri constant
    /// or the lexical value of a value constant.
    ///
    /// Returns `None` for function terms.
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Variable(variable) => Some(variable.name()),
            Term::Uri(uri) => Some(uri.iri()),
            Term::Value(value) => Some(value.value()),
            Term::Function(_) => None,
        }
    }

    /// Return the arguments of a function term or `None` if this is an atomic term.
    pub fn arguments(&self) -> Option<&[Term]> {
        match self {
            Term::Function(function) => Some(function.arguments()),
            _ => None,
        }
    }

    /// Return the variable if this term is one.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    /// Return whether this term is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Return whether this term is a constant.
    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Uri(_) | Term::Value(_))
    }

    /// Return whether this term is a function term.
    pub fn is_function(&self) -> bool {
        matches!(self, Term::Function(_))
    }

    /// Return `true` if no variable occurs in this term.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Uri(_) | Term::Value(_) => true,
            Term::Function(function) => function.is_ground(),
        }
    }

    /// Return whether the given variable occurs somewhere in this term.
    pub fn contains_variable(&self, variable: &Variable) -> bool {
        match self {
            Term::Variable(other) => other == variable,
            Term::Uri(_) | Term::Value(_) => false,
            Term::Function(function) => function
                .arguments()
                .iter()
                .any(|term| term.contains_variable(variable)),
        }
    }

    /// Return the nesting depth of this term.
    ///
    /// Atomic terms have depth zero.
    pub fn depth(&self) -> usize {
        match self {
            Term::Function(function) => function.depth(),
            _ => 0,
        }
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl From<UriConstant> for Term {
    fn from(value: UriConstant) -> Self {
        Self::Uri(value)
    }
}

impl From<ValueConstant> for Term {
    fn from(value: ValueConstant) -> Self {
        Self::Value(value)
    }
}

impl From<FunctionTerm> for Term {
    fn from(value: FunctionTerm) -> Self {
        Self::Function(value)
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Self::Value(ValueConstant::from(value))
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Self::Value(ValueConstant::from(value.as_str()))
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Self::Value(ValueConstant::from(value))
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Self {
        Self::Value(ValueConstant::from(value))
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Variable(term) => write!(f, "{}", term),
            Term::Uri(term) => write!(f, "{}", term),
            Term::Value(term) => write!(f, "{}", term),
            Term::Function(term) => write!(f, "{}", term),
        }
    }
}

impl IterableVariables for Term {
    fn variables<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Variable> + 'a> {
        match self {
            Term::Variable(variable) => Box::new(Some(variable).into_iter()),
            Term::Uri(_) | Term::Value(_) => Box::new(None.into_iter()),
            Term::Function(function) => function.variables(),
        }
    }
}
