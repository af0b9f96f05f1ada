//! This module defines the logical components that make up a program.

pub mod atom;
pub mod predicate;
pub mod rule;
pub mod term;

use std::fmt::Display;

use enum_assoc::Assoc;
use term::variable::Variable;

/// Types of program components
#[derive(Assoc, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[func(pub fn name(&self) -> &'static str)]
pub enum ProgramComponentKind {
    /// Variable
    #[assoc(name = "variable")]
    Variable,
    /// Iri
    #[assoc(name = "iri")]
    Iri,
    /// Value with a datatype
    #[assoc(name = "value")]
    Value,
    /// Function term
    #[assoc(name = "function")]
    FunctionTerm,
    /// Predicate
    #[assoc(name = "predicate")]
    Predicate,
    /// Atom
    #[assoc(name = "atom")]
    Atom,
    /// Rule
    #[assoc(name = "rule")]
    Rule,
    /// Program
    #[assoc(name = "program")]
    Program,
}

impl Display for ProgramComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait implemented by program components that allow iterating over [Variable]s
pub trait IterableVariables {
    /// Return an iterator over all [Variable]s contained within this program component.
    ///
    /// Variables are returned from left to right and may repeat.
    fn variables<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Variable> + 'a>;

    /// Return the distinct [Variable]s of this component in order of their first occurrence.
    fn distinct_variables(&self) -> Vec<Variable> {
        let mut result: Vec<Variable> = Vec::new();

        for variable in self.variables() {
            if !result.contains(variable) {
                result.push(variable.clone());
            }
        }

        result
    }
}
