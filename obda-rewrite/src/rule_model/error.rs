//! This module defines [ModelError].
#![allow(missing_docs)]

use enum_assoc::Assoc;
use thiserror::Error;

use super::components::{term::variable::Variable, ProgramComponentKind};

/// Errors that occur while building the logical rule model
///
/// These are raised at construction boundaries
/// and indicate an invalid use of the model.
#[derive(Assoc, Error, Debug, Clone, PartialEq, Eq)]
#[func(pub fn note(&self) -> Option<&'static str>)]
#[func(pub fn code(&self) -> usize)]
pub enum ModelError {
    /// A function term or atom was given the wrong number of arguments.
    #[error(r#"{kind} `{symbol}` expects {expected} arguments but {found} were given"#)]
    #[assoc(code = 101)]
    ArityMismatch {
        kind: ProgramComponentKind,
        symbol: String,
        expected: usize,
        found: usize,
    },
    /// A variable renaming maps two variables to the same variable.
    #[error(r#"renaming is not injective: `{first}` and `{second}` are both mapped to `{target}`"#)]
    #[assoc(code = 102)]
    #[assoc(note = "a renaming must map distinct variables to distinct variables")]
    IllegalSubstitution {
        first: Variable,
        second: Variable,
        target: Variable,
    },
    /// Variable in the head of a rule does not occur in its body.
    #[error(r#"unsafe variable used in rule head: `{0}`"#)]
    #[assoc(code = 103)]
    #[assoc(note = "every variable in the head must occur in some body atom")]
    UnsafeHeadVariable(Variable),
    /// Fact contains a variable.
    #[error(r#"non-ground term used in fact: `{0}`"#)]
    #[assoc(code = 104)]
    FactNonGround(Variable),
}
