//! This module defines [RewritingError].
#![allow(missing_docs)]

use enum_assoc::Assoc;
use strum_macros::Display;
use thiserror::Error;

use crate::rule_model::{components::predicate::Predicate, program::DatalogProgram};

/// Bounds limiting rewriting and unfolding
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewritingBound {
    /// Number of resolution steps applied to a single rule
    #[strum(serialize = "depth")]
    Depth,
    /// Number of produced rules
    #[strum(serialize = "rule count")]
    Rules,
}

/// Errors that stop rewriting or unfolding
///
/// If the cycle policy asks for partial results,
/// the rules obtained before stopping are attached.
#[derive(Assoc, Error, Debug, Clone, PartialEq, Eq)]
#[func(pub fn note(&self) -> Option<&'static str>)]
#[func(pub fn code(&self) -> usize)]
pub enum RewritingError {
    /// A bound was exceeded.
    #[error(r#"rewriting exceeded the {bound} bound of {limit}"#)]
    #[assoc(code = 301)]
    #[assoc(note = "the bounds can be raised in the rewriting parameters")]
    BoundExceeded {
        bound: RewritingBound,
        limit: usize,
        partial: Option<Box<DatalogProgram>>,
    },
    /// Definitions reachable from the query are recursive.
    #[error(r#"recursive definitions reachable from the query: {}"#, format_predicates(.predicates))]
    #[assoc(code = 302)]
    #[assoc(note = "recursive mappings cannot be unfolded into a finite query")]
    CycleDetected {
        predicates: Vec<Predicate>,
        partial: Option<Box<DatalogProgram>>,
    },
    /// The query has no rule for the requested predicate.
    #[error(r#"query does not define predicate `{0}`"#)]
    #[assoc(code = 303)]
    TargetNotDefined(String),
}

impl RewritingError {
    /// Return the rules obtained before the error occurred, if they were kept.
    pub fn partial(&self) -> Option<&DatalogProgram> {
        match self {
            RewritingError::BoundExceeded { partial, .. }
            | RewritingError::CycleDetected { partial, .. } => partial.as_deref(),
            RewritingError::TargetNotDefined(_) => None,
        }
    }
}

fn format_predicates(predicates: &[Predicate]) -> String {
    predicates
        .iter()
        .map(|predicate| format!("`{predicate}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
