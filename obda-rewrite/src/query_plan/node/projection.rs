//! This module defines [ProjectionNode].

use std::fmt::Display;

use crate::rule_model::components::{atom::Atom, term::variable::Variable, IterableVariables};

/// Projects the tuples of its only child onto the terms of a head atom
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectionNode {
    /// Atom listing the projected terms
    head: Atom,
}

impl ProjectionNode {
    /// Create a new [ProjectionNode].
    pub fn new(head: Atom) -> Self {
        Self { head }
    }

    /// Return the head atom.
    pub fn head(&self) -> &Atom {
        &self.head
    }

    /// Return the number of projected terms.
    pub fn arity(&self) -> usize {
        self.head.arity()
    }

    /// Return the distinct projected variables.
    pub fn projected_variables(&self) -> Vec<Variable> {
        self.head.distinct_variables()
    }
}

impl Display for ProjectionNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PROJECTION {}", self.head)
    }
}
