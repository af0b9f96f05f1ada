//! This module defines [OrdinaryDataNode].

use std::fmt::Display;

use crate::rule_model::components::atom::Atom;

/// Leaf of a query plan fetching the tuples of a single atom
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrdinaryDataNode {
    /// Atom that is fetched
    atom: Atom,
}

impl OrdinaryDataNode {
    /// Create a new [OrdinaryDataNode].
    pub fn new(atom: Atom) -> Self {
        Self { atom }
    }

    /// Return the fetched atom.
    pub fn atom(&self) -> &Atom {
        &self.atom
    }
}

impl Display for OrdinaryDataNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DATA {}", self.atom)
    }
}
