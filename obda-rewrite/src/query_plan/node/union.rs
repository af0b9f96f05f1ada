//! This module defines [UnionNode].

use std::fmt::Display;

/// N-ary union of its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnionNode {
    /// Number of projected terms of every child
    arity: usize,
}

impl UnionNode {
    /// Create a new [UnionNode].
    pub fn new(arity: usize) -> Self {
        Self { arity }
    }

    /// Return the number of terms each child projects.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl Display for UnionNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UNION/{}", self.arity)
    }
}
