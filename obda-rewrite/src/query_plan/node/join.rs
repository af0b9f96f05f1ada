//! This module defines [InnerJoinNode].

use std::fmt::Display;

use crate::rule_model::components::atom::Atom;

use super::write_conditions;

/// N-ary inner join of its children
///
/// Shared variables of the children are joined implicitly.
/// The optional join condition is a conjunction of built-in atoms.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct InnerJoinNode {
    /// Conjunction of built-in atoms
    conditions: Vec<Atom>,
}

impl InnerJoinNode {
    /// Create a new [InnerJoinNode] without a join condition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [InnerJoinNode] with the given join condition.
    pub fn with_conditions(conditions: Vec<Atom>) -> Self {
        Self { conditions }
    }

    /// Return the join condition.
    pub fn conditions(&self) -> &[Atom] {
        &self.conditions
    }

    /// Return whether this join has a join condition.
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }
}

impl Display for InnerJoinNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JOIN")?;

        if self.has_conditions() {
            f.write_str(" ")?;
            write_conditions(f, &self.conditions)?;
        }

        Ok(())
    }
}
