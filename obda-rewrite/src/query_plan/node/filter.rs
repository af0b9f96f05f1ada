//! This module defines [FilterNode].

use std::fmt::Display;

use crate::rule_model::components::atom::Atom;

use super::write_conditions;

/// Keeps the tuples of its only child that satisfy a conjunction of built-in atoms
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterNode {
    /// Conjunction of built-in atoms
    conditions: Vec<Atom>,
}

impl FilterNode {
    /// Create a new [FilterNode].
    pub fn new(conditions: Vec<Atom>) -> Self {
        Self { conditions }
    }

    /// Return the filter condition.
    pub fn conditions(&self) -> &[Atom] {
        &self.conditions
    }

    /// Return a filter whose condition is the conjunction of both conditions.
    pub fn merge(&self, other: &FilterNode) -> FilterNode {
        let mut conditions = self.conditions.clone();
        for condition in &other.conditions {
            if !conditions.contains(condition) {
                conditions.push(condition.clone());
            }
        }

        FilterNode { conditions }
    }
}

impl Display for FilterNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FILTER ")?;
        write_conditions(f, &self.conditions)
    }
}
