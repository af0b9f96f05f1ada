//! This module defines [LocalOptimizationProposal].

use std::fmt::Display;

use super::{node::QueryNode, query::NodeId};

/// Local change of a query plan suggested by a
/// [QueryNodeOptimizer][super::optimizer::QueryNodeOptimizer]
///
/// Proposals are computed on a shared reference to the query
/// and applied afterwards with
/// [IntermediateQuery::apply_proposal][super::query::IntermediateQuery::apply_proposal].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalOptimizationProposal {
    /// Replace the operator of a node, keeping its children.
    ReplaceNode {
        /// Node to be replaced
        target: NodeId,
        /// New operator
        replacement: QueryNode,
    },
    /// Replace a node with a single child by that child.
    ReplaceByChild {
        /// Node to be removed
        target: NodeId,
    },
    /// Splice the children of a child into its parent of the same kind.
    FlattenChild {
        /// Node receiving the grandchildren
        parent: NodeId,
        /// Node to be removed
        child: NodeId,
    },
    /// Merge a filter into the filter directly above it.
    MergeFilters {
        /// Upper filter, which is kept
        parent: NodeId,
        /// Lower filter, which is removed
        child: NodeId,
    },
}

impl Display for LocalOptimizationProposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocalOptimizationProposal::ReplaceNode {
                target,
                replacement,
            } => write!(f, "replace {target} by {replacement}"),
            LocalOptimizationProposal::ReplaceByChild { target } => {
                write!(f, "replace {target} by its child")
            }
            LocalOptimizationProposal::FlattenChild { parent, child } => {
                write!(f, "flatten {child} into {parent}")
            }
            LocalOptimizationProposal::MergeFilters { parent, child } => {
                write!(f, "merge filter {child} into {parent}")
            }
        }
    }
}
