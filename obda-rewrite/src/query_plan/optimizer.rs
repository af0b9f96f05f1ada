//! This module defines [QueryNodeOptimizer] and the optimizers shipped with the crate.

use std::fmt::Debug;

use super::{
    node::{
        data::OrdinaryDataNode, filter::FilterNode, join::InnerJoinNode,
        projection::ProjectionNode, union::UnionNode, QueryNode,
    },
    proposal::LocalOptimizationProposal,
    query::{IntermediateQuery, NodeId},
};

/// Local optimization of a query plan
///
/// Every handler inspects a single node in the context of its query
/// and may propose a change.
/// Returning `None` means that the optimization does not apply to the node.
pub trait QueryNodeOptimizer: Debug {
    /// Name of the optimization, used for logging.
    fn name(&self) -> &'static str;

    /// Inspect a data node.
    fn optimize_data(
        &self,
        _query: &IntermediateQuery,
        _id: NodeId,
        _node: &OrdinaryDataNode,
    ) -> Option<LocalOptimizationProposal> {
        None
    }

    /// Inspect a join node.
    fn optimize_join(
        &self,
        _query: &IntermediateQuery,
        _id: NodeId,
        _node: &InnerJoinNode,
    ) -> Option<LocalOptimizationProposal> {
        None
    }

    /// Inspect a filter node.
    fn optimize_filter(
        &self,
        _query: &IntermediateQuery,
        _id: NodeId,
        _node: &FilterNode,
    ) -> Option<LocalOptimizationProposal> {
        None
    }

    /// Inspect a union node.
    fn optimize_union(
        &self,
        _query: &IntermediateQuery,
        _id: NodeId,
        _node: &UnionNode,
    ) -> Option<LocalOptimizationProposal> {
        None
    }

    /// Inspect a projection node.
    fn optimize_projection(
        &self,
        _query: &IntermediateQuery,
        _id: NodeId,
        _node: &ProjectionNode,
    ) -> Option<LocalOptimizationProposal> {
        None
    }
}

/// Removes joins and unions with a single child
///
/// A single-child join with a join condition becomes a filter.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrivialNodeEliminator;

impl QueryNodeOptimizer for TrivialNodeEliminator {
    fn name(&self) -> &'static str {
        "trivial node elimination"
    }

    fn optimize_join(
        &self,
        query: &IntermediateQuery,
        id: NodeId,
        node: &InnerJoinNode,
    ) -> Option<LocalOptimizationProposal> {
        if query.children(id).len() != 1 {
            return None;
        }

        Some(if node.has_conditions() {
            LocalOptimizationProposal::ReplaceNode {
                target: id,
                replacement: QueryNode::filter(node.conditions().to_vec()),
            }
        } else {
            LocalOptimizationProposal::ReplaceByChild { target: id }
        })
    }

    fn optimize_union(
        &self,
        query: &IntermediateQuery,
        id: NodeId,
        _node: &UnionNode,
    ) -> Option<LocalOptimizationProposal> {
        (query.children(id).len() == 1)
            .then_some(LocalOptimizationProposal::ReplaceByChild { target: id })
    }
}

/// Flattens joins directly below joins and unions directly below unions
#[derive(Debug, Default, Clone, Copy)]
pub struct NestedOperatorFlattener;

impl QueryNodeOptimizer for NestedOperatorFlattener {
    fn name(&self) -> &'static str {
        "nested operator flattening"
    }

    fn optimize_join(
        &self,
        query: &IntermediateQuery,
        id: NodeId,
        _node: &InnerJoinNode,
    ) -> Option<LocalOptimizationProposal> {
        let child = query
            .children(id)
            .iter()
            .find(|child| matches!(query.get(**child), Some(QueryNode::Join(_))))?;

        Some(LocalOptimizationProposal::FlattenChild {
            parent: id,
            child: *child,
        })
    }

    fn optimize_union(
        &self,
        query: &IntermediateQuery,
        id: NodeId,
        node: &UnionNode,
    ) -> Option<LocalOptimizationProposal> {
        let child = query.children(id).iter().find(|child| {
            matches!(
                query.get(**child),
                Some(QueryNode::Union(inner)) if inner.arity() == node.arity()
            )
        })?;

        Some(LocalOptimizationProposal::FlattenChild {
            parent: id,
            child: *child,
        })
    }
}

/// Merges a filter directly below another filter into the upper one
#[derive(Debug, Default, Clone, Copy)]
pub struct FilterMerger;

impl QueryNodeOptimizer for FilterMerger {
    fn name(&self) -> &'static str {
        "filter merging"
    }

    fn optimize_filter(
        &self,
        query: &IntermediateQuery,
        id: NodeId,
        _node: &FilterNode,
    ) -> Option<LocalOptimizationProposal> {
        let child = *query.children(id).first()?;

        matches!(query.get(child), Some(QueryNode::Filter(_)))
            .then_some(LocalOptimizationProposal::MergeFilters { parent: id, child })
    }
}

/// Return the optimizers shipped with this crate.
pub fn default_optimizers() -> Vec<Box<dyn QueryNodeOptimizer>> {
    vec![
        Box::new(TrivialNodeEliminator),
        Box::new(NestedOperatorFlattener),
        Box::new(FilterMerger),
    ]
}
