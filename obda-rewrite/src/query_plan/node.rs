//! This module defines [QueryNode], the closed set of query plan operators.

pub mod data;
pub mod filter;
pub mod join;
pub mod projection;
pub mod union;

use std::fmt::Display;

use enum_assoc::Assoc;
use strum_macros::{Display as StrumDisplay, EnumIter};

use crate::rule_model::components::atom::Atom;

use self::{
    data::OrdinaryDataNode, filter::FilterNode, join::InnerJoinNode, projection::ProjectionNode,
    union::UnionNode,
};

use super::{
    error::{QueryNodeTransformationError, QueryTreeError},
    optimizer::QueryNodeOptimizer,
    proposal::LocalOptimizationProposal,
    query::{IntermediateQuery, NodeId},
    transformer::QueryNodeTransformer,
    visitor::QueryNodeVisitor,
};

/// Kinds of query plan nodes
#[derive(Assoc, StrumDisplay, EnumIter, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[func(pub fn min_children(&self) -> usize)]
#[func(pub fn max_children(&self) -> Option<usize>)]
pub enum QueryNodeKind {
    /// Leaf fetching a single atom
    #[strum(serialize = "data")]
    #[assoc(min_children = 0)]
    #[assoc(max_children = 0)]
    Data,
    /// Inner join
    #[strum(serialize = "join")]
    #[assoc(min_children = 1)]
    Join,
    /// Filter
    #[strum(serialize = "filter")]
    #[assoc(min_children = 1)]
    #[assoc(max_children = 1)]
    Filter,
    /// Union
    #[strum(serialize = "union")]
    #[assoc(min_children = 1)]
    Union,
    /// Projection
    #[strum(serialize = "projection")]
    #[assoc(min_children = 1)]
    #[assoc(max_children = 1)]
    Projection,
}

impl QueryNodeKind {
    /// Return whether a node of this kind may have the given number of children.
    pub fn accepts_children(&self, count: usize) -> bool {
        count >= self.min_children() && self.max_children().map_or(true, |max| count <= max)
    }

    /// Return an error if a node of this kind may not have the given number of children.
    pub fn check_children(&self, count: usize) -> Result<(), QueryTreeError> {
        if self.accepts_children(count) {
            Ok(())
        } else {
            Err(QueryTreeError::ChildCount {
                kind: *self,
                found: count,
            })
        }
    }
}

/// Operator of a query plan
///
/// The set of operators is closed.
/// Traversals dispatch on the variant through
/// [QueryNodeVisitor], [QueryNodeTransformer] and [QueryNodeOptimizer].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryNode {
    /// Leaf fetching a single atom
    Data(OrdinaryDataNode),
    /// Inner join
    Join(InnerJoinNode),
    /// Filter
    Filter(FilterNode),
    /// Union
    Union(UnionNode),
    /// Projection
    Projection(ProjectionNode),
}

impl QueryNode {
    /// Create a data node for the given atom.
    pub fn data(atom: Atom) -> Self {
        Self::Data(OrdinaryDataNode::new(atom))
    }

    /// Create a join node without join condition.
    pub fn join() -> Self {
        Self::Join(InnerJoinNode::new())
    }

    /// Create a filter node.
    pub fn filter(conditions: Vec<Atom>) -> Self {
        Self::Filter(FilterNode::new(conditions))
    }

    /// Create a union node.
    pub fn union(arity: usize) -> Self {
        Self::Union(UnionNode::new(arity))
    }

    /// Create a projection node.
    pub fn projection(head: Atom) -> Self {
        Self::Projection(ProjectionNode::new(head))
    }

    /// Return the kind of this node.
    pub fn kind(&self) -> QueryNodeKind {
        match self {
            QueryNode::Data(_) => QueryNodeKind::Data,
            QueryNode::Join(_) => QueryNodeKind::Join,
            QueryNode::Filter(_) => QueryNodeKind::Filter,
            QueryNode::Union(_) => QueryNodeKind::Union,
            QueryNode::Projection(_) => QueryNodeKind::Projection,
        }
    }

    /// Return the number of terms this node produces,
    /// if it is fixed by the node itself.
    pub fn output_arity(&self) -> Option<usize> {
        match self {
            QueryNode::Union(node) => Some(node.arity()),
            QueryNode::Projection(node) => Some(node.arity()),
            QueryNode::Data(_) | QueryNode::Join(_) | QueryNode::Filter(_) => None,
        }
    }

    /// Dispatch to the handler of the visitor for this variant,
    /// given the results already computed for the children.
    pub fn accept_visitor<Visitor: QueryNodeVisitor>(
        &self,
        visitor: &mut Visitor,
        mut children: Vec<Visitor::Output>,
    ) -> Result<Visitor::Output, QueryTreeError> {
        let kind = self.kind();
        kind.check_children(children.len())?;

        let missing_child = QueryTreeError::ChildCount { kind, found: 0 };

        Ok(match self {
            QueryNode::Data(node) => visitor.visit_data(node),
            QueryNode::Filter(node) => {
                visitor.visit_filter(node, children.pop().ok_or(missing_child)?)
            }
            QueryNode::Projection(node) => {
                visitor.visit_projection(node, children.pop().ok_or(missing_child)?)
            }
            QueryNode::Join(node) => visitor.visit_join(node, children),
            QueryNode::Union(node) => visitor.visit_union(node, children),
        })
    }

    /// Dispatch to the handler of the transformer for this variant.
    ///
    /// The result is always of the same variant as `self`.
    pub fn accept_node_transformer<Transformer: QueryNodeTransformer + ?Sized>(
        &self,
        transformer: &mut Transformer,
    ) -> Result<QueryNode, QueryNodeTransformationError> {
        Ok(match self {
            QueryNode::Data(node) => QueryNode::Data(transformer.transform_data(node)?),
            QueryNode::Join(node) => QueryNode::Join(transformer.transform_join(node)?),
            QueryNode::Filter(node) => QueryNode::Filter(transformer.transform_filter(node)?),
            QueryNode::Union(node) => QueryNode::Union(transformer.transform_union(node)?),
            QueryNode::Projection(node) => {
                QueryNode::Projection(transformer.transform_projection(node)?)
            }
        })
    }

    /// Dispatch to the handler of the optimizer for this variant.
    ///
    /// Returns `None` if the optimizer does not apply to this node.
    pub fn accept_optimizer(
        &self,
        optimizer: &dyn QueryNodeOptimizer,
        query: &IntermediateQuery,
        id: NodeId,
    ) -> Option<LocalOptimizationProposal> {
        match self {
            QueryNode::Data(node) => optimizer.optimize_data(query, id, node),
            QueryNode::Join(node) => optimizer.optimize_join(query, id, node),
            QueryNode::Filter(node) => optimizer.optimize_filter(query, id, node),
            QueryNode::Union(node) => optimizer.optimize_union(query, id, node),
            QueryNode::Projection(node) => optimizer.optimize_projection(query, id, node),
        }
    }
}

impl Display for QueryNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryNode::Data(node) => write!(f, "{node}"),
            QueryNode::Join(node) => write!(f, "{node}"),
            QueryNode::Filter(node) => write!(f, "{node}"),
            QueryNode::Union(node) => write!(f, "{node}"),
            QueryNode::Projection(node) => write!(f, "{node}"),
        }
    }
}

/// Write a conjunction of atoms separated by ` AND `.
pub(crate) fn write_conditions(
    f: &mut std::fmt::Formatter<'_>,
    conditions: &[Atom],
) -> std::fmt::Result {
    for (index, condition) in conditions.iter().enumerate() {
        write!(f, "{condition}")?;

        if index < conditions.len() - 1 {
            f.write_str(" AND ")?;
        }
    }

    Ok(())
}
