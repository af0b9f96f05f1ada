//! This module defines [QueryNodeVisitor] and the visitors shipped with the crate.

use ascii_tree::Tree;

use crate::rule_model::components::atom::Atom;

use super::node::{
    data::OrdinaryDataNode, filter::FilterNode, join::InnerJoinNode, projection::ProjectionNode,
    union::UnionNode,
};

/// Read-only traversal of a query plan
///
/// The plan is folded bottom-up:
/// every handler receives the results computed for the children of the node.
/// See [IntermediateQuery::accept_visitor][super::query::IntermediateQuery::accept_visitor].
pub trait QueryNodeVisitor {
    /// Result computed for each node
    type Output;

    /// Visit a data node.
    fn visit_data(&mut self, node: &OrdinaryDataNode) -> Self::Output;

    /// Visit a join node.
    fn visit_join(&mut self, node: &InnerJoinNode, children: Vec<Self::Output>) -> Self::Output;

    /// Visit a filter node.
    fn visit_filter(&mut self, node: &FilterNode, child: Self::Output) -> Self::Output;

    /// Visit a union node.
    fn visit_union(&mut self, node: &UnionNode, children: Vec<Self::Output>) -> Self::Output;

    /// Visit a projection node.
    fn visit_projection(&mut self, node: &ProjectionNode, child: Self::Output) -> Self::Output;
}

/// Collects the atoms of all data nodes from left to right
#[derive(Debug, Default, Clone, Copy)]
pub struct DataAtomCollector;

impl QueryNodeVisitor for DataAtomCollector {
    type Output = Vec<Atom>;

    fn visit_data(&mut self, node: &OrdinaryDataNode) -> Self::Output {
        vec![node.atom().clone()]
    }

    fn visit_join(&mut self, _node: &InnerJoinNode, children: Vec<Self::Output>) -> Self::Output {
        children.into_iter().flatten().collect()
    }

    fn visit_filter(&mut self, _node: &FilterNode, child: Self::Output) -> Self::Output {
        child
    }

    fn visit_union(&mut self, _node: &UnionNode, children: Vec<Self::Output>) -> Self::Output {
        children.into_iter().flatten().collect()
    }

    fn visit_projection(&mut self, _node: &ProjectionNode, child: Self::Output) -> Self::Output {
        child
    }
}

/// Renders a query plan as an ascii tree
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanPrinter;

impl QueryNodeVisitor for PlanPrinter {
    type Output = Tree;

    fn visit_data(&mut self, node: &OrdinaryDataNode) -> Self::Output {
        Tree::Leaf(vec![node.to_string()])
    }

    fn visit_join(&mut self, node: &InnerJoinNode, children: Vec<Self::Output>) -> Self::Output {
        Tree::Node(node.to_string(), children)
    }

    fn visit_filter(&mut self, node: &FilterNode, child: Self::Output) -> Self::Output {
        Tree::Node(node.to_string(), vec![child])
    }

    fn visit_union(&mut self, node: &UnionNode, children: Vec<Self::Output>) -> Self::Output {
        Tree::Node(node.to_string(), children)
    }

    fn visit_projection(&mut self, node: &ProjectionNode, child: Self::Output) -> Self::Output {
        Tree::Node(node.to_string(), vec![child])
    }
}
