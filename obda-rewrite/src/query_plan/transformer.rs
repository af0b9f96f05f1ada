//! This module defines [QueryNodeTransformer] and [SubstitutionTransformer].

use crate::rule_model::{
    components::{atom::Atom, term::Term, IterableVariables},
    substitution::Substitution,
};

use super::{
    error::QueryNodeTransformationError,
    node::{
        data::OrdinaryDataNode, filter::FilterNode, join::InnerJoinNode,
        projection::ProjectionNode, union::UnionNode, QueryNodeKind,
    },
};

/// Node-wise transformation of a query plan
///
/// Every handler returns a node of the same variant
/// or an error if the transformation does not apply to the node.
pub trait QueryNodeTransformer {
    /// Transform a data node.
    fn transform_data(
        &mut self,
        node: &OrdinaryDataNode,
    ) -> Result<OrdinaryDataNode, QueryNodeTransformationError>;

    /// Transform a join node.
    fn transform_join(
        &mut self,
        node: &InnerJoinNode,
    ) -> Result<InnerJoinNode, QueryNodeTransformationError>;

    /// Transform a filter node.
    fn transform_filter(
        &mut self,
        node: &FilterNode,
    ) -> Result<FilterNode, QueryNodeTransformationError>;

    /// Transform a union node.
    fn transform_union(
        &mut self,
        node: &UnionNode,
    ) -> Result<UnionNode, QueryNodeTransformationError>;

    /// Transform a projection node.
    fn transform_projection(
        &mut self,
        node: &ProjectionNode,
    ) -> Result<ProjectionNode, QueryNodeTransformationError>;
}

/// Applies a [Substitution] to every atom of a query plan
///
/// Projected variables may only be renamed:
/// mapping one of them to a non-variable term is rejected.
#[derive(Debug, Clone)]
pub struct SubstitutionTransformer {
    substitution: Substitution,
}

impl SubstitutionTransformer {
    /// Create a new [SubstitutionTransformer].
    pub fn new(substitution: Substitution) -> Self {
        Self { substitution }
    }

    fn apply_all(&self, atoms: &[Atom]) -> Vec<Atom> {
        atoms
            .iter()
            .map(|atom| self.substitution.apply_atom(atom).into_owned())
            .collect()
    }
}

impl QueryNodeTransformer for SubstitutionTransformer {
    fn transform_data(
        &mut self,
        node: &OrdinaryDataNode,
    ) -> Result<OrdinaryDataNode, QueryNodeTransformationError> {
        Ok(OrdinaryDataNode::new(
            self.substitution.apply_atom(node.atom()).into_owned(),
        ))
    }

    fn transform_join(
        &mut self,
        node: &InnerJoinNode,
    ) -> Result<InnerJoinNode, QueryNodeTransformationError> {
        Ok(InnerJoinNode::with_conditions(
            self.apply_all(node.conditions()),
        ))
    }

    fn transform_filter(
        &mut self,
        node: &FilterNode,
    ) -> Result<FilterNode, QueryNodeTransformationError> {
        Ok(FilterNode::new(self.apply_all(node.conditions())))
    }

    fn transform_union(
        &mut self,
        node: &UnionNode,
    ) -> Result<UnionNode, QueryNodeTransformationError> {
        Ok(*node)
    }

    fn transform_projection(
        &mut self,
        node: &ProjectionNode,
    ) -> Result<ProjectionNode, QueryNodeTransformationError> {
        for variable in node.head().variables() {
            if let Some(image) = self.substitution.get(variable) {
                if !matches!(image, Term::Variable(_)) {
                    return Err(QueryNodeTransformationError::new(
                        QueryNodeKind::Projection,
                        format!("projected variable {variable} would be replaced by {image}"),
                    ));
                }
            }
        }

        Ok(ProjectionNode::new(
            self.substitution.apply_atom(node.head()).into_owned(),
        ))
    }
}
