//! This module defines [IntermediateQuery].

use std::fmt::Display;

use ascii_tree::write_tree;

use crate::rule_model::components::{atom::Atom, rule::Rule};

use super::{
    arena::{Arena, Id},
    error::{QueryNodeTransformationError, QueryTreeError},
    node::{join::InnerJoinNode, QueryNode, QueryNodeKind},
    optimizer::QueryNodeOptimizer,
    proposal::LocalOptimizationProposal,
    transformer::QueryNodeTransformer,
    visitor::{DataAtomCollector, PlanPrinter, QueryNodeVisitor},
};

/// Identifies a node of an [IntermediateQuery]
pub type NodeId = Id<PlanNode>;

/// Node of an [IntermediateQuery] together with its position in the tree
#[derive(Debug, Clone)]
pub struct PlanNode {
    /// Operator of this node
    node: QueryNode,
    /// Ordered children
    children: Vec<NodeId>,
    /// Parent, `None` for the root
    parent: Option<NodeId>,
}

impl PlanNode {
    /// Return the operator of this node.
    pub fn node(&self) -> &QueryNode {
        &self.node
    }

    /// Return the children of this node.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return the parent of this node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Query plan tree
///
/// All nodes are owned by the query and addressed by [NodeId]s.
/// Every node has exactly one parent, except for the root.
///
/// The query is edited in place by its owner.
/// Cloning yields a fully independent copy in which all [NodeId]s remain valid,
/// so alternatives can be explored on clones without affecting the original.
#[derive(Debug, Clone)]
pub struct IntermediateQuery {
    /// Storage of all nodes
    arena: Arena<PlanNode>,
    /// Root of the tree
    root: NodeId,
}

impl IntermediateQuery {
    /// Create a new [IntermediateQuery] consisting only of the given root.
    pub fn new(root: QueryNode) -> Self {
        let mut arena = Arena::default();
        let root = arena.alloc(PlanNode {
            node: root,
            children: Vec::new(),
            parent: None,
        });

        Self { arena, root }
    }

    /// Return the root of the query.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Return the operator with the given id.
    pub fn get(&self, id: NodeId) -> Option<&QueryNode> {
        self.arena.get(id).map(PlanNode::node)
    }

    /// Return the operator with the given id
    /// or an error if there is no such node.
    pub fn node(&self, id: NodeId) -> Result<&QueryNode, QueryTreeError> {
        self.plan_node(id).map(PlanNode::node)
    }

    fn plan_node(&self, id: NodeId) -> Result<&PlanNode, QueryTreeError> {
        self.arena
            .get(id)
            .ok_or_else(|| QueryTreeError::UnknownNode(id.to_string()))
    }

    fn plan_node_mut(&mut self, id: NodeId) -> Result<&mut PlanNode, QueryTreeError> {
        self.arena
            .get_mut(id)
            .ok_or_else(|| QueryTreeError::UnknownNode(id.to_string()))
    }

    /// Return the children of a node.
    ///
    /// Returns an empty slice for unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.arena
            .get(id)
            .map(PlanNode::children)
            .unwrap_or_default()
    }

    /// Return the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id)?.parent
    }

    /// Return the number of nodes of this query.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Return whether this query has no nodes.
    ///
    /// Always `false`, since a query has a root.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Add a new node as the last child of the given node.
    ///
    /// Data nodes do not accept children
    /// and filter and projection nodes accept a single child.
    pub fn add_child(&mut self, parent: NodeId, node: QueryNode) -> Result<NodeId, QueryTreeError> {
        let parent_node = self.plan_node(parent)?;
        Self::check_max_children(parent_node.node.kind(), parent_node.children.len() + 1)?;

        let id = self.arena.alloc(PlanNode {
            node,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.plan_node_mut(parent)?.children.push(id);

        Ok(id)
    }

    /// Replace the operator of a node, keeping its children.
    /// Returns the previous operator.
    ///
    /// The new operator has to accept the current number of children.
    pub fn replace_node(&mut self, id: NodeId, node: QueryNode) -> Result<QueryNode, QueryTreeError> {
        let plan_node = self.plan_node_mut(id)?;
        Self::check_max_children(node.kind(), plan_node.children.len())?;

        Ok(std::mem::replace(&mut plan_node.node, node))
    }

    fn check_max_children(kind: QueryNodeKind, count: usize) -> Result<(), QueryTreeError> {
        match kind.max_children() {
            Some(max) if count > max => Err(QueryTreeError::ChildCount { kind, found: count }),
            _ => Ok(()),
        }
    }

    /// Remove a node together with all its descendants.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<(), QueryTreeError> {
        if id == self.root {
            return Err(QueryTreeError::RootRemoval);
        }

        if let Some(parent) = self.plan_node(id)?.parent {
            self.plan_node_mut(parent)?
                .children
                .retain(|child| *child != id);
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.arena.remove(current) {
                stack.extend(removed.children);
            }
        }

        Ok(())
    }

    /// Return the ids of all nodes in pre-order,
    /// visiting children from left to right.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut result = Vec::with_capacity(self.arena.len());
        let mut stack = vec![self.root];

        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev());
        }

        result
    }

    /// Return the atoms of all data nodes from left to right.
    pub fn leaf_atoms(&self) -> Vec<&Atom> {
        self.pre_order()
            .into_iter()
            .filter_map(|id| match self.get(id) {
                Some(QueryNode::Data(node)) => Some(node.atom()),
                _ => None,
            })
            .collect()
    }

    /// Check the number of children of every node
    /// and that the children of each union agree with its arity.
    pub fn validate(&self) -> Result<(), QueryTreeError> {
        for id in self.pre_order() {
            let plan_node = self.plan_node(id)?;
            plan_node.node.kind().check_children(plan_node.children.len())?;

            if let QueryNode::Union(union) = &plan_node.node {
                for child in &plan_node.children {
                    match self.node(*child)?.output_arity() {
                        Some(arity) if arity != union.arity() => {
                            return Err(QueryTreeError::UnionArityMismatch {
                                expected: union.arity(),
                                found: arity,
                            })
                        }
                        _ => {}
                    }
                }
            }
        }

        Ok(())
    }

    /// Fold the query bottom-up with the given visitor
    /// and return the result computed for the root.
    pub fn accept_visitor<Visitor: QueryNodeVisitor>(
        &self,
        visitor: &mut Visitor,
    ) -> Result<Visitor::Output, QueryTreeError> {
        self.visit_node(self.root, visitor)
    }

    fn visit_node<Visitor: QueryNodeVisitor>(
        &self,
        id: NodeId,
        visitor: &mut Visitor,
    ) -> Result<Visitor::Output, QueryTreeError> {
        let plan_node = self.plan_node(id)?;
        let children = plan_node
            .children
            .iter()
            .map(|child| self.visit_node(*child, visitor))
            .collect::<Result<Vec<_>, _>>()?;

        plan_node.node.accept_visitor(visitor, children)
    }

    /// Return the atoms of all data nodes, collected by a [DataAtomCollector].
    pub fn data_atoms(&self) -> Result<Vec<Atom>, QueryTreeError> {
        self.accept_visitor(&mut DataAtomCollector)
    }

    /// Return a copy of this query where the transformer has been applied to every node.
    ///
    /// Either every node is transformed or an error is returned;
    /// `self` is never modified.
    pub fn transform<Transformer: QueryNodeTransformer + ?Sized>(
        &self,
        transformer: &mut Transformer,
    ) -> Result<IntermediateQuery, QueryNodeTransformationError> {
        let mut result = self.clone();

        for (id, plan_node) in self.arena.iter() {
            let transformed = plan_node.node.accept_node_transformer(transformer)?;

            if let Some(target) = result.arena.get_mut(id) {
                target.node = transformed;
            }
        }

        result.validate().map_err(|error| {
            let kind = match &error {
                QueryTreeError::ChildCount { kind, .. } => *kind,
                _ => QueryNodeKind::Union,
            };

            QueryNodeTransformationError::new(kind, error.to_string())
        })?;

        Ok(result)
    }

    /// Apply a proposal computed by a
    /// [QueryNodeOptimizer][super::optimizer::QueryNodeOptimizer].
    ///
    /// Returns an error and leaves the query unchanged
    /// if the proposal does not fit the current tree.
    pub fn apply_proposal(
        &mut self,
        proposal: LocalOptimizationProposal,
    ) -> Result<(), QueryTreeError> {
        match proposal {
            LocalOptimizationProposal::ReplaceNode {
                target,
                replacement,
            } => {
                let count = self.plan_node(target)?.children.len();
                replacement.kind().check_children(count)?;

                self.replace_node(target, replacement)?;
            }
            LocalOptimizationProposal::ReplaceByChild { target } => {
                let plan_node = self.plan_node(target)?;
                let &[child] = plan_node.children.as_slice() else {
                    return Err(QueryTreeError::InvalidProposal(format!(
                        "{target} does not have exactly one child"
                    )));
                };
                let parent = plan_node.parent;

                self.replace_in_parent(target, parent, &[child])?;
                self.arena.remove(target);
            }
            LocalOptimizationProposal::FlattenChild { parent, child } => {
                self.check_is_child(parent, child)?;

                let merged = match (self.node(parent)?, self.node(child)?) {
                    (QueryNode::Join(outer), QueryNode::Join(inner)) => {
                        let mut conditions = outer.conditions().to_vec();
                        conditions.extend_from_slice(inner.conditions());

                        QueryNode::Join(InnerJoinNode::with_conditions(conditions))
                    }
                    (QueryNode::Union(outer), QueryNode::Union(inner))
                        if outer.arity() == inner.arity() =>
                    {
                        QueryNode::Union(*outer)
                    }
                    (outer, inner) => {
                        return Err(QueryTreeError::InvalidProposal(format!(
                            "cannot flatten {} into {}",
                            inner.kind(),
                            outer.kind()
                        )))
                    }
                };

                let grandchildren = self.plan_node(child)?.children.clone();
                if grandchildren.is_empty() {
                    return Err(QueryTreeError::InvalidProposal(format!(
                        "{child} has no children"
                    )));
                }

                self.replace_in_parent(child, Some(parent), &grandchildren)?;
                self.plan_node_mut(parent)?.node = merged;
                self.arena.remove(child);
            }
            LocalOptimizationProposal::MergeFilters { parent, child } => {
                self.check_is_child(parent, child)?;

                let merged = match (self.node(parent)?, self.node(child)?) {
                    (QueryNode::Filter(outer), QueryNode::Filter(inner)) => {
                        QueryNode::Filter(outer.merge(inner))
                    }
                    _ => {
                        return Err(QueryTreeError::InvalidProposal(format!(
                            "{parent} and {child} are not both filters"
                        )))
                    }
                };

                let grandchildren = self.plan_node(child)?.children.clone();
                self.replace_in_parent(child, Some(parent), &grandchildren)?;
                self.plan_node_mut(parent)?.node = merged;
                self.arena.remove(child);
            }
        }

        Ok(())
    }

    fn check_is_child(&self, parent: NodeId, child: NodeId) -> Result<(), QueryTreeError> {
        if self.plan_node(parent)?.children.contains(&child) {
            Ok(())
        } else {
            Err(QueryTreeError::InvalidProposal(format!(
                "{child} is not a child of {parent}"
            )))
        }
    }

    /// Put `replacements` at the position of `node` in the children of `parent`,
    /// or make the single replacement the new root if `parent` is `None`.
    ///
    /// `node` itself stays in the arena.
    fn replace_in_parent(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
        replacements: &[NodeId],
    ) -> Result<(), QueryTreeError> {
        match parent {
            None => {
                let [new_root] = replacements else {
                    return Err(QueryTreeError::InvalidProposal(
                        "the root can only be replaced by a single node".to_string(),
                    ));
                };

                self.root = *new_root;
            }
            Some(parent) => {
                let parent_node = self.plan_node_mut(parent)?;
                let position = parent_node
                    .children
                    .iter()
                    .position(|child| *child == node)
                    .ok_or_else(|| {
                        QueryTreeError::InvalidProposal(format!("{node} is not a child of {parent}"))
                    })?;

                parent_node
                    .children
                    .splice(position..=position, replacements.iter().copied());
            }
        }

        for replacement in replacements {
            self.plan_node_mut(*replacement)?.parent = parent;
        }

        Ok(())
    }

    /// Repeatedly apply the first proposal of the given optimizers
    /// until none applies or `max_steps` proposals have been applied.
    ///
    /// Returns the number of applied proposals.
    pub fn optimize(
        &mut self,
        optimizers: &[&dyn QueryNodeOptimizer],
        max_steps: usize,
    ) -> Result<usize, QueryTreeError> {
        let mut applied = 0;

        while applied < max_steps {
            let Some((optimizer, proposal)) = self.next_proposal(optimizers) else {
                log::debug!("query plan optimization finished after {applied} steps");
                return Ok(applied);
            };

            log::trace!("{optimizer}: {proposal}");
            self.apply_proposal(proposal)?;
            applied += 1;
        }

        if self.next_proposal(optimizers).is_some() {
            log::warn!("query plan optimization stopped after {max_steps} steps");
        }

        Ok(applied)
    }

    fn next_proposal(
        &self,
        optimizers: &[&dyn QueryNodeOptimizer],
    ) -> Option<(&'static str, LocalOptimizationProposal)> {
        for id in self.pre_order() {
            let node = self.get(id)?;

            for optimizer in optimizers {
                if let Some(proposal) = node.accept_optimizer(*optimizer, self, id) {
                    return Some((optimizer.name(), proposal));
                }
            }
        }

        None
    }

    /// Build the query plan of a union of conjunctive queries.
    ///
    /// Every rule is turned into a projection onto its head,
    /// over a filter with its built-in atoms, if there are any,
    /// over a join of its remaining atoms, if there is more than one.
    /// The projections are children of a single union.
    ///
    /// Rules without a data atom in their body,
    /// such as rules obtained by unfolding with facts only,
    /// cannot be planned and yield [QueryTreeError::UnsupportedRule].
    pub fn from_rules(rules: &[Rule]) -> Result<Self, QueryTreeError> {
        let first = rules.first().ok_or(QueryTreeError::NoRules)?;
        let arity = first
            .head()
            .ok_or_else(|| QueryTreeError::UnsupportedRule(first.to_string()))?
            .arity();

        let mut query = Self::new(QueryNode::union(arity));
        let root = query.root();

        for rule in rules {
            query.add_rule(root, arity, rule)?;
        }

        Ok(query)
    }

    fn add_rule(&mut self, parent: NodeId, arity: usize, rule: &Rule) -> Result<(), QueryTreeError> {
        let head = rule
            .head()
            .filter(|head| !head.is_select_all())
            .ok_or_else(|| QueryTreeError::UnsupportedRule(rule.to_string()))?;

        if head.arity() != arity {
            return Err(QueryTreeError::UnionArityMismatch {
                expected: arity,
                found: head.arity(),
            });
        }

        let (builtins, data): (Vec<&Atom>, Vec<&Atom>) =
            rule.body_atoms().partition(|atom| atom.is_builtin());
        if data.is_empty() {
            return Err(QueryTreeError::UnsupportedRule(rule.to_string()));
        }

        let mut current = self.add_child(parent, QueryNode::projection(head.clone()))?;

        if !builtins.is_empty() {
            current = self.add_child(
                current,
                QueryNode::filter(builtins.into_iter().cloned().collect()),
            )?;
        }

        if data.len() > 1 {
            current = self.add_child(current, QueryNode::join())?;
        }

        for atom in data {
            self.add_child(current, QueryNode::data(atom.clone()))?;
        }

        Ok(())
    }
}

impl Display for IntermediateQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tree = self
            .accept_visitor(&mut PlanPrinter)
            .map_err(|_| std::fmt::Error)?;

        let mut output = String::new();
        write_tree(&mut output, &tree)?;
        write!(f, "{output}")
    }
}
