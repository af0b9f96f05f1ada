//! This module defines errors that occur while building and editing query plans.
#![allow(missing_docs)]

use enum_assoc::Assoc;
use thiserror::Error;

use super::node::QueryNodeKind;

/// Structural violations of a query plan tree
#[derive(Assoc, Error, Debug, Clone, PartialEq, Eq)]
#[func(pub fn note(&self) -> Option<&'static str>)]
#[func(pub fn code(&self) -> usize)]
pub enum QueryTreeError {
    /// Node would end up with an illegal number of children.
    #[error(r#"{kind} node cannot have {found} children"#)]
    #[assoc(code = 201)]
    #[assoc(note = "data nodes have no children, filter and projection nodes exactly one")]
    ChildCount { kind: QueryNodeKind, found: usize },
    /// Node id does not refer to a node of this query.
    #[error(r#"unknown node `{0}`"#)]
    #[assoc(code = 202)]
    UnknownNode(String),
    /// Root of a query cannot be removed.
    #[error("the root node cannot be removed")]
    #[assoc(code = 203)]
    RootRemoval,
    /// Children of a union have a different arity than the union.
    #[error(r#"union of arity {expected} has a child of arity {found}"#)]
    #[assoc(code = 204)]
    UnionArityMismatch { expected: usize, found: usize },
    /// Query plan is built from an empty set of rules.
    #[error("cannot build a query plan without rules")]
    #[assoc(code = 205)]
    NoRules,
    /// Rule cannot be turned into a query plan.
    #[error(r#"rule `{0}` cannot be translated into a query plan"#)]
    #[assoc(code = 206)]
    #[assoc(note = "rules need a head without wildcard and at least one data atom in the body")]
    UnsupportedRule(String),
    /// Optimization proposal does not fit the current tree.
    #[error(r#"invalid optimization proposal: {0}"#)]
    #[assoc(code = 207)]
    InvalidProposal(String),
}

/// Transformer cannot produce a replacement for a node
///
/// This signals that a transformation does not apply
/// and leaves the transformed query untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(r#"cannot transform {kind} node: {reason}"#)]
pub struct QueryNodeTransformationError {
    /// Kind of the node that could not be transformed
    pub kind: QueryNodeKind,
    /// Reason of the failure
    pub reason: String,
}

impl QueryNodeTransformationError {
    /// Create a new [QueryNodeTransformationError].
    pub fn new(kind: QueryNodeKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}
