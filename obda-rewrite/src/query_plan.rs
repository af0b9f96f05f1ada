//! This module defines the query plan tree,
//! an operator tree over the atoms of a rewritten query.
//!
//! A plan is an [IntermediateQuery][query::IntermediateQuery] owning its nodes.
//! Nodes are instances of the closed enum [QueryNode][node::QueryNode]
//! and are processed through three kinds of dispatch:
//! read-only [visitors][visitor::QueryNodeVisitor],
//! same-variant [transformers][transformer::QueryNodeTransformer]
//! and [optimizers][optimizer::QueryNodeOptimizer] producing
//! [proposals][proposal::LocalOptimizationProposal].

pub mod arena;
pub mod error;
pub mod node;
pub mod optimizer;
pub mod proposal;
pub mod query;
pub mod transformer;
pub mod visitor;
