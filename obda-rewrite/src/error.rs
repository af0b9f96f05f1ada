//! Error-handling module for the crate

use thiserror::Error;

use crate::{
    query_plan::error::{QueryNodeTransformationError, QueryTreeError},
    rewriting::error::RewritingError,
    rule_model::error::ModelError,
};

/// Error-Collection for all the possible Errors occurring in this crate
#[derive(Error, Debug)]
pub enum Error {
    /// Violation of an invariant of the rule model
    #[error(transparent)]
    Model(#[from] ModelError),
    /// Structural error in a query plan
    #[error(transparent)]
    QueryTree(#[from] QueryTreeError),
    /// Node transformation could not be applied
    #[error(transparent)]
    Transformation(#[from] QueryNodeTransformationError),
    /// Rewriting or unfolding did not finish
    #[error(transparent)]
    Rewriting(#[from] RewritingError),
}
