//! This module defines the logical representation of queries, mapping and ontology rules.

#[macro_use]
pub mod util;

pub mod components;
pub mod error;
pub mod generator;
pub mod program;
pub mod substitution;
