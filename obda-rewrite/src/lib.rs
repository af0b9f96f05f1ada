//! Query reformulation kernel for ontology-based data access
//!
//! A conjunctive query over an ontology vocabulary is expanded with ontology rules,
//! unfolded against source mappings and turned into a query plan tree,
//! which can then be linearized into a native query by an external generator.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates,
    variant_size_differences
)]

#[macro_use]
pub mod rule_model;

pub mod error;
pub mod query_plan;
pub mod rewriting;

pub use error::Error;
