//! Structural Shape Solver
//!
//! Canonicalizes checked types into structural keys and indexes a program's
//! named declarations by shape. It is used to answer two questions about a
//! declaration:
//!
//! - **Duplicates**: which other declarations have exactly the same shape?
//! - **Bases**: which declaration's shape is the tightest strict subset of it?
//!
//! Layers, leaves first:
//!
//! - [`canonicalize`]: type → [`CanonicalKey`], memoized per traversal and
//!   bounded by a depth budget
//! - [`properties`]: object type → sorted [`PropertyFact`]s
//! - [`index`]: program → [`ProgramIndex`], cached per program identity by
//!   [`cache`]
//! - [`base`]: target + candidates → best structural base
//!
//! The solver talks to the host's parser and checker only through the
//! [`TypeQuery`] and [`ProgramHost`] traits.

pub mod base;
pub mod cache;
pub mod canonicalize;
pub mod error;
pub mod host;
pub mod index;
pub mod key;
pub mod memory;
pub mod options;
pub mod properties;
pub mod shape;

mod caches {
    pub(crate) mod query_trace;
}

pub use base::{BaseSuggestion, find_best_base, suggest_base};
pub use cache::{ShapeIndexCache, build_index};
pub use canonicalize::{ShapeCanonicalizer, canonical_key};
pub use error::ShapeIndexError;
pub use host::{
    DeclaredForm, FileId, IndexKind, ModifierFlags, NodeId, ProgramHost, ProgramId, SignatureId,
    SymbolFlags, SymbolId, TypeId, TypeQuery,
};
pub use index::{DuplicateGroup, IndexStats, ProgramIndex};
pub use key::CanonicalKey;
pub use memory::{MemoryProgram, PropertySpec};
pub use options::ShapeIndexOptions;
pub use properties::{PropertyFact, is_property_subset, property_facts};
pub use shape::{DeclarationRecord, DeclarationShape};
pub use tshape_common::DeclarationLocation;

#[cfg(test)]
#[path = "../tests/integration_tests.rs"]
mod integration_tests;
