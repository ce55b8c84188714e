//! Common types and utilities for the tshape structural shape indexer.
//!
//! This crate provides foundational types used across all tshape crates:
//! - Shape canonicalization limits and sentinels
//! - Declaration locations and the global declaration order
//! - Source path classification (dependency trees, ambient declaration files)

// Centralized limits and sentinels
pub mod limits;

// Declaration locations (file path + position) and their ordering
pub mod location;
pub use location::DeclarationLocation;

// Source path classification
pub mod paths;
pub use paths::{is_declaration_file_name, is_dependency_path};
