//! Centralized limits and sentinels for shape canonicalization.
//!
//! Every traversal in the solver is bounded by an explicit depth budget rather
//! than by a visited set alone, so the values here are the only knobs that
//! control how much of a type graph gets explored.
//!
//! # Categories
//!
//! - **Depth budgets**: how far the canonicalizer descends into a type
//! - **Sentinels**: fixed keys emitted when a budget is exhausted
//! - **Path defaults**: directory segments that mark third-party code

// =============================================================================
// Depth Budgets
// =============================================================================

/// Default depth budget for the canonical key of a top-level declaration.
///
/// Property facts of the same declaration are extracted with one less
/// (`DEFAULT_SHAPE_DEPTH - 1`), so the keys stored in property facts line up
/// with the keys embedded in the declaration's own canonical key.
///
/// Every level of object nesting costs two units of budget: one when the
/// canonicalizer hands the object to the property extractor, and one when the
/// extractor canonicalizes each property type.
///
/// # TypeScript example
///
/// ```typescript
/// // Self-referential shape: the key is cut off with the sentinel once
/// // the budget runs out instead of recursing forever.
/// interface ListNode {
///   value: string;
///   next: ListNode;
/// }
/// ```
pub const DEFAULT_SHAPE_DEPTH: u32 = 8;

// =============================================================================
// Sentinels
// =============================================================================

/// Key emitted in place of a type whose depth budget is exhausted.
pub const DEPTH_LIMIT_SENTINEL: &str = "#DepthLimit";

// =============================================================================
// Path Defaults
// =============================================================================

/// Directory segments that mark vendored or third-party dependency trees.
///
/// Files whose path contains one of these segments are never indexed.
pub const DEFAULT_DEPENDENCY_DIRS: &[&str] = &["node_modules"];

/// File name suffixes of ambient declaration files.
pub const DECLARATION_FILE_SUFFIXES: &[&str] = &[".d.ts", ".d.mts", ".d.cts"];
