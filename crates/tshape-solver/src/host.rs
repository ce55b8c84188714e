//! Collaborator boundary.
//!
//! The solver never parses, binds or checks anything itself. Everything it
//! knows about a program arrives through two traits:
//!
//! - [`TypeQuery`]: the type checker's view of types and symbols
//! - [`ProgramHost`]: the program's files and syntax nodes, on top of `TypeQuery`
//!
//! All handles are plain `Copy` identifiers. Identity comparison of handles is
//! identity comparison of the underlying host objects.

use bitflags::bitflags;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Handles
// =============================================================================

/// Opaque handle to a checked type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Opaque handle to a symbol (declaration or property).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// Opaque handle to a syntax node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Opaque handle to a call or construct signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignatureId(pub u32);

/// Opaque handle to a source file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

/// Identity of one checked program.
///
/// A host must hand out a new `ProgramId` whenever the program is re-checked;
/// cached indices are keyed by it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u64);

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Flags
// =============================================================================

bitflags! {
    /// Symbol flags the solver cares about.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const PROPERTY = 1 << 0;
        /// `name?: T`
        const OPTIONAL = 1 << 2;
    }
}

bitflags! {
    /// Modifiers carried by a declaring node.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u32 {
        const READONLY = 1 << 2;
    }
}

/// Kind of index signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// `[key: string]: T`
    String,
    /// `[index: number]: T`
    Number,
}

/// Syntactic form of a shape-bearing declaration.
///
/// | Form | Example |
/// |------|---------|
/// | `ObjectShape` | `interface Point { x: number }` |
/// | `ShapeAlias` | `type Point = { x: number }` |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclaredForm {
    /// Record/struct-like declaration. Only these become base candidates.
    ObjectShape,
    /// Named alias bound to a type expression.
    ShapeAlias,
}

// =============================================================================
// TypeQuery
// =============================================================================

/// Read-only access to the host's type checker.
pub trait TypeQuery {
    /// Type of the syntax node (for declarations, the declared type).
    fn type_at_location(&self, node: NodeId) -> TypeId;

    /// Apparent type used when alias normalization is enabled.
    fn apparent_type(&self, type_id: TypeId) -> TypeId;

    /// Whether the type was reached through a named alias.
    fn has_alias(&self, type_id: TypeId) -> bool;

    fn is_union(&self, type_id: TypeId) -> bool;

    fn is_intersection(&self, type_id: TypeId) -> bool;

    /// Constituents of a union or intersection, empty otherwise.
    fn members(&self, type_id: TypeId) -> Vec<TypeId>;

    /// Own properties, in host order.
    fn properties(&self, type_id: TypeId) -> Vec<SymbolId>;

    /// Value type of the string or number index signature, if present.
    fn index_value_type(&self, type_id: TypeId, kind: IndexKind) -> Option<TypeId>;

    fn call_signatures(&self, type_id: TypeId) -> Vec<SignatureId>;

    fn construct_signatures(&self, type_id: TypeId) -> Vec<SignatureId>;

    /// Effective type of `property` as seen from `location`.
    fn type_of_property_at(&self, property: SymbolId, location: NodeId) -> TypeId;

    /// Fully expanded, non-truncated rendering of a type.
    fn type_to_string(&self, type_id: TypeId) -> String;

    /// Fully expanded, non-truncated rendering of a signature.
    fn signature_to_string(&self, signature: SignatureId) -> String;

    fn symbol_name(&self, symbol: SymbolId) -> Arc<str>;

    fn symbol_flags(&self, symbol: SymbolId) -> SymbolFlags;

    /// Declaring nodes of a symbol. Empty for synthesized members.
    fn symbol_declarations(&self, symbol: SymbolId) -> Vec<NodeId>;

    fn modifier_flags(&self, node: NodeId) -> ModifierFlags;
}

// =============================================================================
// ProgramHost
// =============================================================================

/// A type-checked program: its files, its syntax and its checker.
pub trait ProgramHost: TypeQuery {
    /// Upcast for code that only needs type queries.
    fn as_type_query(&self) -> &dyn TypeQuery;

    fn program_id(&self) -> ProgramId;

    /// `false` when the host could not type-check the program.
    fn has_type_info(&self) -> bool;

    fn source_files(&self) -> Vec<FileId>;

    fn file_name(&self, file: FileId) -> Arc<str>;

    /// Ambient declaration file (`.d.ts` and friends).
    fn is_declaration_file(&self, file: FileId) -> bool;

    fn file_root(&self, file: FileId) -> NodeId;

    /// Child nodes in source order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Form of the declaration at `node`, `None` for any other node.
    fn declaration_form(&self, node: NodeId) -> Option<DeclaredForm>;

    /// Symbol bound to the declaration's name, if it resolves.
    fn declaration_symbol(&self, node: NodeId) -> Option<SymbolId>;

    /// Start position of the node within its file.
    fn node_position(&self, node: NodeId) -> u32;
}
