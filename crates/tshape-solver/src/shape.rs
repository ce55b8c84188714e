//! Declaration shapes and records.

use crate::canonicalize::ShapeCanonicalizer;
use crate::host::{DeclaredForm, NodeId, SymbolId, TypeId, TypeQuery};
use crate::key::CanonicalKey;
use crate::properties::PropertyFact;
use std::sync::Arc;
use tshape_common::DeclarationLocation;

/// Structural shape of a declaration.
///
/// Only the `Object` arm takes part in duplicate buckets and base finding;
/// `Other` is carried for point lookups and is otherwise inert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclarationShape {
    /// At least one own property was extracted. `properties` is sorted by name.
    Object {
        canonical: CanonicalKey,
        properties: Vec<PropertyFact>,
    },
    /// Primitives, empty objects, bare callables and everything else.
    Other { canonical: CanonicalKey },
}

impl DeclarationShape {
    /// Computes the shape of `type_id` declared at `location`.
    ///
    /// The canonical key gets `depth` units of budget and the property facts
    /// get `depth - 1`, each in its own traversal.
    pub fn compute(
        db: &dyn TypeQuery,
        type_id: TypeId,
        location: NodeId,
        depth: u32,
        normalize_aliases: bool,
    ) -> Self {
        let canonical = ShapeCanonicalizer::new(db, location)
            .with_alias_normalization(normalize_aliases)
            .canonicalize(type_id, depth);
        let properties = ShapeCanonicalizer::new(db, location)
            .with_alias_normalization(normalize_aliases)
            .extract_properties(type_id, depth.saturating_sub(1));

        if properties.is_empty() {
            DeclarationShape::Other { canonical }
        } else {
            DeclarationShape::Object {
                canonical,
                properties,
            }
        }
    }

    pub fn canonical(&self) -> &CanonicalKey {
        match self {
            DeclarationShape::Object { canonical, .. } | DeclarationShape::Other { canonical } => {
                canonical
            }
        }
    }

    /// Property facts of an object shape, `None` for `Other`.
    pub fn object_properties(&self) -> Option<&[PropertyFact]> {
        match self {
            DeclarationShape::Object { properties, .. } => Some(properties),
            DeclarationShape::Other { .. } => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, DeclarationShape::Object { .. })
    }
}

/// One indexed declaration.
///
/// Owned by the [`ProgramIndex`](crate::ProgramIndex) that created it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclarationRecord {
    /// Declaring node; the record's identity.
    pub node: NodeId,
    pub symbol: SymbolId,
    pub name: Arc<str>,
    pub location: DeclarationLocation,
    pub form: DeclaredForm,
    pub shape: DeclarationShape,
}

impl DeclarationRecord {
    pub fn canonical(&self) -> &CanonicalKey {
        self.shape.canonical()
    }

    /// Number of property facts (zero for `Other` shapes).
    pub fn property_count(&self) -> usize {
        self.shape.object_properties().map_or(0, <[PropertyFact]>::len)
    }
}

/// Sorts records into declaration order (file path, then position).
pub(crate) fn sort_by_declaration_order(records: &mut [Arc<DeclarationRecord>]) {
    records.sort_by(|a, b| a.location.cmp(&b.location));
}
