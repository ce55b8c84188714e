//! Structural type canonicalization.
//!
//! Turns one checked type into a [`CanonicalKey`] that depends only on the
//! type's structure: member order in unions and intersections, property
//! declaration order and signature order never leak into the key.
//!
//! # Key grammar
//!
//! | Class | Rendering |
//! |-------|-----------|
//! | Union | `union<k1\|k2\|...>` (member keys sorted) |
//! | Intersection | `intersection<k1&k2&...>` (member keys sorted) |
//! | Indexed object | `object[string:<k>;number:<k>]{props}` |
//! | Plain object | `object{props}` |
//! | Callable | `callable<c1;c2\|k1;k2>` (each list sorted) |
//! | Anything else | the checker's fully expanded type text |
//!
//! `props` is a comma-joined list of `readonly name?:key` entries in
//! property-name order (see [`crate::properties`]).
//!
//! # Recursion
//!
//! Two mechanisms bound every traversal:
//! 1. **Depth budget**: each step into a member, property or index value costs
//!    one unit; an exhausted budget yields `#DepthLimit`.
//! 2. **Identity memo**: completed keys are cached by type identity and
//!    remaining budget for the lifetime of one [`ShapeCanonicalizer`]. A type
//!    reached again with the same budget reuses its key; a type reached with
//!    a different budget is recomputed, so a key never depends on the order in
//!    which members or properties were visited.
//!
//! The memo is never shared between independent top-level calls, since the
//! alias setting of the call is baked into its entries.

use crate::host::{IndexKind, NodeId, TypeId, TypeQuery};
use crate::key::CanonicalKey;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt::Write;
use tracing::trace;

const MEMBER_KEYS_INLINE: usize = 8;

type MemberKeyBuffer = SmallVec<[CanonicalKey; MEMBER_KEYS_INLINE]>;

/// Classification of a (possibly alias-resolved) type, in priority order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ShapeClass {
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    IndexedObject {
        string_index: Option<TypeId>,
        number_index: Option<TypeId>,
    },
    PlainObject,
    Callable,
    Other,
}

/// One canonicalization traversal.
///
/// Create one canonicalizer per top-level call; see the module docs for why
/// the memo must not outlive it.
pub struct ShapeCanonicalizer<'a> {
    pub(crate) db: &'a dyn TypeQuery,
    /// Fallback location for properties without a declaring node.
    pub(crate) location: NodeId,
    normalize_aliases: bool,
    memo: FxHashMap<(TypeId, u32), CanonicalKey>,
}

impl<'a> ShapeCanonicalizer<'a> {
    pub fn new(db: &'a dyn TypeQuery, location: NodeId) -> Self {
        Self {
            db,
            location,
            normalize_aliases: true,
            memo: FxHashMap::default(),
        }
    }

    /// Builder: enable or disable alias-to-apparent-type resolution.
    pub fn with_alias_normalization(mut self, normalize_aliases: bool) -> Self {
        self.normalize_aliases = normalize_aliases;
        self
    }

    /// Canonical key of `type_id` with `depth` units of budget.
    pub fn canonicalize(&mut self, type_id: TypeId, depth: u32) -> CanonicalKey {
        if depth == 0 {
            return CanonicalKey::depth_limit();
        }
        if let Some(key) = self.memo.get(&(type_id, depth)) {
            return key.clone();
        }

        let resolved = self.resolve_alias(type_id);
        let key = match self.classify(resolved) {
            ShapeClass::Union(members) => self.join_members("union", '|', &members, depth),
            ShapeClass::Intersection(members) => {
                self.join_members("intersection", '&', &members, depth)
            }
            ShapeClass::IndexedObject {
                string_index,
                number_index,
            } => {
                let mut key = String::from("object[");
                let mut first = true;
                for (label, index) in [("string", string_index), ("number", number_index)] {
                    let Some(value_type) = index else {
                        continue;
                    };
                    if !first {
                        key.push(';');
                    }
                    first = false;
                    let value_key = self.canonicalize(value_type, depth - 1);
                    let _ = write!(key, "{label}:{value_key}");
                }
                key.push(']');
                let properties = self.extract_properties(resolved, depth - 1);
                crate::properties::render_property_list(&mut key, &properties);
                CanonicalKey::from(key)
            }
            ShapeClass::PlainObject => {
                let mut key = String::from("object");
                let properties = self.extract_properties(resolved, depth - 1);
                crate::properties::render_property_list(&mut key, &properties);
                CanonicalKey::from(key)
            }
            ShapeClass::Callable => self.callable_key(resolved),
            ShapeClass::Other => CanonicalKey::from(self.db.type_to_string(resolved)),
        };

        trace!(type_id = type_id.0, depth, key = %key, "canonicalize");
        self.memo.insert((type_id, depth), key.clone());
        key
    }

    pub(crate) fn resolve_alias(&self, type_id: TypeId) -> TypeId {
        if !self.normalize_aliases || !self.db.has_alias(type_id) {
            return type_id;
        }
        self.db.apparent_type(type_id)
    }

    pub(crate) fn classify(&self, type_id: TypeId) -> ShapeClass {
        let db = self.db;
        if db.is_union(type_id) {
            return ShapeClass::Union(db.members(type_id));
        }
        if db.is_intersection(type_id) {
            return ShapeClass::Intersection(db.members(type_id));
        }

        let string_index = db.index_value_type(type_id, IndexKind::String);
        let number_index = db.index_value_type(type_id, IndexKind::Number);
        if string_index.is_some() || number_index.is_some() {
            return ShapeClass::IndexedObject {
                string_index,
                number_index,
            };
        }

        if !db.properties(type_id).is_empty() {
            return ShapeClass::PlainObject;
        }

        if !db.call_signatures(type_id).is_empty() || !db.construct_signatures(type_id).is_empty()
        {
            return ShapeClass::Callable;
        }

        ShapeClass::Other
    }

    fn join_members(
        &mut self,
        label: &str,
        separator: char,
        members: &[TypeId],
        depth: u32,
    ) -> CanonicalKey {
        let mut keys: MemberKeyBuffer = members
            .iter()
            .map(|&member| self.canonicalize(member, depth - 1))
            .collect();
        keys.sort_unstable();

        let mut key = String::with_capacity(label.len() + 2 + keys.len() * 8);
        key.push_str(label);
        key.push('<');
        for (i, member_key) in keys.iter().enumerate() {
            if i > 0 {
                key.push(separator);
            }
            key.push_str(member_key.as_str());
        }
        key.push('>');
        CanonicalKey::from(key)
    }

    fn callable_key(&self, type_id: TypeId) -> CanonicalKey {
        let render = |signatures: Vec<crate::host::SignatureId>| {
            let mut rendered: Vec<String> = signatures
                .into_iter()
                .map(|signature| self.db.signature_to_string(signature))
                .collect();
            rendered.sort_unstable();
            rendered.join(";")
        };
        let calls = render(self.db.call_signatures(type_id));
        let constructs = render(self.db.construct_signatures(type_id));
        CanonicalKey::from(format!("callable<{calls}|{constructs}>"))
    }
}

/// Canonical key of `type_id` in a fresh traversal.
///
/// `location` is the declaration being canonicalized; it is used for
/// properties that have no declaring node of their own.
pub fn canonical_key(
    db: &dyn TypeQuery,
    type_id: TypeId,
    location: NodeId,
    depth: u32,
    normalize_aliases: bool,
) -> CanonicalKey {
    ShapeCanonicalizer::new(db, location)
        .with_alias_normalization(normalize_aliases)
        .canonicalize(type_id, depth)
}

#[cfg(test)]
#[path = "../tests/canonicalize_tests.rs"]
mod tests;
