//! Property extraction for object-like shapes.
//!
//! Mutually recursive with [`ShapeCanonicalizer::canonicalize`]: every property
//! type is itself canonicalized within the same traversal (same memo, same
//! fallback location).

use crate::canonicalize::ShapeCanonicalizer;
use crate::host::{ModifierFlags, NodeId, SymbolFlags, TypeId, TypeQuery};
use crate::key::CanonicalKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Normalized record of one object member.
///
/// Equality is field-wise: two facts match only if name, optionality,
/// read-only-ness and type key all agree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFact {
    pub name: Arc<str>,
    pub optional: bool,
    pub readonly: bool,
    pub type_key: CanonicalKey,
}

impl fmt::Display for PropertyFact {
    /// `readonly name?:key`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.readonly {
            f.write_str("readonly ")?;
        }
        f.write_str(&self.name)?;
        if self.optional {
            f.write_str("?")?;
        }
        write!(f, ":{}", self.type_key)
    }
}

impl ShapeCanonicalizer<'_> {
    /// Own properties of `type_id` as facts sorted by name.
    ///
    /// Aliases are resolved the same way [`Self::canonicalize`] resolves them,
    /// so facts and key always describe the same type.
    ///
    /// Empty when the budget is exhausted or the type has no own properties;
    /// callers use emptiness to tell object shapes from everything else.
    pub fn extract_properties(&mut self, type_id: TypeId, depth: u32) -> Vec<PropertyFact> {
        if depth == 0 {
            return Vec::new();
        }

        let db = self.db;
        let properties = db.properties(self.resolve_alias(type_id));
        let mut facts = Vec::with_capacity(properties.len());
        for property in properties {
            let declarations = db.symbol_declarations(property);
            let location = declarations.first().copied().unwrap_or(self.location);
            let property_type = db.type_of_property_at(property, location);
            let type_key = self.canonicalize(property_type, depth - 1);

            facts.push(PropertyFact {
                name: db.symbol_name(property),
                optional: db.symbol_flags(property).contains(SymbolFlags::OPTIONAL),
                readonly: is_readonly(db, &declarations),
                type_key,
            });
        }

        facts.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        facts
    }
}

fn is_readonly(db: &dyn TypeQuery, declarations: &[NodeId]) -> bool {
    declarations
        .iter()
        .any(|&node| db.modifier_flags(node).contains(ModifierFlags::READONLY))
}

/// Property facts of `type_id` in a fresh traversal.
pub fn property_facts(
    db: &dyn TypeQuery,
    type_id: TypeId,
    location: NodeId,
    depth: u32,
    normalize_aliases: bool,
) -> Vec<PropertyFact> {
    ShapeCanonicalizer::new(db, location)
        .with_alias_normalization(normalize_aliases)
        .extract_properties(type_id, depth)
}

/// Appends `{e1,e2,...}` to `out`.
pub(crate) fn render_property_list(out: &mut String, properties: &[PropertyFact]) {
    use std::fmt::Write;

    out.push('{');
    for (i, property) in properties.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{property}");
    }
    out.push('}');
}

/// `true` when every fact of `subset` appears, field for field, in `superset`.
///
/// Both slices must be sorted by name with unique names, as produced by
/// [`ShapeCanonicalizer::extract_properties`].
pub fn is_property_subset(subset: &[PropertyFact], superset: &[PropertyFact]) -> bool {
    subset.iter().all(|fact| {
        superset
            .binary_search_by(|probe| probe.name.as_bytes().cmp(fact.name.as_bytes()))
            .is_ok_and(|i| superset[i] == *fact)
    })
}

#[cfg(test)]
#[path = "../tests/properties_tests.rs"]
mod tests;
