//! Structural base finding.
//!
//! A candidate is a structural base of a target when the candidate's property
//! facts are a strict subset of the target's. Among all qualifying candidates
//! the one with the most properties wins (the tightest fit, leaving the
//! fewest members for the target to declare itself); remaining ties go to the
//! earliest candidate in declaration order.

use crate::properties::{PropertyFact, is_property_subset};
use crate::shape::DeclarationRecord;
use std::sync::Arc;
use tracing::trace;

/// Best structural base for `target` among `candidates`, if any.
///
/// Returns `None` unless `target` is an object shape with properties. The
/// target itself (by declaring node) is never its own base.
pub fn find_best_base<'a>(
    target: &DeclarationRecord,
    candidates: &'a [Arc<DeclarationRecord>],
) -> Option<&'a Arc<DeclarationRecord>> {
    let target_properties = target.shape.object_properties()?;
    if target_properties.is_empty() {
        return None;
    }

    let mut best: Option<&'a Arc<DeclarationRecord>> = None;
    for candidate in candidates {
        if candidate.node == target.node {
            continue;
        }
        let Some(properties) = candidate.shape.object_properties() else {
            continue;
        };
        if properties.is_empty() || properties.len() >= target_properties.len() {
            continue;
        }
        if !is_property_subset(properties, target_properties) {
            continue;
        }

        best = match best {
            Some(current) if !is_better_base(candidate, current) => Some(current),
            _ => Some(candidate),
        };
    }

    if let Some(base) = best {
        trace!(target = %target.name, base = %base.name, "found structural base");
    }
    best
}

fn is_better_base(candidate: &DeclarationRecord, current: &DeclarationRecord) -> bool {
    let (candidate_len, current_len) = (candidate.property_count(), current.property_count());
    candidate_len > current_len
        || (candidate_len == current_len && candidate.location < current.location)
}

/// A structural base together with what the target adds on top of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseSuggestion {
    pub base: Arc<DeclarationRecord>,
    /// Target facts absent from the base, sorted by name.
    pub residual: Vec<PropertyFact>,
}

/// [`find_best_base`] plus the residual members the target would still declare.
pub fn suggest_base(
    target: &DeclarationRecord,
    candidates: &[Arc<DeclarationRecord>],
) -> Option<BaseSuggestion> {
    let base = find_best_base(target, candidates)?;
    // `find_best_base` only pairs object shapes.
    let (Some(target_properties), Some(base_properties)) = (
        target.shape.object_properties(),
        base.shape.object_properties(),
    ) else {
        return None;
    };
    let residual = target_properties
        .iter()
        .filter(|fact| !base_properties.iter().any(|base_fact| base_fact.name == fact.name))
        .cloned()
        .collect();

    Some(BaseSuggestion {
        base: Arc::clone(base),
        residual,
    })
}

#[cfg(test)]
#[path = "../tests/base_tests.rs"]
mod tests;
