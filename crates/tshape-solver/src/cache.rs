//! Build-once cache of program indices.
//!
//! Entries are keyed by [`ProgramId`] and constructed on first access. Each
//! entry holds a `OnceLock`, so concurrent first lookups for the same program
//! build the index exactly once while lookups for other programs proceed.
//!
//! There is no invalidation protocol: a re-checked program arrives with a new
//! `ProgramId` and gets a new entry. Stale entries can be dropped with
//! [`ShapeIndexCache::forget`] or [`ShapeIndexCache::clear`].

use crate::caches::query_trace;
use crate::error::ShapeIndexError;
use crate::host::{ProgramHost, ProgramId};
use crate::index::ProgramIndex;
use crate::options::ShapeIndexOptions;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};
use tracing::trace;

type IndexCell = Arc<OnceLock<Arc<ProgramIndex>>>;

static GLOBAL_CACHE: OnceLock<ShapeIndexCache> = OnceLock::new();

/// Thread-safe, identity-keyed cache of [`ProgramIndex`] values.
pub struct ShapeIndexCache {
    options: ShapeIndexOptions,
    entries: DashMap<ProgramId, IndexCell>,
}

impl ShapeIndexCache {
    /// Create a cache that builds indices with `options`.
    pub fn new(options: ShapeIndexOptions) -> Result<Self, ShapeIndexError> {
        options.validate()?;
        Ok(Self {
            options,
            entries: DashMap::new(),
        })
    }

    /// Process-wide cache using default options.
    pub fn global() -> &'static ShapeIndexCache {
        GLOBAL_CACHE.get_or_init(|| Self {
            options: ShapeIndexOptions::default(),
            entries: DashMap::new(),
        })
    }

    pub fn options(&self) -> &ShapeIndexOptions {
        &self.options
    }

    /// Index of `host`'s program, building it on first access.
    ///
    /// Fails only when the host has no type information; nothing is cached in
    /// that case.
    pub fn get_or_build(
        &self,
        host: &dyn ProgramHost,
    ) -> Result<Arc<ProgramIndex>, ShapeIndexError> {
        let program = host.program_id();
        if !host.has_type_info() {
            return Err(ShapeIndexError::TypeInfoUnavailable { program });
        }

        let query_id = query_trace::enabled().then(query_trace::next_query_id);
        if let Some(query_id) = query_id {
            query_trace::index_start(query_id, program);
        }

        // Clone the cell out so the shard lock is released before building.
        let cell = Arc::clone(self.entries.entry(program).or_default().value());
        let mut built = false;
        let index = cell.get_or_init(|| {
            built = true;
            Arc::new(ProgramIndex::build(host, &self.options))
        });

        trace!(program = program.0, cache_hit = !built, "get_or_build");
        if let Some(query_id) = query_id {
            query_trace::index_end(query_id, program, index.stats().records, !built);
        }
        Ok(Arc::clone(index))
    }

    /// Cached index of `program`, without building.
    pub fn get(&self, program: ProgramId) -> Option<Arc<ProgramIndex>> {
        self.entries
            .get(&program)
            .and_then(|cell| cell.get().cloned())
    }

    /// Drop the entry for `program`. Returns `true` if one existed.
    pub fn forget(&self, program: ProgramId) -> bool {
        self.entries.remove(&program).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached programs (including ones still being built).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Index of `host`'s program from the process-wide cache.
pub fn build_index(host: &dyn ProgramHost) -> Result<Arc<ProgramIndex>, ShapeIndexError> {
    ShapeIndexCache::global().get_or_build(host)
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod tests;
