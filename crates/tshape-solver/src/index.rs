//! Per-program declaration index.
//!
//! Built once per program by a whole-file deep walk over every eligible
//! source file. After construction the index is immutable and is shared
//! between readers behind an `Arc` (see [`crate::cache`]).
//!
//! ## Lookups
//!
//! | Lookup | Contents |
//! |--------|----------|
//! | `by_node` | every indexed declaration, `Object` and `Other` shapes |
//! | `by_canonical` | `Object` shapes only, bucketed by canonical key |
//! | `object_candidates` | `Object` shapes declared as `ObjectShape` |
//!
//! Every bucket and the candidate list are in declaration order.

use crate::host::{DeclaredForm, FileId, NodeId, ProgramHost, ProgramId};
use crate::key::CanonicalKey;
use crate::options::ShapeIndexOptions;
use crate::shape::{DeclarationRecord, DeclarationShape, sort_by_declaration_order};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::sync::Arc;
use tracing::{debug, debug_span, trace};
use tshape_common::{DeclarationLocation, is_dependency_path};

type KeyBuckets = IndexMap<CanonicalKey, Vec<Arc<DeclarationRecord>>, FxBuildHasher>;

/// Counters collected while building an index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub declarations_without_symbol: usize,
    pub records: usize,
    pub buckets: usize,
    pub candidates: usize,
}

/// A group of structurally identical object declarations.
#[derive(Clone, Copy, Debug)]
pub struct DuplicateGroup<'a> {
    pub key: &'a CanonicalKey,
    /// Earliest declaration in declaration order.
    pub original: &'a Arc<DeclarationRecord>,
    /// The rest of the bucket, in declaration order.
    pub duplicates: &'a [Arc<DeclarationRecord>],
}

/// Shapes of every indexed declaration of one program.
#[derive(Debug)]
pub struct ProgramIndex {
    program: ProgramId,
    by_node: FxHashMap<NodeId, Arc<DeclarationRecord>>,
    by_canonical: KeyBuckets,
    object_candidates: Vec<Arc<DeclarationRecord>>,
    stats: IndexStats,
}

impl ProgramIndex {
    /// Walks the program and computes every declaration's shape.
    ///
    /// Does not consult any cache; use [`crate::build_index`] or
    /// [`ShapeIndexCache`](crate::ShapeIndexCache) for build-once semantics.
    /// The caller must have checked `host.has_type_info()`.
    pub fn build(host: &dyn ProgramHost, options: &ShapeIndexOptions) -> Self {
        let program = host.program_id();
        let _span = debug_span!("build_index", program = program.0).entered();

        let mut builder = IndexBuilder {
            host,
            options,
            index: ProgramIndex {
                program,
                by_node: FxHashMap::default(),
                by_canonical: KeyBuckets::default(),
                object_candidates: Vec::new(),
                stats: IndexStats::default(),
            },
        };

        for file in host.source_files() {
            builder.index_file(file);
        }

        let mut index = builder.index;
        for bucket in index.by_canonical.values_mut() {
            sort_by_declaration_order(bucket);
        }
        sort_by_declaration_order(&mut index.object_candidates);

        index.stats.records = index.by_node.len();
        index.stats.buckets = index.by_canonical.len();
        index.stats.candidates = index.object_candidates.len();
        debug!(
            program = program.0,
            files_indexed = index.stats.files_indexed,
            files_skipped = index.stats.files_skipped,
            records = index.stats.records,
            buckets = index.stats.buckets,
            candidates = index.stats.candidates,
            "index built"
        );
        index
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Record of the declaration at `node`, if it was indexed.
    pub fn record(&self, node: NodeId) -> Option<&Arc<DeclarationRecord>> {
        self.by_node.get(&node)
    }

    /// Shape of the declaration at `node`, if it was indexed.
    pub fn shape_of(&self, node: NodeId) -> Option<&DeclarationShape> {
        self.by_node.get(&node).map(|record| &record.shape)
    }

    /// Object declarations sharing `key`, in declaration order.
    pub fn duplicates_of(&self, key: &str) -> &[Arc<DeclarationRecord>] {
        self.by_canonical.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Object declarations eligible as structural bases, in declaration order.
    pub fn object_candidates(&self) -> &[Arc<DeclarationRecord>] {
        &self.object_candidates
    }

    /// Earliest declaration sharing `record`'s canonical key.
    ///
    /// `None` when `record` is itself the earliest, is not an object shape,
    /// or has no structural twin.
    pub fn original_of(&self, record: &DeclarationRecord) -> Option<&Arc<DeclarationRecord>> {
        if !record.shape.is_object() {
            return None;
        }
        let original = self.duplicates_of(record.canonical().as_str()).first()?;
        (original.node != record.node).then_some(original)
    }

    /// Every bucket holding more than one declaration.
    ///
    /// Groups are yielded in the declaration order of their originals.
    pub fn duplicate_groups(&self) -> Vec<DuplicateGroup<'_>> {
        let mut groups: Vec<DuplicateGroup<'_>> = self
            .by_canonical
            .iter()
            .filter_map(|(key, bucket)| match bucket.as_slice() {
                [original, duplicates @ ..] if !duplicates.is_empty() => Some(DuplicateGroup {
                    key,
                    original,
                    duplicates,
                }),
                _ => None,
            })
            .collect();
        groups.sort_by(|a, b| a.original.location.cmp(&b.original.location));
        groups
    }

    /// All indexed records, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &Arc<DeclarationRecord>> {
        self.by_node.values()
    }
}

struct IndexBuilder<'a> {
    host: &'a dyn ProgramHost,
    options: &'a ShapeIndexOptions,
    index: ProgramIndex,
}

impl IndexBuilder<'_> {
    fn index_file(&mut self, file: FileId) {
        let host = self.host;
        let file_name = host.file_name(file);

        if self.options.skip_declaration_files && host.is_declaration_file(file) {
            debug!(file = %file_name, "skipping declaration file");
            self.index.stats.files_skipped += 1;
            return;
        }
        if is_dependency_path(&file_name, &self.options.dependency_dirs) {
            debug!(file = %file_name, "skipping dependency file");
            self.index.stats.files_skipped += 1;
            return;
        }
        self.index.stats.files_indexed += 1;

        // Pre-order walk; children are pushed in reverse to keep source order.
        let mut stack = vec![host.file_root(file)];
        while let Some(node) = stack.pop() {
            if let Some(form) = host.declaration_form(node) {
                self.index_declaration(node, form, &file_name);
            }
            let children = host.children(node);
            stack.extend(children.into_iter().rev());
        }
    }

    fn index_declaration(&mut self, node: NodeId, form: DeclaredForm, file_name: &Arc<str>) {
        let host = self.host;
        let Some(symbol) = host.declaration_symbol(node) else {
            trace!(node = node.0, "declaration without symbol");
            self.index.stats.declarations_without_symbol += 1;
            return;
        };
        if host.symbol_declarations(symbol).is_empty() {
            trace!(node = node.0, symbol = symbol.0, "symbol without declarations");
            self.index.stats.declarations_without_symbol += 1;
            return;
        }

        let type_id = host.type_at_location(node);
        let shape = DeclarationShape::compute(
            host.as_type_query(),
            type_id,
            node,
            self.options.depth_limit,
            self.options.normalize_aliases,
        );
        let record = Arc::new(DeclarationRecord {
            node,
            symbol,
            name: host.symbol_name(symbol),
            location: DeclarationLocation::new(Arc::clone(file_name), host.node_position(node)),
            form,
            shape,
        });
        trace!(
            name = %record.name,
            location = %record.location,
            key = %record.canonical(),
            properties = record.property_count(),
            "indexed declaration"
        );

        if let DeclarationShape::Object { canonical, .. } = &record.shape {
            self.index
                .by_canonical
                .entry(canonical.clone())
                .or_default()
                .push(Arc::clone(&record));
            if form == DeclaredForm::ObjectShape {
                self.index.object_candidates.push(Arc::clone(&record));
            }
        }
        self.index.by_node.insert(node, record);
    }
}

#[cfg(test)]
#[path = "../tests/index_tests.rs"]
mod tests;
