//! Structured query tracing for index builds and cache lookups.
//!
//! Events use target `tshape::query_json` and are intended to be consumed with:
//! `RUST_LOG=tshape::query_json=trace` and a JSON formatting layer.
//!
//! Environment:
//! - `TSHAPE_QUERY_RUN_ID`: optional run identifier attached to every event.

use crate::host::ProgramId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: "tshape::query_json", Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| {
            std::env::var("TSHAPE_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string())
        })
        .as_str()
}

#[inline]
pub(crate) fn index_start(query_id: u64, program: ProgramId) {
    trace!(
        target: "tshape::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op = "build_index",
        program_id = program.0
    );
}

#[inline]
pub(crate) fn index_end(query_id: u64, program: ProgramId, records: usize, cache_hit: bool) {
    trace!(
        target: "tshape::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op = "build_index",
        program_id = program.0,
        records,
        cache_hit
    );
}
