//! Source path classification.
//!
//! Paths handed to the indexer come straight from the host, so both `/` and
//! `\` are accepted as separators.

use crate::limits::DECLARATION_FILE_SUFFIXES;

/// Returns `true` when any directory segment of `path` equals one of `dirs`.
///
/// Matching is per segment: `node_modules_backup/x.ts` is not inside
/// `node_modules`.
pub fn is_dependency_path<S: AsRef<str>>(path: &str, dirs: &[S]) -> bool {
    path.split(['/', '\\'])
        .any(|segment| dirs.iter().any(|dir| dir.as_ref() == segment))
}

/// Returns `true` for ambient declaration file names (`.d.ts`, `.d.mts`, `.d.cts`).
pub fn is_declaration_file_name(path: &str) -> bool {
    DECLARATION_FILE_SUFFIXES
        .iter()
        .any(|suffix| path.ends_with(suffix))
}
