//! Indexer configuration.

use crate::error::ShapeIndexError;
use serde::{Deserialize, Serialize};
use tshape_common::limits::{DEFAULT_DEPENDENCY_DIRS, DEFAULT_SHAPE_DEPTH};

/// Options for building a [`ProgramIndex`](crate::ProgramIndex).
///
/// Deserializes from camelCase JSON; omitted fields take their defaults:
///
/// ```json
/// { "depthLimit": 8, "normalizeAliases": true,
///   "skipDeclarationFiles": true, "dependencyDirs": ["node_modules"] }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeIndexOptions {
    /// Budget for each declaration's canonical key. Property facts use one less.
    pub depth_limit: u32,
    /// Resolve aliased types to their apparent type before classifying.
    pub normalize_aliases: bool,
    /// Skip ambient declaration files.
    pub skip_declaration_files: bool,
    /// Path segments marking third-party trees that are never indexed.
    pub dependency_dirs: Vec<String>,
}

impl Default for ShapeIndexOptions {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_SHAPE_DEPTH,
            normalize_aliases: true,
            skip_declaration_files: true,
            dependency_dirs: DEFAULT_DEPENDENCY_DIRS
                .iter()
                .map(|dir| (*dir).to_string())
                .collect(),
        }
    }
}

impl ShapeIndexOptions {
    pub fn validate(&self) -> Result<(), ShapeIndexError> {
        if self.depth_limit == 0 {
            return Err(ShapeIndexError::InvalidDepthLimit(self.depth_limit));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
