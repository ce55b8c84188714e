//! Errors surfaced by the solver.
//!
//! Missing information (unresolvable symbols, exhausted depth, no applicable
//! base) is modelled as `None` or an empty result, never as an error.

use crate::host::ProgramId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeIndexError {
    /// The host could not type-check the program; nothing can be indexed.
    #[error("type information is unavailable for program {program}")]
    TypeInfoUnavailable { program: ProgramId },

    #[error("depth limit must be at least 1, got {0}")]
    InvalidDepthLimit(u32),
}
