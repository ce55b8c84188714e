//! Canonical keys.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;
use tshape_common::limits::DEPTH_LIMIT_SENTINEL;

/// Deterministic string fingerprint of a type's structural shape.
///
/// Two types with equal keys are treated as structurally identical. Keys are
/// cheap to clone and hash the same way as the `str` they wrap, so maps keyed
/// by `CanonicalKey` can be queried with a plain `&str`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalKey(Arc<str>);

impl CanonicalKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Key emitted when the depth budget is exhausted.
    pub fn depth_limit() -> Self {
        Self::new(DEPTH_LIMIT_SENTINEL)
    }

    pub fn is_depth_limit(&self) -> bool {
        &*self.0 == DEPTH_LIMIT_SENTINEL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CanonicalKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl From<&str> for CanonicalKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}
