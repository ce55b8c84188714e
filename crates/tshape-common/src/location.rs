//! Declaration locations.
//!
//! A [`DeclarationLocation`] is a file path plus a position inside that file.
//! Its `Ord` implementation is the *declaration order* used everywhere a
//! single "earliest" declaration has to be chosen: file path ascending
//! (byte-wise), then position ascending.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Where a declaration lives.
///
/// Field order matters: the derived `Ord` compares `file` before `position`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclarationLocation {
    pub file: Arc<str>,
    pub position: u32,
}

impl DeclarationLocation {
    pub fn new(file: impl Into<Arc<str>>, position: u32) -> Self {
        Self {
            file: file.into(),
            position,
        }
    }
}

impl fmt::Display for DeclarationLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_file_then_position() {
        let mut locations = vec![
            DeclarationLocation::new("File2", 5),
            DeclarationLocation::new("File1", 50),
            DeclarationLocation::new("File1", 10),
        ];
        locations.sort();

        let rendered: Vec<String> = locations.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["File1:10", "File1:50", "File2:5"]);
    }

    #[test]
    fn test_file_comparison_is_bytewise() {
        // Uppercase sorts before lowercase in byte order.
        assert!(DeclarationLocation::new("B.ts", 0) < DeclarationLocation::new("a.ts", 0));
        assert!(DeclarationLocation::new("src/a.ts", 99) < DeclarationLocation::new("src/b.ts", 1));
    }

    #[test]
    fn test_serializes_as_plain_record() {
        let location = DeclarationLocation::new("src/user.ts", 42);
        let json = serde_json::to_string(&location).expect("location serializes");
        assert_eq!(json, r#"{"file":"src/user.ts","position":42}"#);
    }
}
