//! Structural edits on Java trees: template synthesis, formatting of
//! synthesized code and import management.

pub mod format;
pub mod imports;
pub mod template;

pub use format::{AutoFormat, IndentFormatter};
pub use imports::{ImportEdits, add_import_if_absent, remove_import_if_unused};
pub use template::{InsertionSlot, JavaTemplate};

use crate::diff::unified_diff;
use crate::error::Result;
use std::path::PathBuf;

/// Represents a change to be applied to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub original: String,
    pub transformed: String,
}

impl FileChange {
    pub fn new(path: impl Into<PathBuf>, original: String, transformed: String) -> Self {
        Self {
            path: path.into(),
            original,
            transformed,
        }
    }

    /// Returns true if the content was modified.
    pub fn is_modified(&self) -> bool {
        self.original != self.transformed
    }

    /// Unified diff of the change, with paths shown relative to `root`.
    pub fn diff(&self, root: &std::path::Path) -> String {
        let display = self.path.strip_prefix(root).unwrap_or(&self.path);
        unified_diff(&self.original, &self.transformed, display)
    }

    /// Writes the transformed content to disk.
    pub fn apply(&self) -> Result<()> {
        if self.is_modified() {
            std::fs::write(&self.path, &self.transformed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_change_apply() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.java");
        std::fs::write(&path, "class A {}\n").unwrap();

        let change = FileChange::new(&path, "class A {}\n".into(), "class B {}\n".into());
        assert!(change.is_modified());
        change.apply().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "class B {}\n");
        assert!(change.diff(dir.path()).starts_with("--- a/A.java\n+++ b/A.java\n"));
    }

    #[test]
    fn test_unmodified_change_is_not_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.java");

        let change = FileChange::new(&path, "x".into(), "x".into());
        change.apply().unwrap();

        assert!(!path.exists());
    }
}
