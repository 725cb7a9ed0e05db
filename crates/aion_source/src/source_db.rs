//! Registry of the source files contributing to a design.

use crate::file_id::FileId;
use std::path::{Path, PathBuf};

/// Maps each [`FileId`] to the path it was parsed from.
///
/// The tree only stores line numbers, so the registry is what turns a span
/// into something a report or a generated name can show.
#[derive(Debug, Default)]
pub struct SourceDb {
    files: Vec<PathBuf>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source file path and returns its [`FileId`].
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(path.into());
        id
    }

    /// Returns the path of a registered file, or `None` for unknown/dummy IDs.
    pub fn path(&self, id: FileId) -> Option<&Path> {
        self.files.get(id.as_raw() as usize).map(PathBuf::as_path)
    }

    /// Returns the file name without directories or extension (`rtl/fifo.sv` → `fifo`).
    ///
    /// Unknown files yield `"unknown"` so generated names stay well-formed.
    pub fn basename_no_ext(&self, id: FileId) -> &str {
        self.path(id)
            .and_then(Path::file_stem)
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
    }

    /// Returns the number of registered files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no files are registered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_resolve() {
        let mut db = SourceDb::new();
        let id = db.add_file("rtl/fifo.sv");
        assert_eq!(db.path(id), Some(Path::new("rtl/fifo.sv")));
        assert_eq!(db.basename_no_ext(id), "fifo");
    }

    #[test]
    fn multiple_files() {
        let mut db = SourceDb::new();
        let a = db.add_file("a.v");
        let b = db.add_file("lib/b.vh");
        assert_ne!(a, b);
        assert_eq!(db.len(), 2);
        assert_eq!(db.basename_no_ext(b), "b");
    }

    #[test]
    fn unknown_file() {
        let db = SourceDb::new();
        assert!(db.is_empty());
        assert!(db.path(FileId::DUMMY).is_none());
        assert_eq!(db.basename_no_ext(FileId::DUMMY), "unknown");
    }
}
