//! Flat source folder listing

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

/// One immediate entry of a source folder.
///
/// Only the leaf name and a file/non-file classification are kept; the
/// enumeration is non-recursive and carries no other metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Leaf name within the source folder
    pub file_name: OsString,

    /// True for regular files; directories, symlinks and special files
    /// are never stream-copied
    pub is_file: bool,
}

impl SourceEntry {
    /// Name for display and reporting (lossy for non-UTF-8 names)
    pub fn display_name(&self) -> String {
        self.file_name.to_string_lossy().into_owned()
    }
}

/// List the immediate entries of a source folder, sorted by name.
///
/// Sorting makes event order and reports reproducible run-to-run.
/// Entries whose type cannot be determined are classified as non-files
/// and end up skipped rather than failing the listing.
pub fn list_source_entries(from: &Path) -> io::Result<Vec<SourceEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        entries.push(SourceEntry {
            file_name: entry.file_name(),
            is_file,
        });
    }

    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}
