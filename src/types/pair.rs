//! FolderPair - One source/destination folder pairing

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single `from -> to` folder pairing.
///
/// Pairs are processed in the order they are supplied; a pair is
/// immutable once read from the CLI or a manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderPair {
    /// Folder whose files are candidates for copying
    pub from: PathBuf,

    /// Folder that receives files it does not already have
    pub to: PathBuf,
}

impl FolderPair {
    /// Create a new pair from any path-like values
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}
