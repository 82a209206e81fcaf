//! Error types for oneway

use std::io::Error as IoError;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for oneway operations
#[derive(Debug, Error)]
pub enum OnewayError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source folder is missing, unlistable, or not a directory
    #[error("Source folder unreadable: {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// The destination folder does not exist as a directory
    #[error("Destination folder missing or not a directory: {path}")]
    DestinationMissing { path: PathBuf },

    /// The existence probe for a destination entry itself errored.
    /// Distinct from "not found", which is a normal negative result.
    #[error("Destination entry could not be probed: {path}: {source}")]
    DestinationUnprobeable {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Read or write error during the byte copy of one entry
    #[error("Copy failed for {entry}: {source}")]
    CopyFailed {
        entry: String,
        #[source]
        source: IoError,
    },
}

impl OnewayError {
    /// Check if this error fails a whole pair (as opposed to one entry)
    pub fn is_pair_level(&self) -> bool {
        matches!(
            self,
            OnewayError::SourceUnreadable { .. } | OnewayError::DestinationMissing { .. }
        )
    }

    /// Check if this error is scoped to a single source entry
    pub fn is_entry_level(&self) -> bool {
        matches!(
            self,
            OnewayError::DestinationUnprobeable { .. } | OnewayError::CopyFailed { .. }
        )
    }

    /// Short label for grouping in reports
    pub fn kind_label(&self) -> &'static str {
        match self {
            OnewayError::Io(_) => "io",
            OnewayError::Config(_) => "config",
            OnewayError::SourceUnreadable { .. } => "source_unreadable",
            OnewayError::DestinationMissing { .. } => "destination_missing",
            OnewayError::DestinationUnprobeable { .. } => "destination_unprobeable",
            OnewayError::CopyFailed { .. } => "copy_failed",
        }
    }

    /// Duplicate this error for an event payload.
    ///
    /// `std::io::Error` is not `Clone`, so the inner error is rebuilt from
    /// its kind and message.
    pub fn clone_for_event(&self) -> OnewayError {
        match self {
            OnewayError::Io(e) => OnewayError::Io(IoError::new(e.kind(), e.to_string())),
            OnewayError::Config(msg) => OnewayError::Config(msg.clone()),
            OnewayError::SourceUnreadable { path, source } => OnewayError::SourceUnreadable {
                path: path.clone(),
                source: IoError::new(source.kind(), source.to_string()),
            },
            OnewayError::DestinationMissing { path } => {
                OnewayError::DestinationMissing { path: path.clone() }
            }
            OnewayError::DestinationUnprobeable { path, source } => {
                OnewayError::DestinationUnprobeable {
                    path: path.clone(),
                    source: IoError::new(source.kind(), source.to_string()),
                }
            }
            OnewayError::CopyFailed { entry, source } => OnewayError::CopyFailed {
                entry: entry.clone(),
                source: IoError::new(source.kind(), source.to_string()),
            },
        }
    }
}
