//! # oneway - One-Way Folder Synchronization
//!
//! Copy what's missing, never touch what's there.
//!
//! Given an ordered list of `from -> to` folder pairs, oneway copies
//! every file present in the source folder but absent (by name) in the
//! destination folder. Existing destination files are never compared,
//! updated, or deleted.

// Module declarations
pub mod commands;
pub mod config;
pub mod engine;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::{Config, ReportFormat};
pub use engine::{sync_all, CancelToken, RunReport, SyncEvent, SyncOptions};
pub use types::{FolderPair, OnewayError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
