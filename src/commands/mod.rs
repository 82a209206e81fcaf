//! User-facing commands

pub mod sync;
