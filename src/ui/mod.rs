//! Report rendering

pub mod reporter;

pub use reporter::{ConsoleReporter, JsonReporter};
