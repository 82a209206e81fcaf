//! Event stream rendering
//!
//! The engine never prints; these reporters are passive sinks over its
//! event sequence. The text rendering keeps the classic shape: a
//! `from > to` header per pair, one `Copying <name>` line per copied
//! file, a per-pair count (or an "in sync" line), and a final total.

use crate::engine::{SkipReason, SyncEvent};
use chrono::Utc;
use console::style;
use indicatif::HumanBytes;
use serde_json::json;

const HEADER_RULE_WIDTH: usize = 64;

/// Styled console rendering of the sync event stream.
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Render one event to stdout/stderr.
    pub fn render(&self, event: &SyncEvent) {
        match event {
            SyncEvent::PairStarted { from, to, .. } => {
                println!(
                    "{} > {}",
                    style(from.display()).bold(),
                    style(to.display()).bold()
                );
                println!("{}", style("=".repeat(HEADER_RULE_WIDTH)).dim());
            }
            SyncEvent::FileCopied { name, .. } => {
                if !self.quiet {
                    println!("Copying {}", name);
                }
            }
            SyncEvent::EntrySkipped { name, reason } => {
                if !self.quiet {
                    println!("{}", style(format_skip_line(name, *reason)).dim());
                }
            }
            SyncEvent::EntryFailed { name, error } => {
                eprintln!("{}", style(format!("ERROR {}: {}", name, error)).red());
            }
            SyncEvent::PairFailed { error } => {
                eprintln!("{}", style(format!("ERROR {}", error)).red());
            }
            SyncEvent::PairSummary {
                copied,
                failed,
                bytes,
                ..
            } => {
                if *copied > 0 || *failed > 0 {
                    println!("{}", style("-".repeat(HEADER_RULE_WIDTH)).dim());
                }
                println!("{}\n", format_pair_summary(*copied, *failed, *bytes));
            }
            SyncEvent::TotalSummary {
                copied,
                failed_entries,
                failed_pairs,
                bytes,
            } => {
                println!("{}", style("=".repeat(HEADER_RULE_WIDTH)).dim());
                println!(
                    "{}",
                    format_total_summary(*copied, *failed_entries, *failed_pairs, *bytes)
                );
            }
        }
    }
}

fn format_skip_line(name: &str, reason: SkipReason) -> String {
    match reason {
        SkipReason::NotAFile => format!("Skipping {} (not a regular file)", name),
        SkipReason::DestinationAppeared => {
            format!("Skipping {} (appeared at destination)", name)
        }
    }
}

fn format_pair_summary(copied: usize, failed: usize, bytes: u64) -> String {
    if copied == 0 && failed == 0 {
        return "Folders are in sync. No files copied.".to_string();
    }

    let mut line = format!("Files copied {} ({})", copied, HumanBytes(bytes));
    if failed > 0 {
        line.push_str(&format!(", {} failed", failed));
    }
    line
}

fn format_total_summary(
    copied: usize,
    failed_entries: usize,
    failed_pairs: usize,
    bytes: u64,
) -> String {
    let mut line = format!("Total files copied: {} ({})", copied, HumanBytes(bytes));
    if failed_entries > 0 || failed_pairs > 0 {
        line.push_str(&format!(
            "\nFailures: {} entries, {} pairs",
            failed_entries, failed_pairs
        ));
    }
    line
}

/// JSON-lines rendering: one timestamped object per event.
#[derive(Default)]
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    /// Render one event as a JSON line on stdout.
    pub fn render(&self, event: &SyncEvent) {
        let mut record = event_payload(event);
        if let serde_json::Value::Object(ref mut map) = record {
            map.insert("ts".to_string(), json!(Utc::now()));
        }
        println!("{}", record);
    }
}

fn event_payload(event: &SyncEvent) -> serde_json::Value {
    match event {
        SyncEvent::PairStarted {
            index,
            total,
            from,
            to,
        } => json!({
            "event": "pair_started",
            "index": index,
            "total": total,
            "from": from.display().to_string(),
            "to": to.display().to_string(),
        }),
        SyncEvent::FileCopied { name, bytes } => json!({
            "event": "file_copied",
            "name": name,
            "bytes": bytes,
        }),
        SyncEvent::EntrySkipped { name, reason } => json!({
            "event": "entry_skipped",
            "name": name,
            "reason": skip_reason_label(*reason),
        }),
        SyncEvent::EntryFailed { name, error } => json!({
            "event": "entry_failed",
            "name": name,
            "kind": error.kind_label(),
            "error": error.to_string(),
        }),
        SyncEvent::PairFailed { error } => json!({
            "event": "pair_failed",
            "kind": error.kind_label(),
            "error": error.to_string(),
        }),
        SyncEvent::PairSummary {
            from,
            to,
            entries,
            copied,
            failed,
            bytes,
        } => json!({
            "event": "pair_summary",
            "from": from.display().to_string(),
            "to": to.display().to_string(),
            "entries": entries,
            "copied": copied,
            "failed": failed,
            "bytes": bytes,
        }),
        SyncEvent::TotalSummary {
            copied,
            failed_entries,
            failed_pairs,
            bytes,
        } => json!({
            "event": "total_summary",
            "copied": copied,
            "failed_entries": failed_entries,
            "failed_pairs": failed_pairs,
            "bytes": bytes,
        }),
    }
}

fn skip_reason_label(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NotAFile => "not_a_file",
        SkipReason::DestinationAppeared => "destination_appeared",
    }
}
