//! Synchronization engine
//!
//! A straight-line fold over two nested sequences: for each folder
//! pair, list the immediate source entries, copy the ones missing at
//! the destination, and accumulate per-pair and total counters.
//! Failures stay local to one entry or one pair and never abort
//! sibling work.

pub mod copy;
pub mod list;
pub mod pool;

pub use copy::CopyOutcome;
pub use list::{list_source_entries, SourceEntry};

use crate::types::{FolderPair, OnewayError};
use pool::{CopyJob, JobOutcome, TransferPool};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag a caller can trip to stop starting new copies.
///
/// The engine polls it between pairs and between entries; in-flight
/// copies settle rather than being killed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Engine tuning knobs for one `sync_all` invocation.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Worker threads for copies within a pair; 1 keeps copies
    /// sequential and blocking
    pub threads: usize,

    /// Cooperative cancellation flag
    pub cancel: CancelToken,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            cancel: CancelToken::new(),
        }
    }
}

/// Why an enumerated entry was skipped rather than copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Directory, symlink or special file; never stream-copied
    NotAFile,

    /// Destination appeared between the existence probe and the
    /// exclusive-create open
    DestinationAppeared,
}

/// Events emitted while synchronizing.
///
/// The engine never prints; the report is this event sequence plus the
/// returned [`RunReport`].
#[derive(Debug)]
pub enum SyncEvent {
    /// Processing of one pair started.
    PairStarted {
        index: usize,
        total: usize,
        from: PathBuf,
        to: PathBuf,
    },
    /// One file was fully copied to the destination.
    FileCopied { name: String, bytes: u64 },
    /// One entry was skipped (reason says why; entries already present
    /// at the destination are counted in the summary, not evented).
    EntrySkipped { name: String, reason: SkipReason },
    /// One entry failed but the pair continued.
    EntryFailed { name: String, error: OnewayError },
    /// The whole pair failed before any copy was attempted.
    PairFailed { error: OnewayError },
    /// Per-pair accounting, emitted after every copy for the pair has
    /// settled.
    PairSummary {
        from: PathBuf,
        to: PathBuf,
        entries: usize,
        copied: usize,
        failed: usize,
        bytes: u64,
    },
    /// Run-wide accounting, emitted once after the last pair.
    TotalSummary {
        copied: usize,
        failed_entries: usize,
        failed_pairs: usize,
        bytes: u64,
    },
}

/// Optional callback used to receive engine events.
pub type EventCallback = dyn Fn(&SyncEvent) + Send + Sync;

/// One entry that failed, with the error recorded against it.
#[derive(Debug)]
pub struct EntryFailure {
    pub name: String,
    pub error: OnewayError,
}

/// Accounting for one processed pair.
#[derive(Debug)]
pub struct PairReport {
    pub pair: FolderPair,
    /// Entries in the source listing
    pub entries: usize,
    /// Files copied to the destination
    pub copied: usize,
    /// Entries already present at the destination
    pub skipped_existing: usize,
    /// Entries that are not regular files
    pub skipped_non_files: usize,
    /// Entries that failed, with their errors
    pub failures: Vec<EntryFailure>,
    /// Bytes written by successful copies
    pub bytes_copied: u64,
    /// Pair-level failure, set when the pair never got to copying
    pub error: Option<OnewayError>,
}

impl PairReport {
    fn new(pair: FolderPair) -> Self {
        Self {
            pair,
            entries: 0,
            copied: 0,
            skipped_existing: 0,
            skipped_non_files: 0,
            failures: Vec::new(),
            bytes_copied: 0,
            error: None,
        }
    }

    /// Zero copies, zero failures: the pair needed nothing.
    pub fn is_in_sync(&self) -> bool {
        self.copied == 0 && self.failures.is_empty() && self.error.is_none()
    }
}

/// Accounting for one full `sync_all` invocation.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Per-pair reports, in input order
    pub pairs: Vec<PairReport>,
    /// Files copied across all pairs
    pub total_copied: usize,
    /// Bytes written across all pairs
    pub total_bytes: u64,
    /// True when the cancel token tripped before the run finished
    pub cancelled: bool,
}

impl RunReport {
    pub fn failed_entries(&self) -> usize {
        self.pairs.iter().map(|p| p.failures.len()).sum()
    }

    pub fn failed_pairs(&self) -> usize {
        self.pairs.iter().filter(|p| p.error.is_some()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed_entries() == 0 && self.failed_pairs() == 0
    }
}

/// Synchronize every pair, in input order.
///
/// For each pair the destination must already exist as a directory;
/// missing destination directories are not created. Each copy fully
/// settles (success or failure) before it is counted and before the
/// pair's summary is emitted. Counters live in the returned report,
/// so the function is re-entrant for disjoint pair sets.
pub fn sync_all(
    pairs: &[FolderPair],
    options: &SyncOptions,
    on_event: Option<&EventCallback>,
) -> RunReport {
    let mut run = RunReport::default();
    let total = pairs.len();

    for (index, pair) in pairs.iter().enumerate() {
        if options.cancel.is_cancelled() {
            run.cancelled = true;
            break;
        }

        emit(
            on_event,
            SyncEvent::PairStarted {
                index: index + 1,
                total,
                from: pair.from.clone(),
                to: pair.to.clone(),
            },
        );

        let pair_report = sync_pair(pair, options, on_event);
        run.total_copied += pair_report.copied;
        run.total_bytes += pair_report.bytes_copied;
        run.pairs.push(pair_report);
    }

    if options.cancel.is_cancelled() {
        run.cancelled = true;
    }

    emit(
        on_event,
        SyncEvent::TotalSummary {
            copied: run.total_copied,
            failed_entries: run.failed_entries(),
            failed_pairs: run.failed_pairs(),
            bytes: run.total_bytes,
        },
    );

    run
}

fn sync_pair(
    pair: &FolderPair,
    options: &SyncOptions,
    on_event: Option<&EventCallback>,
) -> PairReport {
    let mut report = PairReport::new(pair.clone());

    // The destination must already exist; nothing is created for a
    // misconfigured pair.
    match fs::metadata(&pair.to) {
        Ok(meta) if meta.is_dir() => {}
        _ => {
            let error = OnewayError::DestinationMissing {
                path: pair.to.clone(),
            };
            emit(
                on_event,
                SyncEvent::PairFailed {
                    error: error.clone_for_event(),
                },
            );
            report.error = Some(error);
            return report;
        }
    }

    let entries = match list::list_source_entries(&pair.from) {
        Ok(entries) => entries,
        Err(e) => {
            let error = OnewayError::SourceUnreadable {
                path: pair.from.clone(),
                source: e,
            };
            emit(
                on_event,
                SyncEvent::PairFailed {
                    error: error.clone_for_event(),
                },
            );
            report.error = Some(error);
            return report;
        }
    };
    report.entries = entries.len();

    let mut jobs: Vec<CopyJob> = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        if options.cancel.is_cancelled() {
            break;
        }

        let name = entry.display_name();
        if !entry.is_file {
            report.skipped_non_files += 1;
            emit(
                on_event,
                SyncEvent::EntrySkipped {
                    name,
                    reason: SkipReason::NotAFile,
                },
            );
            continue;
        }

        let dest = pair.to.join(&entry.file_name);
        match fs::symlink_metadata(&dest) {
            Ok(_) => {
                // Present by name is enough; content is never compared.
                report.skipped_existing += 1;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                jobs.push(CopyJob {
                    index,
                    name,
                    src: pair.from.join(&entry.file_name),
                    dest,
                });
            }
            Err(e) => {
                let error = OnewayError::DestinationUnprobeable {
                    path: dest,
                    source: e,
                };
                emit(
                    on_event,
                    SyncEvent::EntryFailed {
                        name: name.clone(),
                        error: error.clone_for_event(),
                    },
                );
                report.failures.push(EntryFailure { name, error });
            }
        }
    }

    if options.threads > 1 && jobs.len() > 1 {
        for outcome in run_jobs_pooled(jobs, options.threads, &options.cancel) {
            settle_outcome(outcome, &mut report, on_event);
        }
    } else {
        for job in jobs {
            if options.cancel.is_cancelled() {
                break;
            }
            let result = copy::copy_missing(&job.src, &job.dest);
            settle_outcome(
                JobOutcome {
                    index: job.index,
                    name: job.name,
                    result,
                },
                &mut report,
                on_event,
            );
        }
    }

    emit(
        on_event,
        SyncEvent::PairSummary {
            from: pair.from.clone(),
            to: pair.to.clone(),
            entries: report.entries,
            copied: report.copied,
            failed: report.failures.len(),
            bytes: report.bytes_copied,
        },
    );

    report
}

/// Fold one settled copy into the pair report and the event stream.
fn settle_outcome(outcome: JobOutcome, report: &mut PairReport, on_event: Option<&EventCallback>) {
    match outcome.result {
        Ok(CopyOutcome::Copied { bytes }) => {
            report.copied += 1;
            report.bytes_copied += bytes;
            emit(
                on_event,
                SyncEvent::FileCopied {
                    name: outcome.name,
                    bytes,
                },
            );
        }
        Ok(CopyOutcome::AlreadyPresent) => {
            report.skipped_existing += 1;
            emit(
                on_event,
                SyncEvent::EntrySkipped {
                    name: outcome.name,
                    reason: SkipReason::DestinationAppeared,
                },
            );
        }
        Err(e) => {
            let error = OnewayError::CopyFailed {
                entry: outcome.name.clone(),
                source: e,
            };
            emit(
                on_event,
                SyncEvent::EntryFailed {
                    name: outcome.name.clone(),
                    error: error.clone_for_event(),
                },
            );
            report.failures.push(EntryFailure {
                name: outcome.name,
                error,
            });
        }
    }
}

/// Run one pair's copy jobs on the transfer pool.
///
/// Outcomes come back sorted by listing index so event order stays
/// deterministic. Jobs that never settled (a worker died) are
/// reconciled into failures instead of vanishing from the counts.
fn run_jobs_pooled(jobs: Vec<CopyJob>, threads: usize, cancel: &CancelToken) -> Vec<JobOutcome> {
    let capacity = jobs.len().max(1);
    let pool = match TransferPool::new(threads, capacity) {
        Ok(pool) => pool,
        // The runtime could not start; copies still have to settle.
        Err(_) => return run_jobs_inline(jobs, cancel),
    };

    let mut enqueued: Vec<(usize, String)> = Vec::with_capacity(capacity);
    let mut refused: Vec<JobOutcome> = Vec::new();
    for job in jobs {
        if cancel.is_cancelled() {
            break;
        }
        let tag = (job.index, job.name.clone());
        match pool.enqueue(job) {
            Ok(()) => enqueued.push(tag),
            Err(e) => refused.push(JobOutcome {
                index: tag.0,
                name: tag.1,
                result: Err(e),
            }),
        }
    }

    let mut outcomes = pool.close_and_wait();
    for (index, name) in enqueued {
        if !outcomes.iter().any(|o| o.index == index) {
            outcomes.push(JobOutcome {
                index,
                name,
                result: Err(io::Error::other("copy worker terminated before settling")),
            });
        }
    }
    outcomes.extend(refused);
    outcomes.sort_by_key(|o| o.index);
    outcomes
}

fn run_jobs_inline(jobs: Vec<CopyJob>, cancel: &CancelToken) -> Vec<JobOutcome> {
    let mut outcomes = Vec::with_capacity(jobs.len());
    for job in jobs {
        if cancel.is_cancelled() {
            break;
        }
        let result = copy::copy_missing(&job.src, &job.dest);
        outcomes.push(JobOutcome {
            index: job.index,
            name: job.name,
            result,
        });
    }
    outcomes
}

fn emit(on_event: Option<&EventCallback>, event: SyncEvent) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_trips_once_for_all_clones() {
        let token = CancelToken::new();
        let clone = token.clone();

        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_pre_cancelled_run_processes_no_pairs() {
        let options = SyncOptions::default();
        options.cancel.cancel();

        let pairs = vec![FolderPair::new("/nowhere/from", "/nowhere/to")];
        let report = sync_all(&pairs, &options, None);

        assert!(report.cancelled);
        assert!(report.pairs.is_empty());
        assert_eq!(report.total_copied, 0);
    }

    #[test]
    fn test_run_report_counts_failures_across_pairs() {
        let mut run = RunReport::default();

        let mut ok_pair = PairReport::new(FolderPair::new("a", "b"));
        ok_pair.copied = 2;

        let mut bad_pair = PairReport::new(FolderPair::new("c", "d"));
        bad_pair.error = Some(OnewayError::DestinationMissing {
            path: "d".into(),
        });

        let mut flaky_pair = PairReport::new(FolderPair::new("e", "f"));
        flaky_pair.failures.push(EntryFailure {
            name: "x.txt".to_string(),
            error: OnewayError::CopyFailed {
                entry: "x.txt".to_string(),
                source: io::Error::other("boom"),
            },
        });

        run.pairs = vec![ok_pair, bad_pair, flaky_pair];

        assert_eq!(run.failed_pairs(), 1);
        assert_eq!(run.failed_entries(), 1);
        assert!(!run.is_success());
    }

    #[test]
    fn test_pair_report_in_sync_requires_no_copies_and_no_failures() {
        let mut report = PairReport::new(FolderPair::new("a", "b"));
        assert!(report.is_in_sync());

        report.copied = 1;
        assert!(!report.is_in_sync());
    }
}
