//! Engine-level synchronization scenarios over real temp directories.
//!
//! These cover the core contract: copy what's missing, never touch
//! what's there, keep counters consistent, and survive per-pair and
//! per-entry failures without aborting the run.

use oneway::engine::{sync_all, SyncEvent, SyncOptions};
use oneway::{FolderPair, OnewayError};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn pair_for(src: &TempDir, dst: &TempDir) -> FolderPair {
    FolderPair::new(src.path(), dst.path())
}

#[test]
fn test_copies_all_files_missing_at_destination() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    fs::write(src.path().join("a.txt"), b"alpha").expect("write a.txt");
    fs::write(src.path().join("b.txt"), b"bravo").expect("write b.txt");

    let report = sync_all(&[pair_for(&src, &dst)], &SyncOptions::default(), None);

    assert!(report.is_success());
    assert_eq!(report.pairs[0].copied, 2);
    assert_eq!(report.total_copied, 2);
    assert_eq!(fs::read(dst.path().join("a.txt")).expect("read a.txt"), b"alpha");
    assert_eq!(fs::read(dst.path().join("b.txt")).expect("read b.txt"), b"bravo");
}

#[test]
fn test_existing_destination_file_is_never_touched() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    fs::write(src.path().join("a.txt"), b"source version, much longer").expect("write src a.txt");
    fs::write(src.path().join("b.txt"), b"bravo").expect("write src b.txt");
    fs::write(dst.path().join("a.txt"), b"old").expect("write dst a.txt");

    let report = sync_all(&[pair_for(&src, &dst)], &SyncOptions::default(), None);

    assert_eq!(report.pairs[0].copied, 1);
    assert_eq!(report.pairs[0].skipped_existing, 1);
    assert_eq!(
        fs::read(dst.path().join("a.txt")).expect("read dst a.txt"),
        b"old",
        "same-named destination file must keep its content"
    );
    assert_eq!(fs::read(dst.path().join("b.txt")).expect("read dst b.txt"), b"bravo");
}

#[test]
fn test_empty_source_leaves_destination_untouched_and_in_sync() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    fs::write(dst.path().join("x.txt"), b"keep me").expect("write dst x.txt");

    let report = sync_all(&[pair_for(&src, &dst)], &SyncOptions::default(), None);

    assert!(report.is_success());
    assert_eq!(report.pairs[0].copied, 0);
    assert!(report.pairs[0].is_in_sync());
    assert_eq!(fs::read(dst.path().join("x.txt")).expect("read dst x.txt"), b"keep me");
}

#[test]
fn test_unreadable_source_fails_pair_but_not_run() {
    let src_ok = TempDir::new().expect("create src tempdir");
    let dst_ok = TempDir::new().expect("create dst tempdir");
    let dst_other = TempDir::new().expect("create second dst tempdir");

    fs::write(src_ok.path().join("a.txt"), b"alpha").expect("write a.txt");
    fs::write(src_ok.path().join("b.txt"), b"bravo").expect("write b.txt");

    let missing_src = src_ok.path().join("no-such-folder");
    let pairs = vec![
        pair_for(&src_ok, &dst_ok),
        FolderPair::new(&missing_src, dst_other.path()),
    ];

    let report = sync_all(&pairs, &SyncOptions::default(), None);

    assert_eq!(report.pairs.len(), 2);
    assert_eq!(report.pairs[0].copied, 2);
    assert!(matches!(
        report.pairs[1].error,
        Some(OnewayError::SourceUnreadable { .. })
    ));
    assert_eq!(report.total_copied, 2, "total must reflect only the first pair");
    assert_eq!(report.failed_pairs(), 1);
}

#[test]
fn test_missing_destination_fails_pair_before_any_copy() {
    let src = TempDir::new().expect("create src tempdir");
    let dst_root = TempDir::new().expect("create dst root tempdir");

    fs::write(src.path().join("a.txt"), b"alpha").expect("write a.txt");
    let missing_dst = dst_root.path().join("never-created");

    let pairs = vec![FolderPair::new(src.path(), &missing_dst)];
    let report = sync_all(&pairs, &SyncOptions::default(), None);

    assert!(matches!(
        report.pairs[0].error,
        Some(OnewayError::DestinationMissing { .. })
    ));
    assert_eq!(report.total_copied, 0);
    assert!(
        !missing_dst.exists(),
        "a misconfigured destination must not be created"
    );
}

#[test]
fn test_destination_only_files_survive_any_source() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    fs::write(src.path().join("new.txt"), b"new").expect("write src new.txt");
    fs::write(dst.path().join("orphan.txt"), b"orphan data").expect("write dst orphan");
    fs::write(dst.path().join("other.bin"), vec![7u8; 512]).expect("write dst other");

    sync_all(&[pair_for(&src, &dst)], &SyncOptions::default(), None);

    assert_eq!(
        fs::read(dst.path().join("orphan.txt")).expect("read orphan"),
        b"orphan data"
    );
    assert_eq!(
        fs::read(dst.path().join("other.bin")).expect("read other"),
        vec![7u8; 512]
    );
}

#[test]
fn test_second_run_is_idempotent() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    fs::write(src.path().join("a.txt"), b"alpha").expect("write a.txt");
    fs::write(src.path().join("b.txt"), b"bravo").expect("write b.txt");

    let pairs = vec![pair_for(&src, &dst)];
    let first = sync_all(&pairs, &SyncOptions::default(), None);
    let second = sync_all(&pairs, &SyncOptions::default(), None);

    assert_eq!(first.total_copied, 2);
    assert_eq!(second.total_copied, 0);
    assert!(second.is_success());
    assert!(second.pairs[0].is_in_sync());
}

#[test]
fn test_total_equals_sum_of_pair_counts() {
    let src_a = TempDir::new().expect("create src tempdir");
    let src_b = TempDir::new().expect("create src tempdir");
    let dst_a = TempDir::new().expect("create dst tempdir");
    let dst_b = TempDir::new().expect("create dst tempdir");

    for i in 0..3 {
        fs::write(src_a.path().join(format!("a{i}.txt")), b"a").expect("write src_a file");
    }
    fs::write(src_b.path().join("solo.txt"), b"s").expect("write src_b file");
    fs::write(dst_b.path().join("solo.txt"), b"existing").expect("write dst_b file");

    let pairs = vec![pair_for(&src_a, &dst_a), pair_for(&src_b, &dst_b)];
    let report = sync_all(&pairs, &SyncOptions::default(), None);

    let sum: usize = report.pairs.iter().map(|p| p.copied).sum();
    assert_eq!(report.total_copied, sum);
    assert_eq!(report.total_copied, 3);
}

#[test]
fn test_subdirectories_are_skipped_not_copied() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    fs::write(src.path().join("file.txt"), b"data").expect("write file");
    fs::create_dir(src.path().join("subdir")).expect("create subdir");
    fs::write(src.path().join("subdir/inner.txt"), b"deep").expect("write nested file");

    let report = sync_all(&[pair_for(&src, &dst)], &SyncOptions::default(), None);

    assert_eq!(report.pairs[0].entries, 2);
    assert_eq!(report.pairs[0].copied, 1);
    assert_eq!(report.pairs[0].skipped_non_files, 1);
    assert!(dst.path().join("file.txt").exists());
    assert!(
        !dst.path().join("subdir").exists(),
        "directories must never be stream-copied"
    );
}

#[test]
fn test_parallel_copies_match_sequential_accounting() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    let mut expected_bytes = 0u64;
    for i in 0..24 {
        let payload = format!("payload for file number {i}");
        expected_bytes += payload.len() as u64;
        fs::write(src.path().join(format!("file-{i:02}.txt")), payload).expect("write source file");
    }

    let options = SyncOptions {
        threads: 4,
        ..SyncOptions::default()
    };
    let report = sync_all(&[pair_for(&src, &dst)], &options, None);

    assert!(report.is_success());
    assert_eq!(report.pairs[0].copied, 24);
    assert_eq!(report.pairs[0].bytes_copied, expected_bytes);
    for i in 0..24 {
        assert!(dst.path().join(format!("file-{i:02}.txt")).exists());
    }
}

#[test]
fn test_pair_summary_reflects_only_settled_copies() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    for i in 0..12 {
        fs::write(src.path().join(format!("f{i:02}.txt")), b"x").expect("write source file");
    }

    let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let events_ref = Arc::clone(&events);
    let callback = move |event: &SyncEvent| {
        let label = match event {
            SyncEvent::PairStarted { .. } => "pair_started".to_string(),
            SyncEvent::FileCopied { .. } => "file_copied".to_string(),
            SyncEvent::EntrySkipped { .. } => "entry_skipped".to_string(),
            SyncEvent::EntryFailed { .. } => "entry_failed".to_string(),
            SyncEvent::PairFailed { .. } => "pair_failed".to_string(),
            SyncEvent::PairSummary { copied, .. } => format!("pair_summary:{copied}"),
            SyncEvent::TotalSummary { .. } => "total_summary".to_string(),
        };
        events_ref.lock().expect("lock events").push(label);
    };

    let options = SyncOptions {
        threads: 4,
        ..SyncOptions::default()
    };
    sync_all(&[pair_for(&src, &dst)], &options, Some(&callback));

    let snapshot = events.lock().expect("lock events snapshot").clone();
    let summary_pos = snapshot
        .iter()
        .position(|l| l.starts_with("pair_summary:"))
        .expect("pair summary emitted");

    let copied_before_summary = snapshot[..summary_pos]
        .iter()
        .filter(|l| l.as_str() == "file_copied")
        .count();
    assert_eq!(
        snapshot[summary_pos], "pair_summary:12",
        "summary must count every settled copy"
    );
    assert_eq!(
        copied_before_summary, 12,
        "every copy must settle before the pair summary"
    );
}

#[test]
fn test_event_sequence_for_single_copy() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");
    fs::write(src.path().join("only.txt"), b"only").expect("write source file");

    let events: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    let events_ref = Arc::clone(&events);
    let callback = move |event: &SyncEvent| {
        let label = match event {
            SyncEvent::PairStarted { .. } => "pair_started",
            SyncEvent::FileCopied { .. } => "file_copied",
            SyncEvent::EntrySkipped { .. } => "entry_skipped",
            SyncEvent::EntryFailed { .. } => "entry_failed",
            SyncEvent::PairFailed { .. } => "pair_failed",
            SyncEvent::PairSummary { .. } => "pair_summary",
            SyncEvent::TotalSummary { .. } => "total_summary",
        };
        events_ref.lock().expect("lock events").push(label);
    };

    sync_all(
        &[pair_for(&src, &dst)],
        &SyncOptions::default(),
        Some(&callback),
    );

    let snapshot = events.lock().expect("lock events snapshot").clone();
    assert_eq!(
        snapshot,
        vec!["pair_started", "file_copied", "pair_summary", "total_summary"]
    );
}

#[test]
fn test_cancellation_stops_new_copies_but_keeps_settled_work() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    fs::write(src.path().join("aaa.txt"), b"first").expect("write aaa");
    fs::write(src.path().join("bbb.txt"), b"second").expect("write bbb");
    fs::write(src.path().join("ccc.txt"), b"third").expect("write ccc");

    let options = SyncOptions::default();
    let token = options.cancel.clone();
    let callback = move |event: &SyncEvent| {
        if matches!(event, SyncEvent::FileCopied { .. }) {
            token.cancel();
        }
    };

    let report = sync_all(&[pair_for(&src, &dst)], &options, Some(&callback));

    assert!(report.cancelled);
    assert_eq!(report.pairs[0].copied, 1);
    assert!(dst.path().join("aaa.txt").exists(), "first copy settles");
    assert!(
        !dst.path().join("bbb.txt").exists(),
        "no new copy starts after cancellation"
    );
    assert!(!dst.path().join("ccc.txt").exists());
}

#[test]
fn test_failed_entry_does_not_stop_remaining_entries() {
    let src = TempDir::new().expect("create src tempdir");
    let dst = TempDir::new().expect("create dst tempdir");

    fs::write(src.path().join("aaa.txt"), b"first").expect("write aaa");
    fs::write(src.path().join("bbb.txt"), b"second").expect("write bbb");
    fs::write(src.path().join("zzz.txt"), b"third").expect("write zzz");

    // Removing a source file after the listing makes its copy fail
    // while the siblings still go through. Entries copy in name order,
    // so yanking bbb right after aaa lands hits it before its copy.
    let options = SyncOptions::default();
    let src_path = src.path().to_path_buf();
    let callback = move |event: &SyncEvent| {
        if let SyncEvent::FileCopied { name, .. } = event {
            if name == "aaa.txt" {
                fs::remove_file(src_path.join("bbb.txt")).expect("remove bbb mid-run");
            }
        }
    };

    let report = sync_all(&[pair_for(&src, &dst)], &options, Some(&callback));

    assert_eq!(report.pairs[0].copied, 2);
    assert_eq!(report.pairs[0].failures.len(), 1);
    assert_eq!(report.pairs[0].failures[0].name, "bbb.txt");
    assert!(matches!(
        report.pairs[0].failures[0].error,
        OnewayError::CopyFailed { .. }
    ));
    assert!(dst.path().join("aaa.txt").exists());
    assert!(dst.path().join("zzz.txt").exists());
    assert!(!report.is_success());
}
