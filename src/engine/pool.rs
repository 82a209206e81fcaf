//! Concurrent transfer pool for copies within one folder pair.
//!
//! This module provides a dispatcher + worker inbox design:
//! - single-consumer upstream `mpsc::Receiver` (dispatcher)
//! - per-worker `mpsc` inbox channels
//! - explicit sender drop on shutdown before awaiting workers
//!
//! The pool is closed and joined before the owning pair's summary is
//! computed, so no copy is still in flight when the summary is emitted.

use crate::engine::copy::{self, CopyOutcome};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Copy work item accepted by the transfer pool.
#[derive(Debug, Clone)]
pub struct CopyJob {
    /// Position in the pair's sorted listing, used to restore
    /// deterministic ordering after the join
    pub index: usize,
    /// Display name of the entry
    pub name: String,
    /// Full source path
    pub src: PathBuf,
    /// Full destination path
    pub dest: PathBuf,
}

/// Settled result of one job.
#[derive(Debug)]
pub struct JobOutcome {
    pub index: usize,
    pub name: String,
    pub result: io::Result<CopyOutcome>,
}

/// Bounded worker pool that copies files for a single pair.
pub struct TransferPool {
    runtime: Runtime,
    enqueue_tx: Option<mpsc::Sender<CopyJob>>,
    dispatcher_handle: Option<JoinHandle<()>>,
    worker_handles: Vec<JoinHandle<()>>,
    outcomes: Arc<Mutex<Vec<JobOutcome>>>,
}

impl TransferPool {
    /// Create a dispatcher + worker pool with bounded channels.
    pub fn new(worker_count: usize, queue_capacity: usize) -> io::Result<Self> {
        let workers = worker_count.max(1);
        let capacity = queue_capacity.max(1);
        // One extra thread keeps the dispatcher runnable while every
        // worker is blocked on file I/O.
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers + 1)
            .enable_all()
            .build()?;

        let outcomes: Arc<Mutex<Vec<JobOutcome>>> = Arc::new(Mutex::new(Vec::new()));
        let handle = runtime.handle().clone();

        let (enqueue_tx, enqueue_rx) = mpsc::channel::<CopyJob>(capacity);

        let mut worker_txs = Vec::with_capacity(workers);
        let mut worker_handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let (worker_tx, worker_rx) = mpsc::channel::<CopyJob>(capacity);
            worker_txs.push(worker_tx);
            worker_handles.push(handle.spawn(worker_loop(worker_rx, Arc::clone(&outcomes))));
        }

        let dispatcher_handle = handle.spawn(dispatcher_loop(enqueue_rx, worker_txs));

        Ok(Self {
            runtime,
            enqueue_tx: Some(enqueue_tx),
            dispatcher_handle: Some(dispatcher_handle),
            worker_handles,
            outcomes,
        })
    }

    /// Enqueue a job into the upstream dispatcher queue.
    pub fn enqueue(&self, job: CopyJob) -> io::Result<()> {
        let sender = self
            .enqueue_tx
            .as_ref()
            .ok_or_else(|| io::Error::other("transfer pool queue is already closed"))?;

        self.runtime.block_on(async {
            sender
                .send(job)
                .await
                .map_err(|_| io::Error::other("transfer pool queue receiver is closed"))
        })
    }

    /// Close queue input, wait for dispatcher/workers to exit, and
    /// return every settled outcome.
    ///
    /// Join failures are not propagated: the outcome list is the source
    /// of truth, and the caller reconciles jobs that never settled.
    pub fn close_and_wait(mut self) -> Vec<JobOutcome> {
        self.enqueue_tx.take();

        let dispatcher = self.dispatcher_handle.take();
        let workers = std::mem::take(&mut self.worker_handles);
        let outcomes = Arc::clone(&self.outcomes);

        self.runtime.block_on(async move {
            if let Some(handle) = dispatcher {
                let _ = handle.await;
            }
            for handle in workers {
                let _ = handle.await;
            }
            std::mem::take(&mut *outcomes.lock().await)
        })
    }
}

async fn dispatcher_loop(
    mut enqueue_rx: mpsc::Receiver<CopyJob>,
    worker_txs: Vec<mpsc::Sender<CopyJob>>,
) {
    let mut next_worker = 0usize;
    let worker_len = worker_txs.len();

    while let Some(job) = enqueue_rx.recv().await {
        if worker_len == 0 {
            break;
        }

        let target = next_worker % worker_len;
        if worker_txs[target].send(job).await.is_ok() {
            next_worker = (next_worker + 1) % worker_len;
        }
    }
    // worker_txs are dropped here, which closes worker inboxes.
}

async fn worker_loop(mut worker_rx: mpsc::Receiver<CopyJob>, outcomes: Arc<Mutex<Vec<JobOutcome>>>) {
    while let Some(job) = worker_rx.recv().await {
        let result = copy::copy_missing(&job.src, &job.dest);

        let mut guard = outcomes.lock().await;
        guard.push(JobOutcome {
            index: job.index,
            name: job.name,
            result,
        });
    }
}
