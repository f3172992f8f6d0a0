//! Two-tier execution: a bounded CPU worker pool for compression, key
//! derivation, and AEAD, and an async I/O concurrency gate for blob
//! reads/writes. Mirrors the reader/executor/writer split used elsewhere in
//! this codebase, generalized from a fixed three-thread pipeline into an
//! owned handle the `Producer`/`Consumer` submit work through.

use std::sync::Arc;

use anyhow::{Context, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio::sync::{OwnedSemaphorePermit, Semaphore, oneshot};

/// Bounded CPU worker pool, sized once to the host's available parallelism
/// and shared by every `store`/`retrieve` call on a pipeline.
pub struct Scheduler {
    cpu_pool: Arc<ThreadPool>,
}

impl Scheduler {
    /// Builds a scheduler with a CPU pool sized to the host's available
    /// parallelism.
    pub fn new() -> Result<Self> {
        let workers = std::thread::available_parallelism().map(std::num::NonZeroUsize::get).unwrap_or(4);
        let cpu_pool = ThreadPoolBuilder::new().num_threads(workers).build().context("failed to build cpu worker pool")?;

        Ok(Self { cpu_pool: Arc::new(cpu_pool) })
    }

    /// Runs a pure, stateless CPU-bound closure on the worker pool and
    /// awaits its result without blocking the calling async task.
    pub async fn spawn_cpu<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.cpu_pool.spawn(move || {
            let _ = tx.send(f());
        });
        rx.await.context("cpu worker task was dropped before producing a result")
    }
}

/// An async counting gate bounding in-flight I/O tasks for one `store` or
/// `retrieve` call. Built fresh per call at the caller's `max_concurrency`,
/// since concurrency is threaded through the call rather than fixed at
/// pipeline construction.
pub struct IoGate {
    semaphore: Arc<Semaphore>,
}

impl IoGate {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { semaphore: Arc::new(Semaphore::new(capacity.max(1))) }
    }

    /// Acquires one slot. Held for the duration of one `StorageIO` read or
    /// write; dropping the permit releases the slot immediately, including
    /// on cancellation.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        self.semaphore.clone().acquire_owned().await.expect("io gate semaphore is never closed while the gate is alive")
    }
}
