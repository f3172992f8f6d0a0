//! The crate's public API surface: `new_pipeline`, `store`, `retrieve`, and
//! the pure sizing/checksum helpers. This is the in-scope "core" replacement
//! for the out-of-scope façade that merely sequenced these calls in the
//! source lineage.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, ensure};

use crate::checksum::checksum;
use crate::consumer::Consumer;
use crate::error::RetrieveOutcome;
use crate::placer::Placer;
use crate::producer::Producer;
use crate::scheduler::Scheduler;
use crate::sizer;

/// An owned handle to one store/retrieve pipeline, bound to a fixed node
/// set, fragment size, and replication factor at construction.
pub struct Pipeline {
    placer: Arc<Placer>,
    scheduler: Arc<Scheduler>,
    payload_checksum: [u8; 32],
    fragment_size: usize,
    replication_factor: usize,
}

impl Pipeline {
    /// Builds a pipeline bound to `nodes`, `payload_checksum`, `fragment_size`,
    /// and `replication_factor`. Returns an `InvalidInput` (here, a
    /// synchronous `anyhow` error) on an empty node list, zero fragment size,
    /// or zero replication factor. Tolerates but warns when the replication
    /// factor exceeds the node count: replicas of a fragment collocate on the
    /// same node, which is valid but reduces fault tolerance.
    pub fn new(nodes: Vec<PathBuf>, payload_checksum: [u8; 32], fragment_size: usize, replication_factor: usize) -> Result<Self> {
        ensure!(!nodes.is_empty(), "invalid input: node list cannot be empty");
        ensure!(fragment_size >= 1, "invalid input: fragment size must be at least 1");
        ensure!(replication_factor >= 1, "invalid input: replication factor must be at least 1");

        if replication_factor > nodes.len() {
            tracing::warn!(replication_factor, node_count = nodes.len(), "replication factor exceeds node count; replicas will collocate");
        }

        let placer = Arc::new(Placer::new(nodes, replication_factor).context("failed to construct placer")?);
        let scheduler = Arc::new(Scheduler::new().context("failed to construct scheduler")?);

        Ok(Self { placer, scheduler, payload_checksum, fragment_size, replication_factor })
    }

    /// Stores `payload`, splitting it into fragments of this pipeline's
    /// fragment size and writing `replication_factor` independently
    /// encrypted copies of each. `max_concurrency` caps in-flight I/O for
    /// this call; batches are sized by `sizer::batch_size`.
    pub async fn store(&self, payload: &[u8], max_concurrency: usize) -> Result<()> {
        let fragment_count = sizer::fragment_count(payload.len() as u64, self.fragment_size);
        let batch_size = sizer::batch_size(fragment_count as usize).min(max_concurrency.max(1));

        let producer = Producer::new(Arc::clone(&self.placer), Arc::clone(&self.scheduler), self.payload_checksum, self.replication_factor);
        producer.store(payload, self.fragment_size, batch_size, max_concurrency).await.context("store failed")
    }

    /// Recovers `fragment_count` fragments and reassembles them in order.
    /// Returns the reassembled bytes alongside any fragment-ids that had no
    /// surviving replica; a non-empty list does not fail the call, it is the
    /// caller's responsibility to decide whether a partial payload is
    /// acceptable.
    pub async fn retrieve(&self, fragment_count: u64, max_concurrency: usize) -> Result<RetrieveOutcome> {
        let batch_size = sizer::batch_size(fragment_count as usize).min(max_concurrency.max(1));

        let consumer = Consumer::new(Arc::clone(&self.placer), Arc::clone(&self.scheduler), self.payload_checksum, self.replication_factor);
        consumer.retrieve(fragment_count, batch_size, max_concurrency).await.context("retrieve failed")
    }

    #[must_use]
    pub fn nodes(&self) -> &[PathBuf] {
        self.placer.nodes()
    }
}

/// Computes the payload-checksum `H` that identifies a payload for key
/// derivation and pipeline construction.
#[must_use]
pub fn payload_checksum(payload: &[u8]) -> [u8; 32] {
    checksum(payload)
}

/// The fragment size `S(N)` the sizer recommends for a payload of `n` bytes.
#[must_use]
pub fn optimal_fragment_size(n: u64) -> usize {
    sizer::optimal_fragment_size(n)
}

/// The concurrency cap `C(N)` the sizer recommends for a payload of `n`
/// bytes, given the host's `cpu_count`.
#[must_use]
pub fn dynamic_concurrency(n: u64, cpu_count: usize) -> usize {
    sizer::dynamic_concurrency(n, cpu_count)
}
