//! Orchestrates the read path: for each fragment-id, probe replicas in
//! order, decode → decompress, and stop at the first success; reassemble
//! surviving fragments in ascending `i` and report whatever fragment-ids
//! had no surviving replica.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::compressor::Compressor;
use crate::error::{FragmentError, RetrieveOutcome};
use crate::fragment_codec;
use crate::key_deriver::derive;
use crate::placer::Placer;
use crate::scheduler::{IoGate, Scheduler};
use crate::storage_io;

pub struct Consumer {
    placer: Arc<Placer>,
    scheduler: Arc<Scheduler>,
    payload_checksum: [u8; 32],
    replication_factor: usize,
}

impl Consumer {
    #[must_use]
    pub fn new(placer: Arc<Placer>, scheduler: Arc<Scheduler>, payload_checksum: [u8; 32], replication_factor: usize) -> Self {
        Self { placer, scheduler, payload_checksum, replication_factor }
    }

    /// Recovers `fragment_count` fragments and reassembles them in order.
    /// Fragment-ids are processed in batches of `batch_size`, each fragment
    /// independently probing its replicas under an I/O gate sized to
    /// `max_concurrency` for this call.
    pub async fn retrieve(&self, fragment_count: u64, batch_size: usize, max_concurrency: usize) -> Result<RetrieveOutcome> {
        let mut recovered: Vec<(u64, Option<Vec<u8>>)> = Vec::with_capacity(fragment_count as usize);
        let batch_size = batch_size.max(1);
        let io_gate = Arc::new(IoGate::new(max_concurrency));

        let mut fragment_id = 0u64;
        while fragment_id < fragment_count {
            let end = (fragment_id + batch_size as u64).min(fragment_count);
            let mut batch = JoinSet::new();

            for id in fragment_id..end {
                let placer = Arc::clone(&self.placer);
                let scheduler = Arc::clone(&self.scheduler);
                let io_gate = Arc::clone(&io_gate);
                let payload_checksum = self.payload_checksum;
                let replication_factor = self.replication_factor;

                batch.spawn(async move { (id, Self::recover_fragment(&placer, &scheduler, &io_gate, payload_checksum, replication_factor, id).await) });
            }

            while let Some(result) = batch.join_next().await {
                let (id, plaintext) = result.context("fragment recovery task panicked")?;
                recovered.push((id, plaintext));
            }

            fragment_id = end;
        }

        recovered.sort_by_key(|(id, _)| *id);

        let mut data = Vec::new();
        let mut missing_fragments = Vec::new();
        for (id, plaintext) in recovered {
            match plaintext {
                Some(bytes) => data.extend_from_slice(&bytes),
                None => missing_fragments.push(id),
            }
        }

        info!(fragment_count, missing = missing_fragments.len(), "retrieve complete");
        Ok(RetrieveOutcome { data, missing_fragments })
    }

    /// Tries replicas `0..R` in order for one fragment-id, returning the
    /// first one that passes framing, checksum, AEAD authentication, and
    /// decompression. First success wins; a rejected replica is never
    /// retried against the same path.
    async fn recover_fragment(placer: &Arc<Placer>, scheduler: &Arc<Scheduler>, io_gate: &IoGate, payload_checksum: [u8; 32], replication_factor: usize, fragment_id: u64) -> Option<Vec<u8>> {
        for replica_id in 0..replication_factor as u64 {
            let path = placer.path(fragment_id, replica_id);

            let blob = {
                let _permit = io_gate.acquire().await;
                match storage_io::read(&path).await {
                    Ok(bytes) => bytes,
                    Err(FragmentError::NotFound) => {
                        warn!(fragment_id, replica_id, "replica not found, trying next");
                        continue;
                    }
                    Err(err) => {
                        warn!(fragment_id, replica_id, %err, "replica read failed, trying next");
                        continue;
                    }
                }
            };

            let derived = derive(&payload_checksum, fragment_id, replica_id);
            let decode_result = scheduler.spawn_cpu(move || fragment_codec::decode(&derived, &blob)).await;

            let compressed = match decode_result {
                Ok(Ok(compressed)) => compressed,
                Ok(Err(err)) => {
                    warn!(fragment_id, replica_id, %err, "replica rejected, trying next");
                    continue;
                }
                Err(err) => {
                    warn!(fragment_id, replica_id, %err, "decode task failed, trying next");
                    continue;
                }
            };

            match scheduler.spawn_cpu(move || Compressor::decompress(&compressed)).await {
                Ok(Ok(plaintext)) => return Some(plaintext),
                Ok(Err(err)) => warn!(fragment_id, replica_id, %err, "decompression failed, trying next"),
                Err(err) => warn!(fragment_id, replica_id, %err, "decompress task failed, trying next"),
            }
        }

        None
    }
}
