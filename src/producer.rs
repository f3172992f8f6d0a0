//! Orchestrates the write path: split → compress once per fragment →
//! encrypt once per replica (CPU tier) → place and write (I/O tier),
//! submitted in waves of a fixed batch size.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::compressor::Compressor;
use crate::config::SMALL_PAYLOAD_THRESHOLD;
use crate::key_deriver::derive;
use crate::placer::Placer;
use crate::scheduler::{IoGate, Scheduler};
use crate::{fragment_codec, storage_io};

pub struct Producer {
    placer: Arc<Placer>,
    scheduler: Arc<Scheduler>,
    compressor: Compressor,
    payload_checksum: [u8; 32],
    replication_factor: usize,
}

impl Producer {
    #[must_use]
    pub fn new(placer: Arc<Placer>, scheduler: Arc<Scheduler>, payload_checksum: [u8; 32], replication_factor: usize) -> Self {
        Self { placer, scheduler, compressor: Compressor::new(), payload_checksum, replication_factor }
    }

    /// Splits `payload` into fragments of `fragment_size` bytes (the last
    /// fragment may be shorter).
    #[must_use]
    pub fn split_fragments(payload: &[u8], fragment_size: usize) -> Vec<Vec<u8>> {
        if payload.is_empty() {
            return Vec::new();
        }
        payload.chunks(fragment_size.max(1)).map(<[u8]>::to_vec).collect()
    }

    /// Stores `payload`: split, compress, encrypt per replica, and write
    /// every `(fragment-id, replica-id)` blob to its placed path.
    /// `max_concurrency` bounds in-flight writes for this call.
    pub async fn store(&self, payload: &[u8], fragment_size: usize, batch_size: usize, max_concurrency: usize) -> Result<()> {
        let fragments = Self::split_fragments(payload, fragment_size);
        let total_fragments = fragments.len();
        let inline_fast_path = fragments.len() == 1 && payload.len() as u64 <= SMALL_PAYLOAD_THRESHOLD;
        let io_gate = Arc::new(IoGate::new(max_concurrency));

        let mut pending = Vec::with_capacity(batch_size.max(1));

        for (index, fragment) in fragments.into_iter().enumerate() {
            let fragment_id = index as u64;

            let compressed: Arc<Vec<u8>> = if inline_fast_path {
                Arc::new(self.compressor.compress(&fragment)?)
            } else {
                let compressor = self.compressor;
                Arc::new(self.scheduler.spawn_cpu(move || compressor.compress(&fragment)).await??)
            };

            for replica_id in 0..self.replication_factor as u64 {
                let derived = derive(&self.payload_checksum, fragment_id, replica_id);
                let blob = if inline_fast_path {
                    fragment_codec::encode(&derived, &compressed)?
                } else {
                    let compressed = Arc::clone(&compressed);
                    self.scheduler.spawn_cpu(move || fragment_codec::encode(&derived, &compressed)).await??
                };

                debug!(fragment_id, replica_id, bytes = blob.len(), "fragment replica encoded");
                pending.push((fragment_id, replica_id, blob));

                if pending.len() >= batch_size {
                    self.flush_batch(&mut pending, &io_gate).await?;
                }
            }
        }

        self.flush_batch(&mut pending, &io_gate).await?;
        info!(total_fragments, replication_factor = self.replication_factor, "store complete");
        Ok(())
    }

    /// Submits one wave of writes under the I/O concurrency gate and waits
    /// for all of them to resolve before returning.
    async fn flush_batch(&self, pending: &mut Vec<(u64, u64, Vec<u8>)>, io_gate: &Arc<IoGate>) -> Result<()> {
        let mut writes = JoinSet::new();

        for (fragment_id, replica_id, blob) in pending.drain(..) {
            let path = self.placer.path(fragment_id, replica_id);
            let io_gate = Arc::clone(io_gate);

            writes.spawn(async move {
                let _permit = io_gate.acquire().await;
                storage_io::write(&path, &blob).await
            });
        }

        while let Some(result) = writes.join_next().await {
            result.context("write task panicked")?.map_err(|e| anyhow::anyhow!("fragment write failed: {e}"))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::checksum;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn producer(nodes: Vec<PathBuf>, h: [u8; 32], r: usize) -> Producer {
        let placer = Arc::new(Placer::new(nodes, r).unwrap());
        let scheduler = Arc::new(Scheduler::new().unwrap());
        Producer::new(placer, scheduler, h, r)
    }

    #[test]
    fn splits_into_expected_chunk_sizes() {
        let payload = vec![0u8; 250];
        let fragments = Producer::split_fragments(&payload, 100);
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].len(), 100);
        assert_eq!(fragments[1].len(), 100);
        assert_eq!(fragments[2].len(), 50);
    }

    #[test]
    fn split_empty_payload_yields_no_fragments() {
        assert!(Producer::split_fragments(&[], 100).is_empty());
    }

    #[tokio::test]
    async fn store_writes_every_replica_blob() {
        let dir = tempdir().unwrap();
        let nodes = vec![dir.path().join("n0"), dir.path().join("n1"), dir.path().join("n2")];
        let payload = b"hello fragment world".to_vec();
        let h = checksum(&payload);

        let producer = producer(nodes.clone(), h, 2);
        producer.store(&payload, 8, 10, 10).await.unwrap();

        let fragments = Producer::split_fragments(&payload, 8).len() as u64;
        let placer = Placer::new(nodes, 2).unwrap();
        for i in 0..fragments {
            for r in 0..2u64 {
                assert!(placer.path(i, r).exists());
            }
        }
    }
}
