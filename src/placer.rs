//! Deterministic mapping of `(fragment-id, replica-id)` to a node directory
//! and file name. Stateless; grounded on the same round-robin `index % len`
//! placement the original routing module used, generalized from a single
//! node index to replica-aware placement.

use std::path::PathBuf;

use anyhow::{Result, ensure};

pub struct Placer {
    nodes: Vec<PathBuf>,
    replication_factor: usize,
}

impl Placer {
    pub fn new(nodes: Vec<PathBuf>, replication_factor: usize) -> Result<Self> {
        ensure!(!nodes.is_empty(), "node list cannot be empty");
        ensure!(replication_factor >= 1, "replication factor must be at least 1");
        Ok(Self { nodes, replication_factor })
    }

    #[must_use]
    pub fn node_index(&self, fragment_id: u64, replica_id: u64) -> usize {
        let r = self.replication_factor as u64;
        ((fragment_id * r + replica_id) % self.nodes.len() as u64) as usize
    }

    /// Full path for a fragment replica's stored blob.
    #[must_use]
    pub fn path(&self, fragment_id: u64, replica_id: u64) -> PathBuf {
        let node = &self.nodes[self.node_index(fragment_id, replica_id)];
        node.join(format!("fragment_{fragment_id}_replica_{replica_id}"))
    }

    #[must_use]
    pub fn nodes(&self) -> &[PathBuf] {
        &self.nodes
    }
}
