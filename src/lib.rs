//! ShardVault — a fault-tolerant, content-addressed fragment storage
//! pipeline.
//!
//! An opaque byte payload is split into fixed-size fragments, each
//! compressed once and then independently AES-256-GCM encrypted under a
//! deterministically derived key for every replica, checksummed, and
//! written to one of a fixed set of storage nodes. Retrieval re-derives the
//! same keys from the payload's own checksum and the `(fragment, replica)`
//! indices, tries replicas in order until one authenticates, and
//! reassembles the original bytes even when a bounded fraction of replicas
//! has been lost or tampered with.
//!
//! The crate is organized leaf-first:
//! [`checksum`] and [`compressor`] are pure per-fragment transforms,
//! [`key_deriver`] and [`fragment_codec`] form the cryptographic framing,
//! [`placer`] and [`storage_io`] form the on-disk addressing and I/O layer,
//! [`sizer`] adapts fragment size/concurrency/batching to payload size, and
//! [`producer`]/[`consumer`] orchestrate the write and read paths
//! respectively on top of the two-tier [`scheduler`]. [`pipeline`] is the
//! public façade tying all of the above into `store`/`retrieve`.

pub mod allocator;
pub mod checksum;
pub mod compressor;
pub mod config;
pub mod consumer;
pub mod error;
pub mod fragment_codec;
pub mod key_deriver;
pub mod pipeline;
pub mod placer;
pub mod producer;
pub mod scheduler;
pub mod sizer;
pub mod storage_io;

pub use error::{FragmentError, RetrieveOutcome};
pub use pipeline::{Pipeline, dynamic_concurrency, optimal_fragment_size, payload_checksum};
