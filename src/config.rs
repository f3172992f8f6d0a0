//! Pipeline configuration and cryptographic constants.
//!
//! This module defines the core constants used throughout the pipeline,
//! including cryptographic parameters, framing sizes, and the adaptive
//! sizing tables that the `Sizer` component consults. These constants are
//! the single source of truth for the on-disk blob layout.

/// PBKDF2-HMAC-SHA256 iteration count used by `KeyDeriver`.
///
/// 100,000 rounds. Unlike a password KDF, this derivation's input (the
/// payload checksum) is not secret, so the iteration count exists to keep
/// derivation cost bounded and uniform rather than to resist brute force.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of the derived AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Length of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Length of the AES-GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Length of a SHA-256 digest in bytes. Used both for the payload checksum
/// and the per-blob ciphertext checksum.
pub const CHECKSUM_SIZE: usize = 32;

/// Total trailer size appended after ciphertext in a stored blob:
/// `tag (16) ‖ checksum (32)`.
pub const TRAILER_SIZE: usize = TAG_SIZE + CHECKSUM_SIZE;

/// Fragment size thresholds for `Sizer::optimal_fragment_size`, in bytes.
pub const SMALL_PAYLOAD_THRESHOLD: u64 = 100 * 1024;
pub const MEDIUM_PAYLOAD_THRESHOLD: u64 = 1024 * 1024;
pub const LARGE_PAYLOAD_THRESHOLD: u64 = 10 * 1024 * 1024;

pub const MEDIUM_FRAGMENT_SIZE: usize = 50 * 1024;
pub const LARGE_FRAGMENT_SIZE: usize = 100 * 1024;
pub const HUGE_FRAGMENT_SIZE: usize = 200 * 1024;

/// Upper bound on the concurrency cap regardless of host CPU count.
pub const MAX_CONCURRENCY: usize = 300;

/// Default replication factor below/above the 10 MiB boundary; the core
/// accepts `R` as an explicit parameter, this is only the policy default an
/// embedder may choose to apply.
pub const DEFAULT_REPLICATION_SMALL: usize = 2;
pub const DEFAULT_REPLICATION_LARGE: usize = 3;

/// Batch size thresholds for `Sizer::batch_size`.
pub const BATCH_SIZE_HUGE: usize = 50;
pub const BATCH_SIZE_LARGE: usize = 25;
pub const BATCH_SIZE_SMALL: usize = 10;

/// Fragment-count thresholds the batch size table is keyed on.
pub const BATCH_FRAGMENT_THRESHOLD_HUGE: usize = 1000;
pub const BATCH_FRAGMENT_THRESHOLD_LARGE: usize = 500;

/// Bound on in-flight CPU-pool work items buffered in the scheduler's
/// task/result channels, as a multiple of the worker count.
pub const CPU_CHANNEL_FACTOR: usize = 2;
