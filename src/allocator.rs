//! Global memory allocator configuration.
//!
//! This module configures the global memory allocator for the application.
//! We use `mimalloc` (Microsoft's high-performance allocator) instead of the
//! system allocator to improve performance, particularly for the highly
//! concurrent workload typical of fragment compression, encryption, and
//! storage I/O.
//!
//! `mimalloc` excels in multi-threaded environments by minimizing lock
//! contention and fragmentation, which is critical for our two-tier
//! worker-pool architecture where per-fragment buffers are frequently
//! allocated and deallocated across both the CPU pool and the async I/O
//! tasks.

use mimalloc::MiMalloc;

/// The global allocator instance.
///
/// We use the default `MiMalloc` configuration. This static instance is
/// registered as the `#[global_allocator]`, replacing the standard library's
/// default system allocator.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
