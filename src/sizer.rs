//! Pure functions mapping a payload size to fragment size, concurrency cap,
//! default replication factor, and I/O batch size.

use crate::config::{
    BATCH_FRAGMENT_THRESHOLD_HUGE, BATCH_FRAGMENT_THRESHOLD_LARGE, BATCH_SIZE_HUGE, BATCH_SIZE_LARGE, BATCH_SIZE_SMALL, DEFAULT_REPLICATION_LARGE, DEFAULT_REPLICATION_SMALL, HUGE_FRAGMENT_SIZE,
    LARGE_FRAGMENT_SIZE, LARGE_PAYLOAD_THRESHOLD, MAX_CONCURRENCY, MEDIUM_FRAGMENT_SIZE, MEDIUM_PAYLOAD_THRESHOLD, SMALL_PAYLOAD_THRESHOLD,
};

/// Chooses the fragment size `S(N)` for a payload of `n` bytes.
#[must_use]
pub fn optimal_fragment_size(n: u64) -> usize {
    if n <= SMALL_PAYLOAD_THRESHOLD {
        n.max(1) as usize
    } else if n <= MEDIUM_PAYLOAD_THRESHOLD {
        MEDIUM_FRAGMENT_SIZE
    } else if n <= LARGE_PAYLOAD_THRESHOLD {
        LARGE_FRAGMENT_SIZE
    } else {
        HUGE_FRAGMENT_SIZE
    }
}

/// Chooses the concurrency cap `C(N)` given `n` bytes and the host CPU
/// count. `base = min(50, cpu * 2)`.
#[must_use]
pub fn dynamic_concurrency(n: u64, cpu_count: usize) -> usize {
    let base = (cpu_count * 2).min(50);

    if n <= SMALL_PAYLOAD_THRESHOLD {
        (base / 4).max(5)
    } else if n <= LARGE_PAYLOAD_THRESHOLD {
        base
    } else {
        (base * 3).min(MAX_CONCURRENCY)
    }
}

/// Default replication policy: `3` above the 10 MiB boundary, `2` at or
/// below it. The core itself takes `R` as an explicit parameter; this is
/// only the recommended default for a caller that doesn't have one.
#[must_use]
pub fn default_replication_factor(n: u64) -> usize {
    if n > LARGE_PAYLOAD_THRESHOLD {
        DEFAULT_REPLICATION_LARGE
    } else {
        DEFAULT_REPLICATION_SMALL
    }
}

/// I/O submission batch size `B`, keyed on the total fragment count.
#[must_use]
pub fn batch_size(fragment_count: usize) -> usize {
    if fragment_count > BATCH_FRAGMENT_THRESHOLD_HUGE {
        BATCH_SIZE_HUGE
    } else if fragment_count > BATCH_FRAGMENT_THRESHOLD_LARGE {
        BATCH_SIZE_LARGE
    } else {
        BATCH_SIZE_SMALL
    }
}

/// Number of fragments `F = ceil(N / S)` a payload of `n` bytes splits into
/// under fragment size `s`. `N = 0` yields `F = 0` (no fragments at all).
#[must_use]
pub fn fragment_count(n: u64, s: usize) -> u64 {
    if n == 0 {
        0
    } else {
        n.div_ceil(s as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_size_boundaries() {
        assert_eq!(optimal_fragment_size(100 * 1024), 100 * 1024);
        assert_eq!(optimal_fragment_size(100 * 1024 + 1), MEDIUM_FRAGMENT_SIZE);
        assert_eq!(optimal_fragment_size(1024 * 1024), MEDIUM_FRAGMENT_SIZE);
        assert_eq!(optimal_fragment_size(1024 * 1024 + 1), LARGE_FRAGMENT_SIZE);
        assert_eq!(optimal_fragment_size(10 * 1024 * 1024), LARGE_FRAGMENT_SIZE);
        assert_eq!(optimal_fragment_size(10 * 1024 * 1024 + 1), HUGE_FRAGMENT_SIZE);
    }

    #[test]
    fn concurrency_respects_base_and_cap() {
        assert_eq!(dynamic_concurrency(1024, 8), 5.max(16 / 4));
        assert_eq!(dynamic_concurrency(5 * 1024 * 1024, 8), 16);
        assert_eq!(dynamic_concurrency(50 * 1024 * 1024, 8), 48);
        // base = min(50, cpu*2) caps concurrency*3 at 300 regardless of host size.
        assert_eq!(dynamic_concurrency(50 * 1024 * 1024, 1000), 150);
    }

    #[test]
    fn replication_default_switches_at_10_mib() {
        assert_eq!(default_replication_factor(LARGE_PAYLOAD_THRESHOLD), 2);
        assert_eq!(default_replication_factor(LARGE_PAYLOAD_THRESHOLD + 1), 3);
    }

    #[test]
    fn batch_size_thresholds() {
        assert_eq!(batch_size(10), BATCH_SIZE_SMALL);
        assert_eq!(batch_size(501), BATCH_SIZE_LARGE);
        assert_eq!(batch_size(1001), BATCH_SIZE_HUGE);
    }

    #[test]
    fn fragment_count_zero_for_empty_payload_and_ceil_division_otherwise() {
        assert_eq!(fragment_count(0, 100), 0);
        assert_eq!(fragment_count(1, 100), 1);
        assert_eq!(fragment_count(100 * 1024, optimal_fragment_size(100 * 1024)), 1);
        assert_eq!(fragment_count(1024 * 1024, optimal_fragment_size(1024 * 1024)), 21);
    }
}
