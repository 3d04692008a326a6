//! Time-bucketed trailing volume.
//!
//! A ring of fixed-width buckets covering the trailing window. Recording at
//! time `t` first expires every bucket that fell out of `(t - window, t]`,
//! so `total()` is the volume of the window ending at the newest recorded
//! timestamp.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Width of one bucket in seconds.
pub const BUCKET_SECS: u64 = 3_600;
/// Number of buckets in the window (24 one-hour buckets).
pub const BUCKET_COUNT: usize = 24;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Bucket {
    /// Start of the bucket, aligned to `BUCKET_SECS`
    start: u64,
    volume: U256,
}

/// Trailing 24h volume accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingVolume {
    buckets: Vec<Bucket>,
    /// Start of the newest bucket that received volume
    head: Option<u64>,
}

impl Default for TrailingVolume {
    fn default() -> Self {
        Self {
            buckets: vec![Bucket::default(); BUCKET_COUNT],
            head: None,
        }
    }
}

impl TrailingVolume {
    pub fn new() -> Self {
        Self::default()
    }

    const fn bucket_start(timestamp: u64) -> u64 {
        timestamp - timestamp % BUCKET_SECS
    }

    const fn slot(start: u64) -> usize {
        ((start / BUCKET_SECS) % BUCKET_COUNT as u64) as usize
    }

    const fn window_secs() -> u64 {
        BUCKET_SECS * BUCKET_COUNT as u64
    }

    /// Record `amount` at `timestamp`.
    ///
    /// Amounts older than the window relative to the newest bucket are dropped.
    pub fn record(&mut self, timestamp: u64, amount: U256) {
        let start = Self::bucket_start(timestamp);

        if let Some(head) = self.head {
            if start.saturating_add(Self::window_secs()) <= head {
                return;
            }
        }

        if self.head.is_none_or(|head| start > head) {
            self.head = Some(start);
        }

        let slot = Self::slot(start);
        let bucket = &mut self.buckets[slot];
        if bucket.start != start {
            *bucket = Bucket {
                start,
                volume: U256::ZERO,
            };
        }
        bucket.volume = bucket.volume.saturating_add(amount);
    }

    /// Volume of the window ending at the newest recorded bucket.
    pub fn total(&self) -> U256 {
        let Some(head) = self.head else {
            return U256::ZERO;
        };

        self.buckets
            .iter()
            .filter(|b| b.start.saturating_add(Self::window_secs()) > head && b.start <= head)
            .fold(U256::ZERO, |acc, b| acc.saturating_add(b.volume))
    }

    /// Volume of the window ending at `now`, ignoring buckets that have aged
    /// out since the last recording.
    pub fn total_at(&self, now: u64) -> U256 {
        let now = Self::bucket_start(now);
        self.buckets
            .iter()
            .filter(|b| b.start.saturating_add(Self::window_secs()) > now && b.start <= now)
            .fold(U256::ZERO, |acc, b| acc.saturating_add(b.volume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;

    #[test]
    fn test_empty_window() {
        let window = TrailingVolume::new();
        assert_eq!(window.total(), U256::ZERO);
    }

    #[test]
    fn test_accumulates_within_window() {
        let mut window = TrailingVolume::new();
        window.record(10 * DAY, U256::from(100));
        window.record(10 * DAY + 60, U256::from(50));
        window.record(10 * DAY + 5 * BUCKET_SECS, U256::from(25));
        assert_eq!(window.total(), U256::from(175));
    }

    #[test]
    fn test_old_buckets_expire() {
        let mut window = TrailingVolume::new();
        window.record(10 * DAY, U256::from(100));
        window.record(10 * DAY + 2 * BUCKET_SECS, U256::from(10));
        window.record(11 * DAY, U256::from(1));

        // The first bucket is exactly one window old and has dropped out.
        assert_eq!(window.total(), U256::from(11));
    }

    #[test]
    fn test_slot_reuse_resets_bucket() {
        let mut window = TrailingVolume::new();
        window.record(10 * DAY, U256::from(100));
        window.record(12 * DAY, U256::from(7));
        assert_eq!(window.total(), U256::from(7));
    }

    #[test]
    fn test_stale_event_ignored() {
        let mut window = TrailingVolume::new();
        window.record(10 * DAY, U256::from(5));
        window.record(8 * DAY, U256::from(1_000));
        assert_eq!(window.total(), U256::from(5));
    }

    #[test]
    fn test_late_event_within_window_counts() {
        let mut window = TrailingVolume::new();
        window.record(10 * DAY + 3 * BUCKET_SECS, U256::from(5));
        window.record(10 * DAY, U256::from(6));
        assert_eq!(window.total(), U256::from(11));
    }

    #[test]
    fn test_total_at_decays_without_new_volume() {
        let mut window = TrailingVolume::new();
        window.record(10 * DAY, U256::from(5));
        assert_eq!(window.total_at(10 * DAY + BUCKET_SECS), U256::from(5));
        assert_eq!(window.total_at(11 * DAY), U256::ZERO);
    }
}
