//! Fixed one-second bucket rate policy

use super::{RatePolicy, Reading, CHARS_PER_WORD};
use std::time::{Duration, Instant};

/// Counts keystrokes per second and reports the raw rate
///
/// Jumpier than [`RollingWindow`](super::RollingWindow) and always one second
/// behind, but needs no history.
#[derive(Debug, Default)]
pub struct SecondBucket {
    /// Keystrokes since the last tick
    count: u64,
}

impl SecondBucket {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatePolicy for SecondBucket {
    fn name(&self) -> &'static str {
        "second bucket"
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_secs(1)
    }

    fn ingest(&mut self, _at: Instant) {
        self.count += 1;
    }

    fn tick(&mut self, _now: Instant) -> Reading {
        // Scale before dividing so truncation matches integer WPM exactly
        let wpm = self.count.saturating_mul(60) / CHARS_PER_WORD;
        let samples = self.count as usize;
        self.count = 0;
        Reading {
            wpm: wpm as f64,
            samples,
        }
    }

    fn pending(&self) -> usize {
        self.count as usize
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket_with(count: u64) -> SecondBucket {
        let mut bucket = SecondBucket::new();
        let now = Instant::now();
        for _ in 0..count {
            bucket.ingest(now);
        }
        bucket
    }

    #[test]
    fn seven_keystrokes_is_84_wpm() {
        let mut bucket = bucket_with(7);
        let reading = bucket.tick(Instant::now());
        assert_eq!(reading.wpm, 84.0);
        assert_eq!(reading.samples, 7);
    }

    #[test]
    fn scaling_happens_before_division() {
        // 3 * 60 / 5 = 36, while 3 / 5 * 60 would be 0
        let mut bucket = bucket_with(3);
        assert_eq!(bucket.tick(Instant::now()).wpm, 36.0);
    }

    #[test]
    fn tick_resets_count() {
        let mut bucket = bucket_with(10);
        assert_eq!(bucket.tick(Instant::now()).wpm, 120.0);
        assert_eq!(bucket.pending(), 0);
        assert_eq!(bucket.tick(Instant::now()).wpm, 0.0);
    }

    #[test]
    fn ticks_once_per_second() {
        assert_eq!(SecondBucket::new().tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn reset_drops_pending_count() {
        let mut bucket = bucket_with(4);
        bucket.reset();
        assert_eq!(bucket.pending(), 0);
    }
}
