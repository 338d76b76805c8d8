use std::time::Duration;

use rand::Rng;

const JITTER_FLOOR_MS: u64 = 3_000;
const JITTER_CEIL_MS: u64 = 6_000;
const CAP_MS: u64 = 12 * 60 * 60 * 1000;

/// Exponential backoff with randomized jitter (spec.md §4.6): starts
/// uniform in `[3s, 6s]`, doubles per attempt, capped at 12 hours.
#[derive(Debug, Default)]
pub struct Backoff {
    attempt: u32,
}

impl Backoff {
    pub fn new() -> Self {
        Self { attempt: 0 }
    }

    pub fn retry_count(&self) -> u32 {
        self.attempt
    }

    pub fn next_delay(&mut self) -> Duration {
        let jitter_ms = rand::thread_rng().gen_range(JITTER_FLOOR_MS..=JITTER_CEIL_MS);
        let scaled = jitter_ms.saturating_mul(1u64 << self.attempt.min(40));
        self.attempt += 1;
        Duration::from_millis(scaled.min(CAP_MS))
    }

    /// Cleared whenever a download successfully advances (`finishpatch`).
    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_delay_is_within_the_base_jitter_window() {
        let mut b = Backoff::new();
        let d = b.next_delay();
        assert!(d.as_millis() >= 3000 && d.as_millis() <= 6000);
    }

    #[test]
    fn delay_grows_and_is_capped() {
        let mut b = Backoff::new();
        for _ in 0..60 {
            let d = b.next_delay();
            assert!(d.as_millis() as u64 <= CAP_MS);
        }
        assert!(b.next_delay().as_millis() as u64 <= CAP_MS);
    }

    #[test]
    fn reset_returns_to_the_base_window() {
        let mut b = Backoff::new();
        b.next_delay();
        b.next_delay();
        b.reset();
        assert_eq!(b.retry_count(), 0);
        let d = b.next_delay();
        assert!(d.as_millis() >= 3000 && d.as_millis() <= 6000);
    }
}
