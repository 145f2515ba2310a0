//! Politeness delay between page loads of one source
//!
//! Each source waits a randomized interval before every navigation. The
//! interval is drawn uniformly from `[base, base + jitter)` using the RNG the
//! caller owns, so seeded runs wait the same amounts every time.

use rand::Rng;
use std::time::Duration;

/// Source-specific delay distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlDelay {
    base: Duration,
    jitter: Duration,
}

impl CrawlDelay {
    #[must_use]
    pub const fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    #[must_use]
    pub const fn from_millis(base_ms: u64, jitter_ms: u64) -> Self {
        Self::new(Duration::from_millis(base_ms), Duration::from_millis(jitter_ms))
    }

    /// No waiting at all (tests, local fixtures)
    #[must_use]
    pub const fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    #[must_use]
    pub fn base(&self) -> Duration {
        self.base
    }

    #[must_use]
    pub fn jitter(&self) -> Duration {
        self.jitter
    }

    /// Draw the next delay
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            return self.base;
        }
        self.base + Duration::from_millis(rng.random_range(0..jitter_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn samples_stay_in_range() {
        let delay = CrawlDelay::from_millis(2_000, 2_000);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let d = delay.sample(&mut rng);
            assert!(d >= Duration::from_millis(2_000));
            assert!(d < Duration::from_millis(4_000));
        }
    }

    #[test]
    fn same_seed_same_delays() {
        let delay = CrawlDelay::from_millis(10_000, 10_000);
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let left: Vec<_> = (0..20).map(|_| delay.sample(&mut a)).collect();
        let right: Vec<_> = (0..20).map(|_| delay.sample(&mut b)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn jitter_beyond_u64_millis_saturates() {
        // 18446744073709552 s is just past u64::MAX ms; truncating would leave ~384 ms.
        let delay = CrawlDelay::new(Duration::ZERO, Duration::from_secs(u64::MAX / 1000 + 1));
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert!(delay.sample(&mut rng) > Duration::from_secs(86_400));
        }
    }

    #[test]
    fn zero_jitter_is_constant() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(CrawlDelay::none().sample(&mut rng), Duration::ZERO);
        assert_eq!(
            CrawlDelay::from_millis(500, 0).sample(&mut rng),
            Duration::from_millis(500)
        );
    }
}
