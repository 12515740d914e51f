//! # Interval policy: how tick delays are computed.
//!
//! [`IntervalPolicy`] controls the cadence of a poll. It is parameterized by:
//! - [`IntervalPolicy::interval`] the nominal delay between successful ticks;
//! - [`IntervalPolicy::min`] / [`IntervalPolicy::max`] hard bounds on any
//!   computed delay;
//! - [`IntervalPolicy::variance`] the jitter amplitude as a fraction of the
//!   base delay (`0.0` disables jitter).
//!
//! Two computations exist:
//! - [`IntervalPolicy::nominal`] the jittered nominal interval, used after a
//!   success, after the gate settles, and for hidden-host standby ticks;
//! - [`IntervalPolicy::backoff`] the jittered doubling of the previous
//!   interval capped at `max`, used while the factory keeps failing.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//! use pollvisor::IntervalPolicy;
//!
//! let policy = IntervalPolicy {
//!     interval: Duration::from_secs(1),
//!     min: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     variance: 0.0,
//! };
//! policy.validate().unwrap();
//!
//! let mut rng = SmallRng::seed_from_u64(0);
//! assert_eq!(policy.nominal(&mut rng), Duration::from_secs(1));
//!
//! // Failures double the previous delay, capped at max.
//! assert_eq!(policy.backoff(Duration::from_secs(1), &mut rng), Duration::from_secs(2));
//! assert_eq!(policy.backoff(Duration::from_secs(8), &mut rng), Duration::from_secs(10));
//! ```

use std::time::Duration;

use rand::RngCore;

use crate::error::ConfigError;
use crate::policies::jitter::jitter;

/// Tick cadence policy: nominal interval, bounds, and jitter amplitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntervalPolicy {
    /// Nominal delay between successful ticks.
    pub interval: Duration,
    /// Lower bound on any computed delay.
    pub min: Duration,
    /// Upper bound on any computed delay.
    pub max: Duration,
    /// Jitter amplitude as a fraction of the base delay (`0.0` disables).
    pub variance: f64,
}

impl Default for IntervalPolicy {
    /// Returns a policy with:
    /// - `interval = 1s`;
    /// - `min = 100ms`;
    /// - `max = 30s`;
    /// - `variance = 0.2`.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            min: Duration::from_millis(100),
            max: Duration::from_secs(30),
            variance: 0.2,
        }
    }
}

impl IntervalPolicy {
    /// Checks the numeric relationships between the fields.
    ///
    /// Requires `min <= interval <= max` and a finite, non-negative
    /// `variance`. Called once at poll construction; a policy that fails
    /// here never produces a poll.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval > self.max {
            return Err(ConfigError::IntervalExceedsMax {
                interval: self.interval,
                max: self.max,
            });
        }
        if self.min > self.max {
            return Err(ConfigError::MinExceedsMax {
                min: self.min,
                max: self.max,
            });
        }
        if self.min > self.interval {
            return Err(ConfigError::MinExceedsInterval {
                min: self.min,
                interval: self.interval,
            });
        }
        if !self.variance.is_finite() || self.variance < 0.0 {
            return Err(ConfigError::InvalidVariance {
                variance: self.variance,
            });
        }
        Ok(())
    }

    /// The jittered nominal interval, clamped to `[min, max]`.
    pub fn nominal(&self, rng: &mut dyn RngCore) -> Duration {
        jitter(self.interval, self.variance, self.min, self.max, rng)
    }

    /// The jittered doubling of `prev` capped at `max`, clamped to
    /// `[min, max]`.
    ///
    /// A `prev` of zero (the interval a refresh tick was installed with)
    /// doubles to zero and clamps up to `min`, so a failure right after a
    /// refresh restarts the backoff ladder from the bottom.
    pub fn backoff(&self, prev: Duration, rng: &mut dyn RngCore) -> Duration {
        let doubled = prev.saturating_mul(2).min(self.max);
        jitter(doubled, self.variance, self.min, self.max, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn exact() -> IntervalPolicy {
        IntervalPolicy {
            interval: Duration::from_secs(1),
            min: Duration::from_millis(100),
            max: Duration::from_secs(10),
            variance: 0.0,
        }
    }

    #[test]
    fn default_policy_is_valid() {
        IntervalPolicy::default().validate().unwrap();
    }

    #[test]
    fn validation_rejects_inverted_bounds() {
        let mut p = exact();
        p.max = Duration::from_millis(500);
        assert!(matches!(
            p.validate(),
            Err(ConfigError::IntervalExceedsMax { .. })
        ));

        let mut p = exact();
        p.min = Duration::from_secs(20);
        assert!(matches!(p.validate(), Err(ConfigError::MinExceedsMax { .. })));

        let mut p = exact();
        p.min = Duration::from_secs(2);
        assert!(matches!(
            p.validate(),
            Err(ConfigError::MinExceedsInterval { .. })
        ));

        let mut p = exact();
        p.variance = -0.1;
        assert!(matches!(
            p.validate(),
            Err(ConfigError::InvalidVariance { .. })
        ));
    }

    #[test]
    fn backoff_doubles_until_capped() {
        let p = exact();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut prev = p.interval;
        let mut seen = Vec::new();
        for _ in 0..5 {
            prev = p.backoff(prev, &mut rng);
            seen.push(prev);
        }
        assert_eq!(
            seen,
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
                Duration::from_secs(10),
                Duration::from_secs(10),
            ]
        );
    }

    #[test]
    fn backoff_reaches_max_within_log2_failures() {
        let p = exact();
        let mut rng = SmallRng::seed_from_u64(0);
        // ceil(log2(10s / 1s)) = 4 failures to saturate.
        let mut prev = p.interval;
        for _ in 0..4 {
            prev = p.backoff(prev, &mut rng);
        }
        assert_eq!(prev, p.max);
    }

    #[test]
    fn backoff_from_zero_restarts_at_min() {
        let p = exact();
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(p.backoff(Duration::ZERO, &mut rng), p.min);
    }

    #[test]
    fn jittered_backoff_stays_within_bounds() {
        let mut p = exact();
        p.variance = 0.5;
        let mut rng = SmallRng::seed_from_u64(3);
        let mut prev = p.interval;
        for _ in 0..200 {
            prev = p.backoff(prev, &mut rng);
            assert!(prev >= p.min && prev <= p.max);
        }
    }
}
