//! # Poll configuration.
//!
//! [`PollConfig`] defines a poll's immutable identity and cadence: the
//! diagnostic name, the [`IntervalPolicy`], and the event bus capacity.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use pollvisor::{IntervalPolicy, PollConfig};
//!
//! let mut cfg = PollConfig::default();
//! cfg.name = "metadata".into();
//! cfg.policy.interval = Duration::from_secs(5);
//! cfg.policy.variance = 0.0;
//!
//! assert_eq!(cfg.name, "metadata");
//! cfg.validate().unwrap();
//! ```

use std::borrow::Cow;

use crate::error::ConfigError;
use crate::policies::IntervalPolicy;

/// Immutable configuration for one poll instance.
#[derive(Clone, Debug)]
pub struct PollConfig {
    /// Opaque name used in diagnostics and events.
    pub name: Cow<'static, str>,
    /// Tick cadence: nominal interval, bounds, jitter amplitude.
    pub policy: IntervalPolicy,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
}

impl Default for PollConfig {
    /// Provides a default configuration:
    /// - `name = "unknown"`
    /// - `policy = IntervalPolicy::default()`
    /// - `bus_capacity = 64`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("unknown"),
            policy: IntervalPolicy::default(),
            bus_capacity: 64,
        }
    }
}

impl PollConfig {
    /// Validates the interval policy. See [`IntervalPolicy::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.validate()
    }
}
