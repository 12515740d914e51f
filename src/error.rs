//! # Error types used by the pollvisor engine.
//!
//! This module defines two error enums:
//!
//! - [`ConfigError`] invalid numeric relationships in an interval policy,
//!   reported synchronously at construction.
//! - [`PollError`] failures surfaced by a live poll handle; today that is
//!   only disposal.
//!
//! Factory failures and gate failures are **not** errors: they are phases
//! of the tick state machine (see [`Phase`](crate::Phase)) and never
//! propagate out of engine code.

use std::time::Duration;

use thiserror::Error;

/// # Errors produced while validating poll configuration.
///
/// The poll is not created when any of these fire.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The nominal interval exceeds the configured maximum.
    #[error("interval {interval:?} exceeds max {max:?}")]
    IntervalExceedsMax {
        /// The nominal interval.
        interval: Duration,
        /// The configured maximum.
        max: Duration,
    },

    /// The configured minimum exceeds the configured maximum.
    #[error("min {min:?} exceeds max {max:?}")]
    MinExceedsMax {
        /// The configured minimum.
        min: Duration,
        /// The configured maximum.
        max: Duration,
    },

    /// The configured minimum exceeds the nominal interval.
    #[error("min {min:?} exceeds interval {interval:?}")]
    MinExceedsInterval {
        /// The configured minimum.
        min: Duration,
        /// The nominal interval.
        interval: Duration,
    },

    /// The jitter amplitude is negative or not a finite number.
    #[error("variance {variance} is not a non-negative finite number")]
    InvalidVariance {
        /// The offending jitter amplitude.
        variance: f64,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::IntervalExceedsMax { .. } => "config_interval_exceeds_max",
            ConfigError::MinExceedsMax { .. } => "config_min_exceeds_max",
            ConfigError::MinExceedsInterval { .. } => "config_min_exceeds_interval",
            ConfigError::InvalidVariance { .. } => "config_invalid_variance",
        }
    }
}

/// # Errors produced by a live poll handle.
///
/// Returned by [`Poll::tick`](crate::Poll::tick) and
/// [`Poll::refresh`](crate::Poll::refresh) once the poll has been disposed.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    /// The poll was disposed; no further ticks will be installed.
    #[error("poll '{name}' was disposed")]
    Disposed {
        /// Diagnostic name of the poll.
        name: String,
    },
}

impl PollError {
    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            PollError::Disposed { .. } => "poll_disposed",
        }
    }
}
