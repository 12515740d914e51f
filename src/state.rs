//! # Tick state: the public record of one poll cycle.
//!
//! A poll advances by installing immutable [`TickState`] values, one per
//! tick. The [`Phase`] of a state encodes *why* it was installed:
//!
//! - [`Phase::Standby`] initial state, or a tick skipped while the host
//!   reported hidden;
//! - [`Phase::WhenResolved`] / [`Phase::WhenRejected`] the gate settled and
//!   polling is about to begin;
//! - [`Phase::Resolved`] / [`Phase::Rejected`] the factory settled;
//! - [`Phase::Reconnect`] the factory succeeded after a prior failure;
//! - [`Phase::Refresh`] an external [`refresh`](crate::Poll::refresh)
//!   preempted the schedule.
//!
//! ## Rules
//! - `payload` is `Some` exactly when [`Phase::holds_payload`] is true.
//! - `interval` is the delay that was used to schedule the tick; a zero
//!   interval means the tick fires as soon as possible rather than via a
//!   timer.

use std::time::{Duration, SystemTime};

/// Why a tick state was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial state, or a tick skipped because the host reported hidden.
    Standby,
    /// The gate settled successfully; polling begins.
    WhenResolved,
    /// The gate settled with a failure; polling begins regardless.
    WhenRejected,
    /// The factory succeeded.
    Resolved,
    /// The factory failed; the next interval backs off.
    Rejected,
    /// The factory succeeded after a prior failure.
    Reconnect,
    /// An external refresh superseded the schedule; fires immediately.
    Refresh,
}

impl Phase {
    /// Returns a short stable label (kebab-case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Phase::Standby => "standby",
            Phase::WhenResolved => "when-resolved",
            Phase::WhenRejected => "when-rejected",
            Phase::Resolved => "resolved",
            Phase::Rejected => "rejected",
            Phase::Reconnect => "reconnect",
            Phase::Refresh => "refresh",
        }
    }

    /// True for the phases that carry a factory outcome in their payload.
    pub fn holds_payload(&self) -> bool {
        matches!(self, Phase::Resolved | Phase::Rejected | Phase::Reconnect)
    }
}

/// Immutable record of one tick, replaced wholesale at each transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TickState<T, E> {
    /// Delay used to schedule this tick. Zero means "as soon as possible".
    pub interval: Duration,
    /// Last factory outcome: `Some(Ok)` in `Resolved`/`Reconnect`,
    /// `Some(Err)` in `Rejected`, `None` everywhere else.
    pub payload: Option<Result<T, E>>,
    /// Why this state was installed.
    pub phase: Phase,
    /// Wall-clock instant the state was installed.
    pub at: SystemTime,
}

impl<T, E> TickState<T, E> {
    /// The state a poll is constructed in, before its gate settles.
    pub(crate) fn standby(interval: Duration) -> Self {
        Self {
            interval,
            payload: None,
            phase: Phase::Standby,
            at: SystemTime::now(),
        }
    }

    /// Convenience view of a successful payload.
    pub fn value(&self) -> Option<&T> {
        match &self.payload {
            Some(Ok(value)) => Some(value),
            _ => None,
        }
    }

    /// Convenience view of a failure payload.
    pub fn reason(&self) -> Option<&E> {
        match &self.payload {
            Some(Err(reason)) => Some(reason),
            _ => None,
        }
    }
}
