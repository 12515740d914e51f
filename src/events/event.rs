//! # Runtime events emitted by a poll.
//!
//! The [`EventKind`] enum classifies the two observable signals:
//! - [`EventKind::Ticked`] a tick state was installed; fired once per tick,
//!   in installation order, after the corresponding
//!   [`tick`](crate::Poll::tick) future has resolved.
//! - [`EventKind::Disposed`] the poll was disposed; fired exactly once, last.
//!
//! The [`Event`] struct carries the poll name, the installed state (for
//! ticks), and timing metadata.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. This guarantees that events can be ordered correctly even
//! when delivered out-of-order through async channels.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::state::TickState;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of poll events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A tick state was installed.
    Ticked,
    /// The poll was disposed; no further events follow.
    Disposed,
}

/// Poll event with optional metadata.
///
/// ## Fields
/// - `seq`: Unique sequence number for ordering (monotonically increasing)
/// - `at`: Wall-clock timestamp (may go backwards due to NTP, use for logging only)
/// - `kind`: Event classification
/// - `poll`, `state`: Optional metadata
#[derive(Debug, Clone)]
pub struct Event<T, E> {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// The kind of event.
    pub kind: EventKind,
    /// Name of the poll, if attached.
    pub poll: Option<String>,
    /// The installed tick state, populated for `Ticked` events.
    pub state: Option<TickState<T, E>>,
}

impl<T, E> Event<T, E> {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            poll: None,
            state: None,
        }
    }

    /// Attaches the poll name.
    pub fn with_poll(mut self, name: impl Into<String>) -> Self {
        self.poll = Some(name.into());
        self
    }

    /// Attaches the installed tick state.
    pub fn with_state(mut self, state: TickState<T, E>) -> Self {
        self.state = Some(state);
        self
    }
}
