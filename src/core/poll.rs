//! # Poll: the public handle over one adaptive poll.
//!
//! A [`Poll`] owns one asynchronous workload and repeatedly invokes it,
//! adjusting the interval between invocations in response to outcomes:
//! successes tick at the jittered nominal cadence, failures back off with
//! capped doubling, an external [`refresh`](Poll::refresh) fires
//! immediately, and a hidden host idles on standby.
//!
//! The handle is cheap to use from anywhere: every operation is serialised
//! through the driver task, so no locking is exposed. Dropping the handle
//! disposes the poll.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::config::PollConfig;
use crate::core::actor::{Command, Snapshot};
use crate::core::builder::PollBuilder;
use crate::error::{ConfigError, PollError};
use crate::events::{Bus, Event};
use crate::factory::FactoryRef;
use crate::policies::IntervalPolicy;
use crate::state::TickState;

/// Handle to one adaptive poll.
///
/// Created via [`Poll::builder`] or [`Poll::new`]; lives until
/// [`dispose`](Poll::dispose) or drop.
///
/// ## Example
/// ```no_run
/// use pollvisor::Poll;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let poll: Poll<u64, String> = Poll::builder("heartbeat")
///     .with_interval(std::time::Duration::from_secs(5))
///     .build(|_state| async move { Ok(42) })?;
///
/// let state = poll.tick().await?;
/// println!("phase={} value={:?}", state.phase.as_label(), state.value());
/// # Ok(())
/// # }
/// ```
pub struct Poll<T, E> {
    pub(crate) name: String,
    pub(crate) policy: IntervalPolicy,
    pub(crate) ticks: watch::Receiver<Snapshot<T, E>>,
    pub(crate) bus: Bus<T, E>,
    pub(crate) commands: mpsc::Sender<Command<T, E>>,
    pub(crate) token: CancellationToken,
}

impl<T, E> std::fmt::Debug for Poll<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poll").field("name", &self.name).finish()
    }
}

impl<T, E> Poll<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates a builder for constructing a poll with a fluent API.
    pub fn builder(name: impl Into<std::borrow::Cow<'static, str>>) -> PollBuilder<T, E> {
        PollBuilder::new(name)
    }

    /// Creates a poll from a prepared configuration and factory handle.
    ///
    /// Validates the interval policy; the poll is not created when the
    /// numeric relationships are invalid. Must be called within a tokio
    /// runtime: the driver task is spawned here.
    pub fn new(config: PollConfig, factory: FactoryRef<T, E>) -> Result<Self, ConfigError> {
        PollBuilder::from_config(config).build_from_factory(factory)
    }

    /// Resolves with the next installed tick state.
    ///
    /// Each call observes the installation that happens *after* the call;
    /// concurrent callers all resolve with the same state. Once the poll is
    /// disposed, pending and future calls return
    /// [`PollError::Disposed`].
    pub async fn tick(&self) -> Result<TickState<T, E>, PollError> {
        let mut rx = self.ticks.clone();
        // Sync to the current installation so `changed` observes only the
        // next one.
        rx.mark_unchanged();
        if self.token.is_cancelled() || rx.borrow().disposed {
            return Err(self.disposed_error());
        }
        if rx.changed().await.is_err() {
            return Err(self.disposed_error());
        }
        let snap = rx.borrow_and_update();
        if snap.disposed {
            return Err(self.disposed_error());
        }
        Ok(snap.state.clone())
    }

    /// Supersedes the current schedule with an immediate tick.
    ///
    /// Installs a `refresh` state (interval zero, empty payload) ahead of
    /// any armed timer, resolving the outstanding tick. An in-flight
    /// factory invocation keeps running but its outcome is discarded.
    /// Returns the installed refresh state.
    pub async fn refresh(&self) -> Result<TickState<T, E>, PollError> {
        if self.token.is_cancelled() {
            return Err(self.disposed_error());
        }
        let (ack, acked) = oneshot::channel();
        self.commands
            .send(Command::Refresh { ack })
            .await
            .map_err(|_| self.disposed_error())?;
        acked.await.map_err(|_| self.disposed_error())
    }

    /// Disposes the poll. Idempotent.
    ///
    /// Cancels any pending timer, rejects the outstanding tick with a
    /// diagnostic naming the poll, and emits the `Disposed` event exactly
    /// once. No state transition and no factory invocation begins after
    /// this; in-flight work runs to completion unobserved.
    pub fn dispose(&self) {
        self.token.cancel();
    }

    /// True once [`dispose`](Poll::dispose) has been called (or the handle
    /// dropped).
    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The last installed tick state (unchanged after disposal).
    pub fn state(&self) -> TickState<T, E> {
        self.ticks.borrow().state.clone()
    }

    /// Subscribes to the broadcast event stream: one `Ticked` per
    /// installation, in order, then a final `Disposed`.
    pub fn subscribe(&self) -> broadcast::Receiver<Event<T, E>> {
        self.bus.subscribe()
    }

    /// Diagnostic name of the poll.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nominal interval between successful ticks.
    pub fn interval(&self) -> Duration {
        self.policy.interval
    }

    /// Lower bound on any computed interval.
    pub fn min(&self) -> Duration {
        self.policy.min
    }

    /// Upper bound on any computed interval.
    pub fn max(&self) -> Duration {
        self.policy.max
    }

    /// Jitter amplitude as a fraction of the base interval.
    pub fn variance(&self) -> f64 {
        self.policy.variance
    }

    fn disposed_error(&self) -> PollError {
        PollError::Disposed {
            name: self.name.clone(),
        }
    }
}

impl<T, E> Drop for Poll<T, E> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
