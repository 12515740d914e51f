//! # PollActor: the driver behind one poll.
//!
//! Runs the tick state machine on a single task, serialising every state
//! transition through one mailbox:
//! - waits for the optional gate, then installs the first tick;
//! - arms one timer (or yield, for a zero interval) per installed state;
//! - launches the factory on a detached task and arbitrates its settlement;
//! - applies the interval policy: jittered nominal cadence on success,
//!   capped doubling on failure;
//! - honors `refresh` commands and disposal at every suspension point.
//!
//! ## Flow
//! ```text
//! PollBuilder ──► tokio::spawn(PollActor::run)
//!
//! run()
//!   ├─► open_gate()
//!   │     ├─► no gate          → install(when-resolved)
//!   │     ├─► gate Ok          → install(when-resolved)
//!   │     ├─► gate Err         → warn, install(when-rejected)
//!   │     └─► refresh arrives  → install(refresh), gate abandoned
//!   ├─► drive()
//!   │     loop {
//!   │       ├─► wait(state.interval)            (refresh/dispose preempt)
//!   │       ├─► hidden host? → install(standby) (factory skipped)
//!   │       ├─► spawn factory, tagged with the current tick seq
//!   │       └─► await settlement                (refresh/dispose supersede)
//!   │             ├─► stale seq  → drop outcome
//!   │             ├─► Ok(value)  → install(resolved | reconnect)
//!   │             ├─► Err(reason)→ install(rejected, doubled interval)
//!   │             └─► panicked   → warn, install(standby)
//!   │     }
//!   └─► finish() → reject outstanding tick, publish Disposed
//! ```
//!
//! ## Rules
//! - Installations are strictly sequential; each bumps the tick seq.
//! - A settlement whose seq no longer matches the seq it was launched for
//!   is discarded (supersession by identity, never cancellation).
//! - After disposal no state is installed and no factory call begins.

use std::time::{Duration, SystemTime};

use futures::FutureExt;
use rand::RngCore;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event, EventKind};
use crate::factory::{FactoryRef, Gate};
use crate::host::VisibilityRef;
use crate::policies::IntervalPolicy;
use crate::state::{Phase, TickState};

/// Externally-enqueued operations on a live poll.
pub(crate) enum Command<T, E> {
    /// Install a refresh tick (interval zero), superseding the current
    /// schedule and any in-flight invocation.
    Refresh {
        ack: oneshot::Sender<TickState<T, E>>,
    },
}

/// Snapshot published on the watch channel at each installation.
///
/// The watch channel *is* the outstanding tick: awaiting a change resolves
/// with the next installed state, and the `disposed` marker rejects every
/// pending waiter at disposal.
pub(crate) struct Snapshot<T, E> {
    /// Monotonic tick number; bumped once per installation.
    pub seq: u64,
    /// Set once, by the final snapshot.
    pub disposed: bool,
    /// The installed state (the last installed state, once disposed).
    pub state: TickState<T, E>,
}

/// Outcome of one detached factory invocation, tagged with the tick it was
/// launched for. A `None` outcome means the factory future panicked.
pub(crate) struct Settlement<T, E> {
    seq: u64,
    outcome: Option<Result<T, E>>,
}

/// Drives one poll until disposal.
pub(crate) struct PollActor<T, E> {
    pub(crate) name: String,
    pub(crate) policy: IntervalPolicy,
    pub(crate) factory: FactoryRef<T, E>,
    pub(crate) gate: Option<Gate>,
    pub(crate) visibility: VisibilityRef,
    pub(crate) rng: Box<dyn RngCore + Send>,
    pub(crate) ticks: watch::Sender<Snapshot<T, E>>,
    pub(crate) bus: Bus<T, E>,
    pub(crate) commands: mpsc::Receiver<Command<T, E>>,
    pub(crate) settle_tx: mpsc::Sender<Settlement<T, E>>,
    pub(crate) settle_rx: mpsc::Receiver<Settlement<T, E>>,
    pub(crate) token: CancellationToken,
    pub(crate) seq: u64,
}

impl<T, E> PollActor<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates the settlement channel pair for a new actor.
    pub(crate) fn settlement_channel() -> (mpsc::Sender<Settlement<T, E>>, mpsc::Receiver<Settlement<T, E>>)
    {
        mpsc::channel(8)
    }

    /// Runs the actor until disposal.
    pub(crate) async fn run(mut self) {
        if self.open_gate().await {
            self.drive().await;
        }
        self.finish();
    }

    /// Waits for the gate (if any) and installs the first tick state.
    ///
    /// Returns false when the poll was disposed while waiting.
    async fn open_gate(&mut self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        let gate = match self.gate.take() {
            None => {
                let interval = self.policy.nominal(self.rng.as_mut());
                self.install(Phase::WhenResolved, None, interval);
                return true;
            }
            Some(gate) => gate,
        };

        select! {
            biased;
            _ = self.token.cancelled() => false,
            // An early refresh takes over; the gate is abandoned.
            cmd = self.commands.recv() => self.handle_command(cmd),
            settled = gate => {
                let interval = self.policy.nominal(self.rng.as_mut());
                match settled {
                    Ok(()) => {
                        self.install(Phase::WhenResolved, None, interval);
                    }
                    Err(reason) => {
                        eprintln!(
                            "[pollvisor] poll '{}' started despite gate rejection: {reason}",
                            self.name
                        );
                        self.install(Phase::WhenRejected, None, interval);
                    }
                }
                true
            }
        }
    }

    /// The tick loop: one iteration per installed state.
    async fn drive(&mut self) {
        'ticks: loop {
            let current = self.ticks.borrow().state.clone();

            // Wait out the interval; refresh and disposal preempt the timer.
            select! {
                biased;
                _ = self.token.cancelled() => return,
                cmd = self.commands.recv() => {
                    if !self.handle_command(cmd) {
                        return;
                    }
                    continue 'ticks;
                }
                _ = wait(current.interval) => {}
            }
            if self.token.is_cancelled() {
                return;
            }

            // A hidden host idles on standby at the nominal cadence instead
            // of invoking the factory, so backoff never accumulates while
            // nobody is looking.
            if self.visibility.is_hidden() {
                let interval = self.policy.nominal(self.rng.as_mut());
                self.install(Phase::Standby, None, interval);
                continue 'ticks;
            }

            // Launch the factory for this tick on a detached task. The task
            // always runs to completion; superseded outcomes are dropped
            // below by seq comparison.
            let launched = self.seq;
            let fut = self.factory.invoke(&current);
            let tx = self.settle_tx.clone();
            tokio::spawn(async move {
                let outcome = std::panic::AssertUnwindSafe(fut).catch_unwind().await.ok();
                let _ = tx
                    .send(Settlement {
                        seq: launched,
                        outcome,
                    })
                    .await;
            });

            // Await the settlement; refresh and disposal supersede it.
            loop {
                select! {
                    biased;
                    _ = self.token.cancelled() => return,
                    cmd = self.commands.recv() => {
                        if !self.handle_command(cmd) {
                            return;
                        }
                        continue 'ticks;
                    }
                    settled = self.settle_rx.recv() => {
                        let Some(settled) = settled else { return };
                        if settled.seq != launched {
                            // Stale: launched for a tick that has since been
                            // superseded.
                            continue;
                        }
                        self.settle(&current, settled.outcome);
                        continue 'ticks;
                    }
                }
            }
        }
    }

    /// Transitions out of a settled factory invocation.
    fn settle(&mut self, prior: &TickState<T, E>, outcome: Option<Result<T, E>>) {
        match outcome {
            Some(Ok(value)) => {
                let phase = if prior.phase == Phase::Rejected {
                    Phase::Reconnect
                } else {
                    Phase::Resolved
                };
                let interval = self.policy.nominal(self.rng.as_mut());
                self.install(phase, Some(Ok(value)), interval);
            }
            Some(Err(reason)) => {
                let interval = self.policy.backoff(prior.interval, self.rng.as_mut());
                self.install(Phase::Rejected, Some(Err(reason)), interval);
            }
            None => {
                // A panicking factory cannot produce a failure payload;
                // resume on standby at the nominal cadence.
                eprintln!(
                    "[pollvisor] poll '{}' factory panicked; resuming on standby",
                    self.name
                );
                let interval = self.policy.nominal(self.rng.as_mut());
                self.install(Phase::Standby, None, interval);
            }
        }
    }

    /// Applies one external command. Returns false when the actor should
    /// stop (the handle is gone).
    fn handle_command(&mut self, cmd: Option<Command<T, E>>) -> bool {
        match cmd {
            Some(Command::Refresh { ack }) => {
                let state = self.install(Phase::Refresh, None, Duration::ZERO);
                let _ = ack.send(state);
                true
            }
            // The handle was dropped without an explicit dispose.
            None => false,
        }
    }

    /// Installs a new tick state: bumps the seq, resolves the outstanding
    /// tick, then broadcasts `Ticked` (in that order).
    fn install(
        &mut self,
        phase: Phase,
        payload: Option<Result<T, E>>,
        interval: Duration,
    ) -> TickState<T, E> {
        self.seq += 1;
        let state = TickState {
            interval,
            payload,
            phase,
            at: SystemTime::now(),
        };
        self.ticks.send_replace(Snapshot {
            seq: self.seq,
            disposed: false,
            state: state.clone(),
        });
        self.bus.publish(
            Event::now(EventKind::Ticked)
                .with_poll(self.name.clone())
                .with_state(state.clone()),
        );
        state
    }

    /// Rejects the outstanding tick and signals observers exactly once.
    fn finish(&mut self) {
        let last = self.ticks.borrow().state.clone();
        self.ticks.send_replace(Snapshot {
            seq: self.seq,
            disposed: true,
            state: last,
        });
        self.bus
            .publish(Event::now(EventKind::Disposed).with_poll(self.name.clone()));
    }
}

/// Defers for `delay`: a one-shot timer, or (for a zero delay) the
/// lowest-latency deferral the host offers, one trip through the scheduler.
async fn wait(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        time::sleep(delay).await;
    }
}
