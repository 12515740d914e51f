//! # Subscriber workers: one bus tap per subscriber.
//!
//! There is no queueing layer between the driver and a subscriber. The
//! driver publishes each event once; every subscriber taps the broadcast
//! bus through its own receiver, and the bus ring (of `bus_capacity`
//! events) is the only buffer. That makes the overflow policy explicit:
//! a subscriber that cannot keep up with the tick cadence skips the ticks
//! the bus no longer retains and picks the stream back up, which is safe
//! because every tick is a self-contained snapshot of the installed state.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::broadcast::error::RecvError;

use crate::events::{Bus, Event};

use super::Subscribe;

/// Spawns one worker per subscriber, each tapping the bus independently.
///
/// Workers drain whatever the bus still retains after disposal and exit
/// once it closes (poll disposed and every handle dropped).
pub(crate) fn spawn_workers<T, E>(bus: &Bus<T, E>, subscribers: Vec<Arc<dyn Subscribe<T, E>>>)
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    for sub in subscribers {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => deliver(sub.as_ref(), &ev).await,
                    Err(RecvError::Lagged(missed)) => {
                        eprintln!(
                            "[pollvisor] subscriber '{}' fell behind; {missed} event(s) skipped",
                            sub.name()
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }
}

/// Runs one handler invocation, containing a panic to this event.
async fn deliver<T: 'static, E: 'static>(sub: &dyn Subscribe<T, E>, ev: &Event<T, E>) {
    if let Err(panic_err) = AssertUnwindSafe(sub.on_event(ev)).catch_unwind().await {
        eprintln!(
            "[pollvisor] subscriber '{}' panicked: {panic_err:?}",
            sub.name()
        );
    }
}
