//! # Subscriber contract
//!
//! A [`Subscribe`] implementation observes one poll's life: every installed
//! tick, in installation order, then the final disposal. Registered
//! subscribers ride the same broadcast bus as
//! [`Poll::subscribe`](crate::Poll::subscribe) receivers, each behind a
//! dedicated worker task, so a slow subscriber never delays the driver, the
//! tick cadence, or the other subscribers.
//!
//! ## Delivery contract
//! - Per-subscriber FIFO, one event per installation, in tick order.
//! - Lossy under sustained lag: the bus retains the last
//!   `bus_capacity` events, and a subscriber that falls further behind
//!   skips the ticks no longer retained (a warning names it) and resumes at
//!   the oldest retained one. Each `Ticked` event carries the full
//!   installed state, so a skipped tick costs an intermediate observation,
//!   never a corrupted view; the current state is always available from
//!   [`Poll::state`](crate::Poll::state).
//! - A panic inside a handler is contained to that one event.

use async_trait::async_trait;

use crate::events::Event;

/// Observer of one poll's tick stream.
///
/// Driven from a dedicated worker task fed by the poll's broadcast bus.
/// Handlers may await, but anything slower than the tick cadence will
/// eventually lag this subscriber past the bus window and skip ticks.
#[async_trait]
pub trait Subscribe<T, E>: Send + Sync + 'static {
    /// Handles one event: an installed tick, or the final disposal.
    async fn on_event(&self, event: &Event<T, E>);

    /// Name used when reporting lag or a panic for this subscriber.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
