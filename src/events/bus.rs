//! # Event bus for broadcasting poll events.
//!
//! [`Bus`] is a wrapper around [`tokio::sync::broadcast`] that lets the poll
//! driver broadcast [`Event`]s to multiple subscribers simultaneously.
//!
//! ## Key characteristics:
//! - **Broadcast semantics**: all active subscribers receive a clone of each event
//! - **Non-persistent**: events are lost if there are no active subscribers
//! - **Bounded capacity**: old events are dropped when the channel is full
//! - **Multiple subscribers**: any number of receivers can subscribe independently

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for poll events.
///
/// Wrapper over [`tokio::sync::broadcast`] that provides `publish`/`subscribe`
/// methods for delivering [`Event`]s to multiple concurrent subscribers.
pub struct Bus<T, E> {
    tx: broadcast::Sender<Event<T, E>>,
}

impl<T, E> Clone for Bus<T, E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T, E> Bus<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a new bus with the given channel capacity.
    ///
    /// When capacity is exceeded, the oldest unsent events are dropped.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// If there are no active subscribers, the event is dropped silently.
    /// This is intentional as a poll can operate without observers.
    pub fn publish(&self, ev: Event<T, E>) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new subscriber that will receive all future events.
    ///
    /// Each call creates an independent receiver; every receiver gets a
    /// clone of every event published after its subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<Event<T, E>> {
        self.tx.subscribe()
    }
}
