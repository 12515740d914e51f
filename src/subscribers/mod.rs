//! # Observing a poll.
//!
//! Two ways to watch a poll: pull a raw receiver from
//! [`Poll::subscribe`](crate::Poll::subscribe), or register a [`Subscribe`]
//! implementation at build time and let the crate drive it. Registered
//! subscribers each get a dedicated worker tapping the same broadcast bus
//! the raw receivers use, so every consumer sees the identical stream: one
//! `Ticked` per installation, in order, then a single `Disposed`.
//!
//! ```text
//!   PollActor ── publish ──► Bus ──┬── worker ── Subscribe::on_event
//!                                  ├── worker ── Subscribe::on_event
//!                                  └── Poll::subscribe() receiver
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use pollvisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct MetricsSubscriber;
//!
//! #[async_trait]
//! impl Subscribe<u64, String> for MetricsSubscriber {
//!     async fn on_event(&self, event: &Event<u64, String>) {
//!         if event.kind == EventKind::Ticked {
//!             // increment tick counter
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscribe;
mod worker;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::Subscribe;
pub(crate) use worker::spawn_workers;
