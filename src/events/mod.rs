//! Poll events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to the signals a poll emits while it runs.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: the poll driver, once per tick installation and once at
//!   disposal.
//! - **Consumers**: [`Poll::subscribe`](crate::Poll::subscribe) receivers and
//!   the per-subscriber workers driving [`Subscribe`](crate::Subscribe)
//!   implementations.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
