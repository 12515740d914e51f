//! Engine core: the driver and its public handle.
//!
//! This module contains the embedded implementation of the poll engine. The
//! public API re-exported from here is [`Poll`] and [`PollBuilder`];
//! everything else is an internal building block the builder wires together.
//!
//! ## Files & responsibilities
//! - **poll.rs**: public facade; `tick`/`refresh`/`dispose`, accessors,
//!   event subscription. Dropping the handle disposes the poll.
//! - **builder.rs**: fluent construction; validates the interval policy,
//!   wires the channels, spawns the driver and the subscriber listener.
//! - **actor.rs**: the driver loop; gate, scheduler, invocation arbiter,
//!   state installation, disposal.
//!
//! ## Wiring (module-level flow)
//! ```text
//! Application code
//!   └─ Poll::builder(..).build(factory) ──► tokio::spawn(PollActor::run)
//!
//!            Poll handle                              PollActor
//!   tick()    ──► watch::Receiver ◄── install() ──► watch::Sender
//!   refresh() ──► mpsc commands  ──────────────────► select! arms
//!   dispose() ──► CancellationToken ───────────────► checked at every await
//!   subscribe()─► broadcast Bus  ◄── publish() ───── Ticked / Disposed
//!
//! detached factory task ── Settlement{seq} ──► mpsc settlements ──► arbiter
//! ```
//!
//! ## Notes
//! - Tick ordering is maintained via a per-poll monotonic seq; settlements
//!   carrying a superseded seq are discarded.
//! - Event delivery is fire-and-forget: the bounded broadcast bus is the
//!   only buffer between the driver and every consumer.
//! - Transitions are strictly sequential; the driver is the only writer.

mod actor;
mod builder;
mod poll;

pub use builder::PollBuilder;
pub use poll::Poll;
