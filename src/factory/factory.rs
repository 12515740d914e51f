//! # Factory abstraction: the polled operation.
//!
//! Defines the core [`Factory`] trait for the user-supplied asynchronous
//! operation a poll invokes at each tick.
//!
//! - **[`Factory`]** — trait producing a fresh future per invocation,
//!   parameterized by the prior tick state
//! - **[`FactoryRef`]** — shared handle (`Arc<dyn Factory>`) for passing the
//!   operation into the driver
//! - **[`BoxFactoryFuture`]** — type alias for boxed factory futures
//! - **[`Gate`]** — optional asynchronous predicate that delays the first
//!   tick
//!
//! ## Rules
//! - The crate provides [`FactoryFn`](crate::FactoryFn) — a function-backed
//!   implementation that wraps closures as factories.
//! - A factory **must not** panic out of [`Factory::invoke`] itself; any
//!   synchronous failure must be presented as the returned future settling
//!   with `Err`. A panicking future is contained by the driver, but it
//!   cannot produce a failure payload and the tick is re-scheduled on
//!   standby instead.

use std::{future::Future, pin::Pin, sync::Arc};

use crate::state::TickState;

/// Boxed future returned by [`Factory::invoke`].
pub type BoxFactoryFuture<T, E> =
    Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// Shared handle to a factory object.
pub type FactoryRef<T, E> = Arc<dyn Factory<T, E>>;

/// Optional asynchronous predicate that must settle before the first tick.
///
/// Whether it succeeds or fails, polling begins; only the initial phase
/// label differs (`when-resolved` vs `when-rejected`). A failure reason is
/// surfaced once as a diagnostic warning.
pub type Gate = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'static>>;

/// Asynchronous operation polled at each tick.
///
/// Each invocation receives the tick state current at the moment of the
/// call (phase, interval, last payload) and may ignore it.
///
/// ## Rules
/// - **Stateless invocation**: `invoke(&self)` is `Fn`, not `FnMut` — shared
///   state goes behind an explicit `Arc` inside the implementation.
/// - **Fresh futures**: each `invoke()` call creates a **new** independent
///   future; the driver never re-polls a settled one.
/// - **No cancellation**: a superseded invocation runs to completion on a
///   detached task and its outcome is discarded by identity check.
pub trait Factory<T, E>: Send + Sync + 'static {
    /// Creates a new future that performs one attempt of the operation.
    fn invoke(&self, state: &TickState<T, E>) -> BoxFactoryFuture<T, E>;
}
