//! # Function-backed factory (`FactoryFn`)
//!
//! [`FactoryFn`] wraps a closure `F: Fn(&TickState) -> Fut`, producing a
//! fresh future per invocation. This avoids shared mutable state; if state
//! must persist across ticks, capture an `Arc<...>` explicitly inside the
//! closure.
//!
//! ## Example
//! ```rust
//! use pollvisor::{FactoryFn, FactoryRef, TickState};
//!
//! let f: FactoryRef<u64, String> = FactoryFn::arc(|state: &TickState<u64, String>| {
//!     let prior = state.value().copied().unwrap_or(0);
//!     async move { Ok::<_, String>(prior + 1) }
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::factory::factory::{BoxFactoryFuture, Factory};
use crate::state::TickState;

/// Function-backed factory implementation.
///
/// Wraps a closure that *creates* a new future per invocation.
#[derive(Debug)]
pub struct FactoryFn<F> {
    f: F,
}

impl<F> FactoryFn<F> {
    /// Creates a new function-backed factory.
    ///
    /// Prefer [`FactoryFn::arc`] when you immediately need a
    /// [`FactoryRef`](crate::FactoryRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the factory and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F, Fut, T, E> Factory<T, E> for FactoryFn<F>
where
    F: Fn(&TickState<T, E>) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn invoke(&self, state: &TickState<T, E>) -> BoxFactoryFuture<T, E> {
        let fut = (self.f)(state);
        Box::pin(fut)
    }
}
