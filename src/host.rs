//! # Host primitives the engine consults.
//!
//! The engine needs very little from its host: timers come from tokio, and
//! the only optional signal is **visibility**: whether anyone is looking at
//! the results. While the host reports hidden, the driver skips factory
//! invocations and idles on standby ticks at the nominal cadence, so backoff
//! does not accumulate while the user is absent.
//!
//! Absence of a visibility source means "never hidden": the default
//! [`AlwaysVisible`] keeps the poll running unconditionally.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use pollvisor::Visibility;
//!
//! struct WindowFocus(AtomicBool);
//!
//! impl Visibility for WindowFocus {
//!     fn is_hidden(&self) -> bool {
//!         !self.0.load(Ordering::Relaxed)
//!     }
//! }
//! ```

use std::sync::Arc;

/// Shared handle to a visibility source.
pub type VisibilityRef = Arc<dyn Visibility>;

/// Reports whether the host currently considers the poll's consumer hidden.
///
/// Checked by the driver at the moment a timer fires; implementations
/// should be cheap and non-blocking.
pub trait Visibility: Send + Sync + 'static {
    /// True while factory invocations should be skipped.
    fn is_hidden(&self) -> bool;
}

/// Default visibility source: never hidden.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysVisible;

impl Visibility for AlwaysVisible {
    fn is_hidden(&self) -> bool {
        false
    }
}
