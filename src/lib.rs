//! # pollvisor
//!
//! **Pollvisor** is an adaptive polling engine.
//!
//! It repeatedly invokes a user-supplied asynchronous operation and adjusts
//! the interval between invocations in response to outcomes: successes tick
//! at a jittered nominal cadence, failures back off with capped doubling,
//! an external refresh fires immediately, and a hidden host idles on
//! standby. One poll owns one workload; many polls coexist independently.
//!
//! ## Features
//!
//! | Area             | Description                                                      | Key types / traits                    |
//! |------------------|------------------------------------------------------------------|---------------------------------------|
//! | **Polling**      | Drive an async operation on an adaptive schedule.                | [`Poll`], [`PollBuilder`]             |
//! | **Factories**    | Define the operation as a closure or trait object.               | [`Factory`], [`FactoryFn`]            |
//! | **Policies**     | Configure cadence, bounds, jitter, and backoff.                  | [`IntervalPolicy`], [`jitter`]        |
//! | **Observability**| Await the next tick, or subscribe to the broadcast event stream. | [`Poll::tick`], [`Event`], [`Subscribe`] |
//! | **Host hooks**   | Report visibility so hidden consumers skip invocations.          | [`Visibility`]                        |
//! | **Errors**       | Typed errors for construction and disposal.                      | [`ConfigError`], [`PollError`]        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ```no_run
//! use std::time::Duration;
//! use pollvisor::{Phase, Poll};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Poll a flaky endpoint every 2s, backing off up to 30s on failure.
//!     let poll: Poll<String, String> = Poll::builder("endpoint")
//!         .with_interval(Duration::from_secs(2))
//!         .with_max(Duration::from_secs(30))
//!         .build(|_state| async move {
//!             // fetch(...), any async work yielding Result<T, E>.
//!             Ok("payload".to_string())
//!         })?;
//!
//!     loop {
//!         let state = poll.tick().await?;
//!         match state.phase {
//!             Phase::Rejected => eprintln!("attempt failed: {:?}", state.reason()),
//!             _ => println!("got: {:?}", state.value()),
//!         }
//!     }
//! }
//! ```
//!
//! ---

mod config;
mod core;
mod error;
mod events;
mod factory;
mod host;
mod policies;
mod state;
mod subscribers;

// ---- Public re-exports ----

pub use config::PollConfig;
pub use crate::core::{Poll, PollBuilder};
pub use error::{ConfigError, PollError};
pub use events::{Bus, Event, EventKind};
pub use factory::{BoxFactoryFuture, Factory, FactoryFn, FactoryRef, Gate};
pub use host::{AlwaysVisible, Visibility, VisibilityRef};
pub use policies::{jitter, IntervalPolicy};
pub use state::{Phase, TickState};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logging subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
