//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [ticked] poll=metadata phase=when-resolved interval=5s
//! [ticked] poll=metadata phase=rejected interval=10s err=Some("connection refused")
//! [disposed] poll=metadata
//! ```

use std::fmt::Debug;

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl<T, E> Subscribe<T, E> for LogWriter
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Debug + Send + Sync + 'static,
{
    async fn on_event(&self, e: &Event<T, E>) {
        match e.kind {
            EventKind::Ticked => {
                if let Some(state) = &e.state {
                    if let Some(reason) = state.reason() {
                        println!(
                            "[ticked] poll={:?} phase={} interval={:?} err={:?}",
                            e.poll,
                            state.phase.as_label(),
                            state.interval,
                            reason
                        );
                    } else {
                        println!(
                            "[ticked] poll={:?} phase={} interval={:?}",
                            e.poll,
                            state.phase.as_label(),
                            state.interval
                        );
                    }
                }
            }
            EventKind::Disposed => {
                println!("[disposed] poll={:?}", e.poll);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
