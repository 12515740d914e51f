//! # Example: basic_poll
//!
//! Demonstrates a poll driving a flaky operation: successes tick at the
//! nominal cadence, failures back off with capped doubling, and a success
//! after failures lands as `reconnect`.
//!
//! ## Flow
//! ```text
//! PollActor::run()
//!   ├─► install(when-resolved, 500ms)
//!   ├─► invoke → Err("boom #1") → install(rejected, 1s)
//!   ├─► invoke → Err("boom #2") → install(rejected, 2s)
//!   ├─► invoke → Ok(3)          → install(reconnect, 500ms)
//!   └─► invoke → Ok(4)          → install(resolved, 500ms)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_poll --features logging
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pollvisor::{LogWriter, Phase, Poll};

static ATTEMPTS: AtomicU64 = AtomicU64::new(0);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Fails twice, then succeeds forever.
    let poll: Poll<u64, String> = Poll::builder("flaky")
        .with_interval(Duration::from_millis(500))
        .with_min(Duration::from_millis(100))
        .with_max(Duration::from_secs(5))
        .with_variance(0.0)
        .with_subscriber(Arc::new(LogWriter))
        .build(|_state| {
            let attempt = ATTEMPTS.fetch_add(1, Ordering::Relaxed) + 1;
            async move {
                if attempt <= 2 {
                    Err(format!("boom #{attempt}"))
                } else {
                    Ok(attempt)
                }
            }
        })?;

    loop {
        let state = poll.tick().await?;
        if state.phase == Phase::Reconnect {
            println!("reconnected after {} attempts", ATTEMPTS.load(Ordering::Relaxed));
        }
        if state.value().copied() >= Some(5) {
            break;
        }
    }

    poll.dispose();
    Ok(())
}
