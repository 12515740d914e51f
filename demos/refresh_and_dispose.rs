//! # Example: refresh_and_dispose
//!
//! Demonstrates external control of a running poll: a `refresh` supersedes
//! the armed timer (the next tick fires immediately), and `dispose` ends the
//! poll, rejecting any outstanding `tick` waiter.
//!
//! ## Run
//! ```bash
//! cargo run --example refresh_and_dispose
//! ```

use std::time::{Duration, Instant};

use pollvisor::{Phase, Poll};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let poll: Poll<String, String> = Poll::builder("slow-cadence")
        .with_interval(Duration::from_secs(30))
        .with_max(Duration::from_secs(60))
        .build(|_state| async move { Ok("payload".to_string()) })?;

    let started = poll.tick().await?;
    println!(
        "first tick: phase={} interval={:?}",
        started.phase.as_label(),
        started.interval
    );

    // Without the refresh we would wait ~30s for the first invocation.
    let t0 = Instant::now();
    let refreshed = poll.refresh().await?;
    assert_eq!(refreshed.phase, Phase::Refresh);
    let state = poll.tick().await?;
    println!(
        "refreshed tick: phase={} value={:?} after {:?}",
        state.phase.as_label(),
        state.value(),
        t0.elapsed()
    );

    poll.dispose();
    match poll.tick().await {
        Err(err) => println!("tick after dispose: {err}"),
        Ok(_) => unreachable!("disposed polls never tick"),
    }
    Ok(())
}
