//! End-to-end scenarios driven on virtual time.
//!
//! Every test pins `variance = 0.0` where literal intervals are asserted,
//! so the jittered cadence collapses to exact values.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pollvisor::{
    EventKind, IntervalPolicy, Phase, Poll, PollBuilder, PollError, Subscribe, Visibility,
};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::Instant;

fn exact(name: &'static str) -> PollBuilder<u32, String> {
    Poll::builder(name).with_policy(IntervalPolicy {
        interval: Duration::from_secs(1),
        min: Duration::from_millis(100),
        max: Duration::from_secs(10),
        variance: 0.0,
    })
}

#[tokio::test(start_paused = true)]
async fn happy_path_resolves_at_nominal_cadence() {
    let poll = exact("happy").build(|_state| async move { Ok(42) }).unwrap();

    let first = poll.tick().await.unwrap();
    assert_eq!(first.phase, Phase::WhenResolved);
    assert_eq!(first.interval, Duration::from_secs(1));
    assert_eq!(first.payload, None);

    let second = poll.tick().await.unwrap();
    assert_eq!(second.phase, Phase::Resolved);
    assert_eq!(second.interval, Duration::from_secs(1));
    assert_eq!(second.payload, Some(Ok(42)));

    let third = poll.tick().await.unwrap();
    assert_eq!(third.phase, Phase::Resolved);
    assert_eq!(third.value(), Some(&42));
}

#[tokio::test(start_paused = true)]
async fn persistent_failure_backs_off_to_the_cap() {
    let poll = exact("backoff")
        .build(|_state| async move { Err("x".to_string()) })
        .unwrap();

    let first = poll.tick().await.unwrap();
    assert_eq!(first.phase, Phase::WhenResolved);
    assert_eq!(first.interval, Duration::from_secs(1));

    let expected_secs = [2, 4, 8, 10, 10];
    for expected in expected_secs {
        let state = poll.tick().await.unwrap();
        assert_eq!(state.phase, Phase::Rejected);
        assert_eq!(state.interval, Duration::from_secs(expected));
        assert_eq!(state.reason().map(String::as_str), Some("x"));
    }
}

#[tokio::test(start_paused = true)]
async fn success_after_failures_reconnects_then_resolves() {
    let calls = Arc::new(AtomicU32::new(0));
    let seen = calls.clone();
    let poll = exact("reconnect")
        .build(move |_state| {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err("down".to_string())
                } else {
                    Ok(7)
                }
            }
        })
        .unwrap();

    let mut phases = Vec::new();
    let mut intervals = Vec::new();
    for _ in 0..5 {
        let state = poll.tick().await.unwrap();
        phases.push(state.phase);
        intervals.push(state.interval);
    }
    assert_eq!(
        phases,
        vec![
            Phase::WhenResolved,
            Phase::Rejected,
            Phase::Rejected,
            Phase::Reconnect,
            Phase::Resolved,
        ]
    );
    // Backoff doubles while failing, then the nominal cadence returns.
    assert_eq!(
        intervals,
        vec![
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(4),
            Duration::from_secs(1),
            Duration::from_secs(1),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn refresh_preempts_the_armed_timer() {
    let poll = Poll::builder("refresh")
        .with_interval(Duration::from_secs(5))
        .with_max(Duration::from_secs(60))
        .with_variance(0.0)
        .build(|_state: &pollvisor::TickState<u32, String>| async move { Ok(1) })
        .unwrap();

    let first = poll.tick().await.unwrap();
    assert_eq!(first.phase, Phase::WhenResolved);
    assert_eq!(first.interval, Duration::from_secs(5));

    let refreshed = poll.refresh().await.unwrap();
    assert_eq!(refreshed.phase, Phase::Refresh);
    assert_eq!(refreshed.interval, Duration::ZERO);
    assert_eq!(refreshed.payload, None);

    // The factory fires immediately instead of waiting out the 5s timer.
    let start = Instant::now();
    let next = poll.tick().await.unwrap();
    assert_eq!(next.phase, Phase::Resolved);
    assert!(start.elapsed() < Duration::from_millis(100));
}

struct Toggle(AtomicBool);

impl Visibility for Toggle {
    fn is_hidden(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[tokio::test(start_paused = true)]
async fn hidden_host_skips_the_factory_and_idles_on_standby() {
    let hidden = Arc::new(Toggle(AtomicBool::new(true)));
    let calls = Arc::new(AtomicU32::new(0));
    let seen = calls.clone();
    let poll = exact("hidden")
        .with_visibility(hidden.clone())
        .build(move |_state| {
            seen.fetch_add(1, Ordering::SeqCst);
            async move { Ok(9) }
        })
        .unwrap();

    let first = poll.tick().await.unwrap();
    assert_eq!(first.phase, Phase::WhenResolved);

    // The timer fires while hidden: no invocation, standby at the nominal
    // cadence (never the doubled one).
    let skipped = poll.tick().await.unwrap();
    assert_eq!(skipped.phase, Phase::Standby);
    assert_eq!(skipped.interval, Duration::from_secs(1));
    assert_eq!(skipped.payload, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // Visible again: polling resumes.
    hidden.0.store(false, Ordering::Relaxed);
    let resumed = poll.tick().await.unwrap();
    assert_eq!(resumed.phase, Phase::Resolved);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn dispose_during_in_flight_work_discards_the_outcome() {
    let poll = exact("inflight")
        .build(|_state| async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(1)
        })
        .unwrap();
    let mut events = poll.subscribe();

    let first = poll.tick().await.unwrap();
    assert_eq!(first.phase, Phase::WhenResolved);

    // The timer fires at 1000ms; dispose lands mid-invocation at 1250ms.
    tokio::time::sleep(Duration::from_millis(1250)).await;
    poll.dispose();
    assert!(poll.is_disposed());

    let err = poll.tick().await.unwrap_err();
    assert!(matches!(err, PollError::Disposed { .. }));
    assert!(err.to_string().contains("inflight"));

    // Let the stale invocation settle: nothing observes it.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(poll.state().phase, Phase::WhenResolved);

    let ticked = events.recv().await.unwrap();
    assert_eq!(ticked.kind, EventKind::Ticked);
    let disposed = events.recv().await.unwrap();
    assert_eq!(disposed.kind, EventKind::Disposed);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn refresh_resets_the_backoff_ladder() {
    let poll = exact("reset")
        .build(|_state| async move { Err("x".to_string()) })
        .unwrap();

    let first = poll.tick().await.unwrap();
    assert_eq!(first.phase, Phase::WhenResolved);
    let failed = poll.tick().await.unwrap();
    assert_eq!(failed.interval, Duration::from_secs(2));

    let refreshed = poll.refresh().await.unwrap();
    assert_eq!(refreshed.interval, Duration::ZERO);

    // Doubling resumes from the refreshed (zero) interval: clamped to min.
    let restarted = poll.tick().await.unwrap();
    assert_eq!(restarted.phase, Phase::Rejected);
    assert_eq!(restarted.interval, Duration::from_millis(100));

    let next = poll.tick().await.unwrap();
    assert_eq!(next.interval, Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn gate_failure_starts_polling_anyway() {
    let poll = exact("gated")
        .with_gate(async { Err("no backend yet".to_string()) })
        .build(|_state| async move { Ok(3) })
        .unwrap();

    let first = poll.tick().await.unwrap();
    assert_eq!(first.phase, Phase::WhenRejected);
    assert_eq!(first.payload, None);

    let second = poll.tick().await.unwrap();
    assert_eq!(second.phase, Phase::Resolved);
}

#[tokio::test(start_paused = true)]
async fn gate_success_labels_the_first_tick() {
    let poll = exact("gated-ok")
        .with_gate(async { Ok(()) })
        .build(|_state| async move { Ok(3) })
        .unwrap();

    let first = poll.tick().await.unwrap();
    assert_eq!(first.phase, Phase::WhenResolved);
}

#[tokio::test(start_paused = true)]
async fn dispose_is_idempotent_and_drop_disposes() {
    let poll = exact("twice").build(|_state| async move { Ok(1) }).unwrap();
    let mut events = poll.subscribe();

    poll.dispose();
    poll.dispose();
    assert!(poll.is_disposed());
    drop(poll);

    let disposed = events.recv().await.unwrap();
    assert_eq!(disposed.kind, EventKind::Disposed);
    // Exactly one Disposed event, then the bus closes.
    assert!(matches!(
        events.recv().await,
        Err(tokio::sync::broadcast::error::RecvError::Closed)
    ));
}

#[tokio::test(start_paused = true)]
async fn refresh_after_dispose_is_rejected() {
    let poll = exact("late").build(|_state| async move { Ok(1) }).unwrap();
    poll.dispose();
    let err = poll.refresh().await.unwrap_err();
    assert!(matches!(err, PollError::Disposed { .. }));
}

#[tokio::test(start_paused = true)]
async fn concurrent_waiters_observe_the_same_tick() {
    let poll = exact("shared").build(|_state| async move { Ok(5) }).unwrap();

    let (a, b) = tokio::join!(poll.tick(), poll.tick());
    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.phase, b.phase);
    assert_eq!(a.at, b.at);
}

#[tokio::test(start_paused = true)]
async fn accessors_reflect_configuration() {
    let poll = exact("accessors")
        .build(|_state| async move { Ok(1) })
        .unwrap();

    assert_eq!(poll.name(), "accessors");
    assert_eq!(poll.interval(), Duration::from_secs(1));
    assert_eq!(poll.min(), Duration::from_millis(100));
    assert_eq!(poll.max(), Duration::from_secs(10));
    assert_eq!(poll.variance(), 0.0);
    assert!(!poll.is_disposed());
    assert_eq!(poll.state().phase, Phase::Standby);
}

#[tokio::test(start_paused = true)]
async fn invalid_configuration_never_creates_a_poll() {
    let err = Poll::<u32, String>::builder("bad")
        .with_interval(Duration::from_secs(60))
        .with_max(Duration::from_secs(10))
        .build(|_state| async move { Ok(1) })
        .unwrap_err();
    assert_eq!(err.as_label(), "config_interval_exceeds_max");
}

#[tokio::test(start_paused = true)]
async fn jittered_intervals_stay_within_bounds() {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    let poll = Poll::builder("jittered")
        .with_interval(Duration::from_secs(1))
        .with_min(Duration::from_millis(100))
        .with_max(Duration::from_secs(10))
        .with_variance(0.5)
        .with_rng(SmallRng::seed_from_u64(11))
        .build(|_state: &pollvisor::TickState<u32, String>| async move {
            Err("x".to_string())
        })
        .unwrap();

    for _ in 0..12 {
        let state = poll.tick().await.unwrap();
        assert!(state.interval >= Duration::from_millis(100));
        assert!(state.interval <= Duration::from_secs(10));
    }
}

#[tokio::test(start_paused = true)]
async fn event_sequence_numbers_are_monotonic() {
    let poll = exact("ordered").build(|_state| async move { Ok(1) }).unwrap();
    let mut events = poll.subscribe();

    for _ in 0..4 {
        poll.tick().await.unwrap();
    }
    poll.dispose();

    let mut last = None;
    loop {
        match events.try_recv() {
            Ok(ev) => {
                if let Some(prev) = last {
                    assert!(ev.seq > prev, "seq {} not after {}", ev.seq, prev);
                }
                last = Some(ev.seq);
            }
            Err(_) => break,
        }
    }
    assert!(last.is_some());
}

struct Collector {
    phases: Mutex<Vec<Phase>>,
    kinds: Mutex<Vec<EventKind>>,
}

#[async_trait::async_trait]
impl Subscribe<u32, String> for Collector {
    async fn on_event(&self, event: &pollvisor::Event<u32, String>) {
        self.kinds.lock().unwrap().push(event.kind);
        if let Some(state) = &event.state {
            self.phases.lock().unwrap().push(state.phase);
        }
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_ticks_in_installation_order() {
    let collector = Arc::new(Collector {
        phases: Mutex::new(Vec::new()),
        kinds: Mutex::new(Vec::new()),
    });
    let poll = exact("fanout")
        .with_subscriber(collector.clone())
        .build(|_state| async move { Ok(1) })
        .unwrap();

    for _ in 0..3 {
        poll.tick().await.unwrap();
    }
    poll.dispose();

    // Let the listener and the subscriber worker drain their queues.
    tokio::time::sleep(Duration::from_millis(10)).await;

    let phases = collector.phases.lock().unwrap().clone();
    assert_eq!(
        phases,
        vec![Phase::WhenResolved, Phase::Resolved, Phase::Resolved]
    );
    let kinds = collector.kinds.lock().unwrap().clone();
    assert_eq!(kinds.last(), Some(&EventKind::Disposed));
}
