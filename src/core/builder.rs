//! # Builder for constructing a poll with optional collaborators.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::config::PollConfig;
use crate::core::actor::{PollActor, Snapshot};
use crate::core::poll::Poll;
use crate::error::ConfigError;
use crate::events::Bus;
use crate::factory::{FactoryFn, FactoryRef, Gate};
use crate::host::{AlwaysVisible, VisibilityRef};
use crate::policies::IntervalPolicy;
use crate::state::TickState;
use crate::subscribers::{spawn_workers, Subscribe};

/// Builder for [`Poll`] with a fluent API.
///
/// ## Example
/// ```no_run
/// use std::time::Duration;
/// use pollvisor::Poll;
///
/// # fn demo() -> Result<(), pollvisor::ConfigError> {
/// let poll: Poll<(), String> = Poll::builder("metadata")
///     .with_interval(Duration::from_secs(2))
///     .with_max(Duration::from_secs(60))
///     .with_variance(0.25)
///     .with_gate(async { Ok(()) })
///     .build(|_state| async move { Ok(()) })?;
/// # Ok(())
/// # }
/// ```
pub struct PollBuilder<T, E> {
    config: PollConfig,
    gate: Option<Gate>,
    visibility: VisibilityRef,
    rng: Option<Box<dyn RngCore + Send>>,
    subscribers: Vec<Arc<dyn Subscribe<T, E>>>,
}

impl<T, E> PollBuilder<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates a new builder with the given poll name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self::from_config(PollConfig {
            name: name.into(),
            ..PollConfig::default()
        })
    }

    /// Creates a builder from a prepared configuration.
    pub fn from_config(config: PollConfig) -> Self {
        Self {
            config,
            gate: None,
            visibility: Arc::new(AlwaysVisible),
            rng: None,
            subscribers: Vec::new(),
        }
    }

    /// Sets the whole interval policy at once.
    pub fn with_policy(mut self, policy: IntervalPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Sets the nominal interval between successful ticks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.config.policy.interval = interval;
        self
    }

    /// Sets the lower bound on any computed interval.
    pub fn with_min(mut self, min: Duration) -> Self {
        self.config.policy.min = min;
        self
    }

    /// Sets the upper bound on any computed interval.
    pub fn with_max(mut self, max: Duration) -> Self {
        self.config.policy.max = max;
        self
    }

    /// Sets the jitter amplitude as a fraction of the base interval.
    /// Zero disables jitter.
    pub fn with_variance(mut self, variance: f64) -> Self {
        self.config.policy.variance = variance;
        self
    }

    /// Sets the event bus capacity.
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.config.bus_capacity = capacity;
        self
    }

    /// Sets the gate: an asynchronous predicate that must settle before the
    /// first tick. Whether it succeeds or fails, polling begins; only the
    /// initial phase label differs.
    pub fn with_gate<G>(mut self, gate: G) -> Self
    where
        G: Future<Output = Result<(), String>> + Send + 'static,
    {
        self.gate = Some(Box::pin(gate));
        self
    }

    /// Sets the visibility source consulted when a timer fires. Defaults to
    /// [`AlwaysVisible`].
    pub fn with_visibility(mut self, visibility: VisibilityRef) -> Self {
        self.visibility = visibility;
        self
    }

    /// Substitutes the randomness source used for jitter. Defaults to a
    /// [`SmallRng`] seeded from the OS; tests pass a seeded one.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Registers an event subscriber, driven by a dedicated worker tapping
    /// the poll's broadcast bus.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe<T, E>>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the poll from a closure.
    pub fn build<F, Fut>(self, f: F) -> Result<Poll<T, E>, ConfigError>
    where
        F: Fn(&TickState<T, E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.build_from_factory(FactoryFn::arc(f))
    }

    /// Builds the poll from an existing factory handle.
    ///
    /// This consumes the builder, validates the interval policy, and spawns
    /// the driver task; it must be called within a tokio runtime.
    pub fn build_from_factory(self, factory: FactoryRef<T, E>) -> Result<Poll<T, E>, ConfigError> {
        self.config.validate()?;
        let PollBuilder {
            config,
            gate,
            visibility,
            rng,
            subscribers,
        } = self;

        let name = config.name.to_string();
        let policy = config.policy;
        let initial = TickState::standby(policy.interval);

        let (ticks_tx, ticks_rx) = watch::channel(Snapshot {
            seq: 0,
            disposed: false,
            state: initial,
        });
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (settle_tx, settle_rx) = PollActor::<T, E>::settlement_channel();
        let bus = Bus::new(config.bus_capacity);
        let token = CancellationToken::new();

        if !subscribers.is_empty() {
            spawn_workers(&bus, subscribers);
        }

        let actor = PollActor {
            name: name.clone(),
            policy,
            factory,
            gate,
            visibility,
            rng: rng.unwrap_or_else(|| Box::new(SmallRng::from_os_rng())),
            ticks: ticks_tx,
            bus: bus.clone(),
            commands: cmd_rx,
            settle_tx,
            settle_rx,
            token: token.clone(),
            seq: 0,
        };
        tokio::spawn(actor.run());

        Ok(Poll {
            name,
            policy,
            ticks: ticks_rx,
            bus,
            commands: cmd_tx,
            token,
        })
    }
}
