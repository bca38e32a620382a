//! Periodic and on-demand resolution scheduling.
//!
//! # Data Flow
//! ```text
//! interval tick ──────────┐
//!                         ▼
//! manual trigger ──mpsc──▶ scheduler task (sole owner of the Resolver)
//!                         │
//!                         ▼
//!                  one resolution cycle at a time
//!                         │
//!                         ▼
//!              RotationState snapshot via watch
//! ```
//!
//! # Design Decisions
//! - Single-flight policy: a trigger arriving while a cycle is in flight
//!   waits and is coalesced; when the in-flight cycle commits, every
//!   queued waiter receives that cycle's outcome and no extra cycle runs.
//!   The interval timer and manual triggers are serialized through one
//!   `select!` loop, so they can never race against the rotation state
//! - The first cycle runs immediately at startup (interval's first tick)
//! - Shutdown cancels the cycle token, which aborts whichever probe or
//!   authority query is currently outstanding

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::source::{ConfigSource, HttpConfigSource, SourceError, StaticConfigSource};
use crate::config::{OrderPolicyKind, RotatorConfig};
use crate::resolver::blocklist::{BlocklistChecker, FilterAuthorityClient};
use crate::resolver::order::{OrderPolicy, RandomShuffle, StickyRotation};
use crate::resolver::probe::HttpProber;
use crate::resolver::state::{ResolutionOutcome, RotationState};
use crate::resolver::Resolver;

/// Messages accepted by the scheduler task.
enum Command {
    Resolve {
        reply: oneshot::Sender<ResolutionOutcome>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid URL in settings: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Error returned when the scheduler task is no longer running.
#[derive(Debug, thiserror::Error)]
#[error("rotation scheduler is not running")]
pub struct SchedulerGone;

/// Cheap, cloneable handle used by the UI and HTTP surface.
#[derive(Clone)]
pub struct RotatorHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<RotationState>,
}

impl RotatorHandle {
    /// Trigger a resolution cycle and wait for a terminal outcome.
    ///
    /// If a cycle is already in flight, this waits for it and receives
    /// its outcome rather than starting another.
    pub async fn resolve_now(&self) -> Result<ResolutionOutcome, SchedulerGone> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Resolve { reply })
            .await
            .map_err(|_| SchedulerGone)?;
        response.await.map_err(|_| SchedulerGone)
    }

    /// Last committed rotation-state snapshot.
    pub fn state(&self) -> RotationState {
        self.state.borrow().clone()
    }

    /// Subscribe to committed snapshots, for display code that wants to
    /// react to changes.
    pub fn subscribe(&self) -> watch::Receiver<RotationState> {
        self.state.clone()
    }
}

/// Owns the resolver and serializes every resolution trigger.
pub struct Scheduler {
    resolver: Resolver,
    poll_interval: Duration,
    commands: mpsc::Receiver<Command>,
}

impl Scheduler {
    pub fn new(resolver: Resolver, poll_interval: Duration) -> (Self, RotatorHandle) {
        let (commands_tx, commands_rx) = mpsc::channel(16);
        let handle = RotatorHandle {
            commands: commands_tx,
            state: resolver.subscribe(),
        };
        let scheduler = Self {
            resolver,
            poll_interval,
            commands: commands_rx,
        };
        (scheduler, handle)
    }

    /// Assemble the resolver and scheduler from validated settings.
    pub fn from_config(config: &RotatorConfig) -> Result<(Self, RotatorHandle), BuildError> {
        let probe_timeout = Duration::from_millis(config.probe.timeout_ms);

        let source: Arc<dyn ConfigSource> = match &config.source.url {
            Some(url) => Arc::new(HttpConfigSource::new(
                Url::parse(url)?,
                Duration::from_millis(config.source.fetch_timeout_ms),
            )),
            None => Arc::new(StaticConfigSource::from_urls(&config.source.domains)?),
        };

        let blocklist: Option<Arc<dyn BlocklistChecker>> = match &config.blocklist {
            Some(settings) => Some(Arc::new(FilterAuthorityClient::new(
                Url::parse(&settings.endpoint)?,
                settings.api_key.clone(),
                // Same deadline discipline as probing, so a hung authority
                // cannot stall the cycle.
                probe_timeout,
            ))),
            None => None,
        };

        let order: Box<dyn OrderPolicy> = match config.order {
            OrderPolicyKind::Shuffle => Box::new(RandomShuffle),
            OrderPolicyKind::Sticky => Box::new(StickyRotation),
        };

        let resolver = Resolver::new(
            source,
            Arc::new(HttpProber::new()),
            blocklist,
            order,
            probe_timeout,
        );
        Ok(Self::new(
            resolver,
            Duration::from_millis(config.scheduler.poll_interval_ms),
        ))
    }

    /// Run until shutdown. Resolves once immediately, then on the
    /// configured interval, interleaving manual triggers.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "rotation scheduler starting"
        );

        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let waiters = tokio::select! {
                _ = ticker.tick() => Vec::new(),
                command = self.commands.recv() => match command {
                    Some(Command::Resolve { reply }) => vec![reply],
                    None => break,
                },
                _ = shutdown.recv() => break,
            };

            if !self.run_cycle(waiters, &mut shutdown).await {
                break;
            }
        }

        tracing::info!("rotation scheduler stopped");
    }

    /// Run one cycle, then coalesce any triggers that queued while it was
    /// in flight. Returns false when shutdown interrupted the cycle.
    async fn run_cycle(
        &mut self,
        mut waiters: Vec<oneshot::Sender<ResolutionOutcome>>,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> bool {
        let cycle = CancellationToken::new();

        let outcome = tokio::select! {
            outcome = self.resolver.resolve(&cycle) => outcome,
            _ = shutdown.recv() => {
                cycle.cancel();
                tracing::debug!("shutdown interrupted resolution cycle");
                return false;
            }
        };

        // A superseded cycle committed nothing and has no outcome to
        // hand to waiters; dropping their channels surfaces SchedulerGone.
        let Some(outcome) = outcome else {
            tracing::debug!("superseded resolution cycle discarded");
            return true;
        };

        while let Ok(Command::Resolve { reply }) = self.commands.try_recv() {
            waiters.push(reply);
        }
        for reply in waiters {
            let _ = reply.send(outcome.clone());
        }
        true
    }
}
