//! The resolution cycle.
//!
//! # Data Flow
//! ```text
//! resolve():
//!     ConfigSource.load() ──err──▶ commit ConfigError
//!         │
//!     OrderPolicy.order(candidates, last known good)
//!         │
//!     for each candidate, strictly in sequence:
//!         Prober.check() ──not reachable──▶ next candidate
//!         BlocklistChecker.is_blocked() ──blocked──▶ next candidate
//!         otherwise: commit Resolved(candidate), done
//!         │
//!     loop exhausted ──▶ commit Exhausted
//! ```
//!
//! # Design Decisions
//! - Probing is sequential, not fanned out: one outbound connection at a
//!   time keeps worst-case cycle latency at candidates × probe timeout
//! - First qualifying candidate wins; no latency scoring
//! - Per-candidate failures never abort the cycle; only a failed list
//!   load is cycle-fatal
//! - The resolver is the sole writer of the rotation state, and commits
//!   nothing when its cycle is cancelled mid-flight

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::source::ConfigSource;
use crate::observability::metrics;
use crate::resolver::blocklist::BlocklistChecker;
use crate::resolver::order::OrderPolicy;
use crate::resolver::probe::Prober;
use crate::resolver::state::{ResolutionOutcome, RotationState};

/// Selects one usable mirror endpoint per cycle.
///
/// Single-flight is structural: `resolve` takes `&mut self`, and the
/// scheduler task is the resolver's only owner.
pub struct Resolver {
    source: Arc<dyn ConfigSource>,
    prober: Arc<dyn Prober>,
    blocklist: Option<Arc<dyn BlocklistChecker>>,
    order: Box<dyn OrderPolicy>,
    probe_timeout: Duration,
    state: watch::Sender<RotationState>,
}

impl Resolver {
    pub fn new(
        source: Arc<dyn ConfigSource>,
        prober: Arc<dyn Prober>,
        blocklist: Option<Arc<dyn BlocklistChecker>>,
        order: Box<dyn OrderPolicy>,
        probe_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(RotationState::default());
        Self {
            source,
            prober,
            blocklist,
            order,
            probe_timeout,
            state,
        }
    }

    /// Subscribe to committed rotation-state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<RotationState> {
        self.state.subscribe()
    }

    /// Run one resolution cycle to a terminal outcome.
    ///
    /// Returns `None` when the cycle was cancelled mid-flight; a
    /// cancelled cycle commits nothing, so `None` is never mistakable
    /// for a real terminal outcome.
    pub async fn resolve(&mut self, cancel: &CancellationToken) -> Option<ResolutionOutcome> {
        let candidates = match self.source.load().await {
            Ok(candidates) => candidates,
            Err(error) => {
                tracing::warn!(%error, "mirror list unavailable");
                return Some(self.commit(ResolutionOutcome::ConfigError));
            }
        };

        let last_good = self.state.borrow().current_endpoint.clone();
        let order = self.order.order(&candidates, last_good.as_ref());
        tracing::debug!(
            candidates = order.len(),
            policy = self.order.name(),
            "resolution cycle starting"
        );

        for candidate in order {
            if cancel.is_cancelled() {
                tracing::debug!("resolution cycle cancelled, nothing committed");
                return None;
            }

            let probe = self.prober.check(&candidate, self.probe_timeout, cancel).await;
            metrics::record_probe(probe.outcome, probe.latency);
            if !probe.is_reachable() {
                tracing::debug!(
                    candidate = %candidate,
                    outcome = probe.outcome.as_str(),
                    "candidate skipped"
                );
                continue;
            }

            if let Some(blocklist) = &self.blocklist {
                if blocklist.is_blocked(candidate.hostname(), cancel).await {
                    tracing::info!(candidate = %candidate, "candidate flagged by authority");
                    continue;
                }
            }

            tracing::info!(
                candidate = %candidate,
                latency_ms = probe.latency.as_millis() as u64,
                "working mirror selected"
            );
            return Some(self.commit(ResolutionOutcome::Resolved(candidate)));
        }

        tracing::warn!("no reachable, unblocked mirror found");
        Some(self.commit(ResolutionOutcome::Exhausted))
    }

    fn commit(&self, outcome: ResolutionOutcome) -> ResolutionOutcome {
        self.state.send_modify(|state| state.commit(&outcome));
        metrics::record_cycle(&outcome);
        outcome
    }
}
