//! Bounded-time reachability probing.
//!
//! # Responsibilities
//! - Issue one minimal request per candidate
//! - Enforce the probe deadline and cancel the request past it
//! - Convert every failure into an outcome value, never an error

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::resolver::candidate::{Candidate, ProbeOutcome, ProbeResult};

/// Tests a single candidate's reachability within a bounded time window.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe `candidate`, settling within `timeout`.
    ///
    /// `cancel` is the cycle's token; a superseded or shut-down cycle
    /// aborts the outstanding request through it.
    async fn check(
        &self,
        candidate: &Candidate,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ProbeResult;
}

/// HEAD-request prober.
///
/// A HEAD keeps the exchange minimal, and the outcome deliberately ignores
/// the HTTP status: mirrors sit behind assorted CDNs and redirectors, and
/// an answer of any status proves reachability.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new() -> Self {
        Self {
            // No client-level timeout; the per-probe deadline governs.
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn check(
        &self,
        candidate: &Candidate,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ProbeResult {
        let started = Instant::now();
        let token = cancel.child_token();
        let request = self.client.head(candidate.url().clone()).send();

        let outcome = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!(candidate = %candidate, "probe cancelled");
                ProbeOutcome::TimedOut
            }
            settled = time::timeout(timeout, request) => match settled {
                Ok(Ok(response)) => {
                    tracing::debug!(
                        candidate = %candidate,
                        status = %response.status(),
                        latency_ms = started.elapsed().as_millis() as u64,
                        "probe answered"
                    );
                    ProbeOutcome::Reachable
                }
                Ok(Err(error)) => {
                    tracing::debug!(candidate = %candidate, %error, "probe failed");
                    ProbeOutcome::Unreachable
                }
                Err(_) => {
                    tracing::debug!(
                        candidate = %candidate,
                        timeout_ms = timeout.as_millis() as u64,
                        "probe deadline elapsed"
                    );
                    ProbeOutcome::TimedOut
                }
            },
        };

        ProbeResult {
            outcome,
            latency: started.elapsed(),
        }
    }
}
