//! Candidate endpoints and per-probe result types.

use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use url::Url;

/// One mirror endpoint eligible for selection.
///
/// Immutable once loaded for a resolution cycle. The hostname is derived
/// from the URL and used as the blocklist lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate {
    url: Url,
}

impl Candidate {
    /// Parse a candidate from its URL string.
    ///
    /// Rejects URLs without a host, since a hostless URL can neither be
    /// probed nor checked against the blocklist.
    pub fn parse(raw: &str) -> Result<Self, CandidateError> {
        let url = Url::parse(raw).map_err(|source| CandidateError::Invalid {
            raw: raw.to_string(),
            source,
        })?;
        if url.host_str().is_none() {
            return Err(CandidateError::NoHost {
                raw: raw.to_string(),
            });
        }
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The hostname used as the blocklist key.
    pub fn hostname(&self) -> &str {
        // Guaranteed by `parse`.
        self.url.host_str().unwrap_or_default()
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.url.fmt(f)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CandidateError {
    #[error("invalid candidate URL {raw:?}: {source}")]
    Invalid {
        raw: String,
        #[source]
        source: url::ParseError,
    },

    #[error("candidate URL {raw:?} has no hostname")]
    NoHost { raw: String },
}

/// Outcome of a single reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The request settled before the deadline, regardless of HTTP status.
    /// Cross-origin mirrors may answer with opaque or non-2xx responses;
    /// any answer at all proves the endpoint is up.
    Reachable,
    /// A transport-level failure (DNS, TCP, TLS) before the deadline.
    Unreachable,
    /// The request did not settle within the probe timeout.
    TimedOut,
}

impl ProbeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeOutcome::Reachable => "reachable",
            ProbeOutcome::Unreachable => "unreachable",
            ProbeOutcome::TimedOut => "timed_out",
        }
    }
}

/// Result of one probe attempt. Discarded once the cycle completes.
#[derive(Debug, Clone, Copy)]
pub struct ProbeResult {
    pub outcome: ProbeOutcome,
    pub latency: Duration,
}

impl ProbeResult {
    pub fn is_reachable(&self) -> bool {
        self.outcome == ProbeOutcome::Reachable
    }
}

/// Point-in-time verdict from the filtering authority.
///
/// Deliberately not cached across cycles; authority state can change
/// between resolutions.
#[derive(Debug, Clone)]
pub struct BlockStatus {
    pub hostname: String,
    pub blocked: bool,
    pub checked_at: SystemTime,
}
