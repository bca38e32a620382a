//! Rotation state: the last committed resolution result.
//!
//! # State Transitions
//! ```text
//! Empty (no endpoint) → Resolved(c): current_endpoint = c
//! Resolved(c) → Exhausted: current_endpoint unchanged (last known good kept)
//! any → ConfigError: current_endpoint unchanged
//! ```
//!
//! # Design Decisions
//! - Only the resolver commits, and only at the end of a cycle that was
//!   not superseded; readers observe snapshots through a watch channel
//! - An Exhausted or ConfigError cycle does not clear the last known good
//!   endpoint, so the UI can keep showing the most recent winner

use std::time::SystemTime;

use serde::Serialize;

use crate::resolver::candidate::Candidate;

/// Terminal outcome of one resolution cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "outcome", content = "domain")]
pub enum ResolutionOutcome {
    /// A reachable, unblocked candidate was found.
    Resolved(Candidate),
    /// Every candidate was tried and none qualified.
    Exhausted,
    /// The candidate list could not be loaded or was malformed.
    ConfigError,
}

impl ResolutionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionOutcome::Resolved(_) => "resolved",
            ResolutionOutcome::Exhausted => "exhausted",
            ResolutionOutcome::ConfigError => "config-error",
        }
    }
}

/// Snapshot of the rotation state as of the most recently completed cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RotationState {
    /// Winner of the most recently completed cycle that resolved, if any.
    pub current_endpoint: Option<Candidate>,
    /// Wall-clock time of the last completed cycle.
    pub last_resolved_at: Option<SystemTime>,
    /// Terminal outcome of the last completed cycle.
    pub last_outcome: Option<ResolutionOutcome>,
    /// Number of completed cycles since startup.
    pub cycles: u64,
}

impl RotationState {
    /// Fold a completed cycle's outcome into the state.
    pub fn commit(&mut self, outcome: &ResolutionOutcome) {
        if let ResolutionOutcome::Resolved(candidate) = outcome {
            self.current_endpoint = Some(candidate.clone());
        }
        self.last_resolved_at = Some(SystemTime::now());
        self.last_outcome = Some(outcome.clone());
        self.cycles += 1;
    }
}
