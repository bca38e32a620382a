//! Endpoint resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Scheduler / manual trigger
//!     → engine.rs (one cycle: load list, order, probe, verify, commit)
//!         → order.rs (shuffle or sticky rotation)
//!         → probe.rs (bounded-time reachability check)
//!         → blocklist.rs (authority verdict, fail-open)
//!     → state.rs (committed snapshot, published via watch)
//! ```
//!
//! # Design Decisions
//! - Sequential probing within a cycle; single-flight across cycles
//! - Probers, blocklist checkers, and list sources are trait objects so
//!   the engine can be exercised against scripted fakes
//! - All per-candidate failures are outcome values, never errors

pub mod blocklist;
pub mod candidate;
pub mod engine;
pub mod order;
pub mod probe;
pub mod state;

pub use candidate::{Candidate, ProbeOutcome, ProbeResult};
pub use engine::Resolver;
pub use state::{ResolutionOutcome, RotationState};
