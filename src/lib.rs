//! Mirror endpoint rotation library.
//!
//! Resolves, from a configurable list of mirror endpoints, one that is
//! both network-reachable and not blocked by a filtering authority, so a
//! front-end can route a user session without manual endpoint selection.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resolver;
pub mod scheduler;
pub mod server;

pub use config::{loader::load_config, RotatorConfig};
pub use lifecycle::Shutdown;
pub use resolver::{ResolutionOutcome, Resolver, RotationState};
pub use scheduler::{RotatorHandle, Scheduler};
