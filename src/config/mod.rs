//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RotatorConfig (validated, immutable)
//!
//! per resolution cycle:
//!     source.rs fetches the current mirror list
//!     (remote domains.json with cache-defeating query, or inline list)
//! ```
//!
//! # Design Decisions
//! - Daemon settings are loaded once; the mirror list is re-fetched every
//!   cycle because candidate lists change under blocking pressure
//! - All settings sections have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod source;
pub mod validation;

pub use schema::{
    BlocklistConfig, ObservabilityConfig, OrderPolicyKind, ProbeConfig, RotatorConfig,
    SchedulerConfig, ServerConfig, SourceConfig,
};
pub use source::{ConfigSource, HttpConfigSource, SourceError, StaticConfigSource};
