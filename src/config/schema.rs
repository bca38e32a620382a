//! Settings schema definitions.
//!
//! All types derive Serde traits for deserialization from the settings
//! file; every section has defaults so a minimal file works.

use serde::{Deserialize, Serialize};

/// Root settings for the rotator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RotatorConfig {
    /// Where the mirror list comes from.
    pub source: SourceConfig,

    /// Reachability probing settings.
    pub probe: ProbeConfig,

    /// Periodic re-resolution settings.
    pub scheduler: SchedulerConfig,

    /// Filtering-authority verification; omitted means probing only.
    pub blocklist: Option<BlocklistConfig>,

    /// Probing-order policy.
    pub order: OrderPolicyKind,

    /// HTTP surface of the rotation daemon.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Mirror-list source. Exactly one of `url` (remote `domains.json`) or
/// `domains` (inline list) must be set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL of a remote `{"domains": [...]}` document, fetched with a
    /// cache-defeating query parameter each cycle.
    pub url: Option<String>,

    /// Inline mirror list.
    pub domains: Vec<String>,

    /// Timeout for fetching the remote list, in milliseconds.
    pub fetch_timeout_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            domains: Vec::new(),
            fetch_timeout_ms: 3_000,
        }
    }
}

/// Reachability probe settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-probe deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_ms: 3_000 }
    }
}

/// Periodic re-resolution settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Interval between scheduled resolution cycles, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 30_000,
        }
    }
}

/// Filtering-authority settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlocklistConfig {
    /// Base URL of the authority's query endpoint.
    pub endpoint: String,

    /// Credential passed as the `key` query parameter.
    pub api_key: String,
}

/// Probing-order policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderPolicyKind {
    /// Fresh uniform shuffle every cycle.
    #[default]
    Shuffle,
    /// Configured order, starting from the last known good endpoint.
    Sticky,
}

/// Daemon HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
