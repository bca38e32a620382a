//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the mirror-list source is usable (url xor inline domains)
//! - Validate value ranges (timeouts and intervals > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: RotatorConfig → Result<(), Vec<ValidationError>>
//! - Runs before settings are accepted into the system

use url::Url;

use crate::config::schema::RotatorConfig;
use crate::resolver::candidate::Candidate;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("source: either `url` or `domains` must be set")]
    NoSource,

    #[error("source: `url` and inline `domains` are mutually exclusive")]
    AmbiguousSource,

    #[error("source: invalid url {0:?}")]
    InvalidSourceUrl(String),

    #[error("source: invalid mirror {0:?}")]
    InvalidMirror(String),

    #[error("probe: timeout_ms must be greater than zero")]
    ZeroProbeTimeout,

    #[error("source: fetch_timeout_ms must be greater than zero")]
    ZeroFetchTimeout,

    #[error("scheduler: poll_interval_ms must be greater than zero")]
    ZeroPollInterval,

    #[error("blocklist: invalid endpoint {0:?}")]
    InvalidBlocklistEndpoint(String),

    #[error("blocklist: api_key must not be empty")]
    EmptyApiKey,
}

/// Validate settings semantically. Collects every violation.
pub fn validate_config(config: &RotatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match (&config.source.url, config.source.domains.is_empty()) {
        (None, true) => errors.push(ValidationError::NoSource),
        (Some(_), false) => errors.push(ValidationError::AmbiguousSource),
        (Some(url), true) => {
            if Url::parse(url).is_err() {
                errors.push(ValidationError::InvalidSourceUrl(url.clone()));
            }
        }
        (None, false) => {
            for raw in &config.source.domains {
                if Candidate::parse(raw).is_err() {
                    errors.push(ValidationError::InvalidMirror(raw.clone()));
                }
            }
        }
    }

    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::ZeroProbeTimeout);
    }
    if config.source.fetch_timeout_ms == 0 {
        errors.push(ValidationError::ZeroFetchTimeout);
    }
    if config.scheduler.poll_interval_ms == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }

    if let Some(blocklist) = &config.blocklist {
        if Url::parse(&blocklist.endpoint).is_err() {
            errors.push(ValidationError::InvalidBlocklistEndpoint(
                blocklist.endpoint.clone(),
            ));
        }
        if blocklist.api_key.is_empty() {
            errors.push(ValidationError::EmptyApiKey);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
