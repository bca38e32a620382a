//! Candidate-list loading.
//!
//! # Responsibilities
//! - Fetch the current mirror list at the start of each resolution cycle
//! - Defeat intermediary caches (mirror lists change under blocking pressure)
//! - Reject malformed lists so the cycle ends in a config error, not a panic

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::resolver::candidate::{Candidate, CandidateError};

/// Wire shape of the remote mirror list.
#[derive(Debug, Deserialize)]
struct DomainList {
    domains: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to fetch mirror list: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mirror list is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidCandidate(#[from] CandidateError),

    #[error("mirror list is empty")]
    Empty,
}

/// Where the candidate list comes from. Loaded once per resolution cycle.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load(&self) -> Result<Vec<Candidate>, SourceError>;
}

/// Remote `domains.json` source.
pub struct HttpConfigSource {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl HttpConfigSource {
    pub fn new(url: Url, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            timeout,
        }
    }

    /// The list URL with a time-varying query parameter appended, so
    /// intermediary caches never serve a stale list.
    fn cache_defeating_url(&self) -> Url {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("t", &millis.to_string());
        url
    }
}

#[async_trait]
impl ConfigSource for HttpConfigSource {
    async fn load(&self) -> Result<Vec<Candidate>, SourceError> {
        let response = self
            .client
            .get(self.cache_defeating_url())
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        // Parse by hand rather than via `Response::json` so a malformed
        // body is distinguishable from a transport failure.
        let body = response.text().await?;
        let list: DomainList = serde_json::from_str(&body)?;
        candidates_from(list)
    }
}

/// Fixed list from the local settings file.
pub struct StaticConfigSource {
    candidates: Vec<Candidate>,
}

impl StaticConfigSource {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn from_urls(urls: &[String]) -> Result<Self, SourceError> {
        let candidates = urls
            .iter()
            .map(|raw| Candidate::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { candidates })
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn load(&self) -> Result<Vec<Candidate>, SourceError> {
        if self.candidates.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(self.candidates.clone())
    }
}

fn candidates_from(list: DomainList) -> Result<Vec<Candidate>, SourceError> {
    if list.domains.is_empty() {
        return Err(SourceError::Empty);
    }
    list.domains
        .iter()
        .map(|raw| Candidate::parse(raw).map_err(SourceError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_source_returns_configured_candidates() {
        let source = StaticConfigSource::from_urls(&[
            "https://a.example.com".to_string(),
            "https://b.example.com".to_string(),
        ])
        .unwrap();
        let candidates = source.load().await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].hostname(), "a.example.com");
    }

    #[tokio::test]
    async fn static_source_rejects_empty_list() {
        let source = StaticConfigSource::new(Vec::new());
        assert!(matches!(source.load().await, Err(SourceError::Empty)));
    }

    #[test]
    fn static_source_rejects_invalid_urls() {
        let result = StaticConfigSource::from_urls(&["not a url".to_string()]);
        assert!(matches!(result, Err(SourceError::InvalidCandidate(_))));
    }

    #[test]
    fn cache_defeating_url_varies_query() {
        let source = HttpConfigSource::new(
            Url::parse("https://cdn.example.com/domains.json").unwrap(),
            Duration::from_secs(3),
        );
        let url = source.cache_defeating_url();
        assert!(url.query().unwrap().starts_with("t="));
    }
}
