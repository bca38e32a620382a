//! Blocklist verification against an external filtering authority.
//!
//! # Responsibilities
//! - Ask the authority whether a hostname is flagged
//! - Bound the query with the same timeout discipline as probing
//! - Fail open: any error path reports "not blocked"
//!
//! # Design Decisions
//! - Fail-open trades an occasional route to a blocked mirror for never
//!   refusing service while the authority is slow or down
//! - Verdicts are point-in-time facts and are not cached across cycles

use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::observability::metrics;
use crate::resolver::candidate::BlockStatus;

/// Answers whether a hostname is flagged by the filtering authority.
#[async_trait]
pub trait BlocklistChecker: Send + Sync {
    /// `true` only on a definite "blocked" verdict; every error path is
    /// fail-open and reports `false`.
    async fn is_blocked(&self, hostname: &str, cancel: &CancellationToken) -> bool;
}

/// Wire shape of the authority's answer. Only the status field matters.
#[derive(Debug, Deserialize)]
struct AuthorityResponse {
    status: String,
}

#[derive(Debug, thiserror::Error)]
enum AuthorityError {
    #[error("authority request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authority query timed out after {0:?}")]
    DeadlineElapsed(Duration),

    #[error("authority query cancelled")]
    Cancelled,
}

/// HTTP client for a `GET <endpoint>?name=<hostname>&key=<key>` authority.
pub struct FilterAuthorityClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    timeout: Duration,
}

impl FilterAuthorityClient {
    pub fn new(endpoint: Url, api_key: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            timeout,
        }
    }

    async fn query(
        &self,
        hostname: &str,
        cancel: &CancellationToken,
    ) -> Result<BlockStatus, AuthorityError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("name", hostname)
            .append_pair("key", &self.api_key);

        let token = cancel.child_token();
        // One deadline over the whole exchange: an authority that answers
        // headers but stalls the body must not escape the timeout.
        let exchange = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            response.json::<AuthorityResponse>().await
        };

        let body = tokio::select! {
            _ = token.cancelled() => return Err(AuthorityError::Cancelled),
            settled = time::timeout(self.timeout, exchange) => settled
                .map_err(|_| AuthorityError::DeadlineElapsed(self.timeout))??,
        };

        Ok(BlockStatus {
            hostname: hostname.to_string(),
            blocked: body.status == "blocked",
            checked_at: SystemTime::now(),
        })
    }
}

#[async_trait]
impl BlocklistChecker for FilterAuthorityClient {
    async fn is_blocked(&self, hostname: &str, cancel: &CancellationToken) -> bool {
        match self.query(hostname, cancel).await {
            Ok(status) => {
                tracing::debug!(hostname, blocked = status.blocked, "authority verdict");
                status.blocked
            }
            Err(error) => {
                tracing::debug!(hostname, %error, "authority unavailable, failing open");
                metrics::record_blocklist_fail_open();
                false
            }
        }
    }
}
