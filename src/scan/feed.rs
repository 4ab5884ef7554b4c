//! Sources of ranked opportunities for the scanner.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::query::ScanQuery;
use crate::arbitrage::{into_payloads, scan_opportunities, ScanParams};
use crate::config::Config;
use crate::error::ScanError;
use crate::market::MarketSource;
use crate::types::Opportunity;

/// Path of the opportunities endpoint.
pub const OPPORTUNITIES_PATH: &str = "/api/opportunities";

/// Answers one scan query with a ranked opportunity list.
#[async_trait]
pub trait OpportunityFeed: Send + Sync {
    /// Fetch opportunities for the query. Exactly one attempt.
    async fn fetch(&self, query: &ScanQuery) -> Result<Vec<Opportunity>, ScanError>;
}

/// Feed that calls the scan service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFeed {
    /// Create a feed for the service at `base_url`.
    pub fn new(base_url: &str, config: &Config) -> Result<Self, ScanError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| ScanError::Transport(e.to_string()))?;
        Ok(Self::with_http(http, base_url))
    }

    /// Create a feed around an existing HTTP client.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full request URL for a query.
    pub fn url_for(&self, query: &ScanQuery) -> String {
        format!(
            "{}{}?{}",
            self.base_url,
            OPPORTUNITIES_PATH,
            query.to_query_string()
        )
    }
}

#[async_trait]
impl OpportunityFeed for HttpFeed {
    #[instrument(skip(self, query))]
    async fn fetch(&self, query: &ScanQuery) -> Result<Vec<Opportunity>, ScanError> {
        let url = self.url_for(query);
        debug!(url = %url, "Requesting opportunities");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ScanError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScanError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ScanError::Transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| ScanError::Decode(e.to_string()))
    }
}

/// Feed that runs detection in-process against a market source.
///
/// Parses the raw query the same way the HTTP endpoint does.
#[derive(Clone)]
pub struct LocalFeed {
    source: Arc<dyn MarketSource>,
    config: Arc<Config>,
}

impl LocalFeed {
    /// Create a feed over the given source.
    pub fn new(source: Arc<dyn MarketSource>, config: Arc<Config>) -> Self {
        Self { source, config }
    }
}

impl std::fmt::Debug for LocalFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFeed").finish_non_exhaustive()
    }
}

#[async_trait]
impl OpportunityFeed for LocalFeed {
    async fn fetch(&self, query: &ScanQuery) -> Result<Vec<Opportunity>, ScanError> {
        let params = ScanParams::parse(
            &self.config,
            Some(&query.category),
            Some(&query.min_edge),
            Some(&query.stake),
            Some(&query.max_markets),
        )
        .map_err(|e| {
            debug!(error = %e, "Rejected scan parameters");
            ScanError::Status { status: 400 }
        })?;

        let opportunities = scan_opportunities(self.source.as_ref(), &params, self.config.page_size)
            .await
            .map_err(|e| ScanError::Transport(e.to_string()))?;

        Ok(into_payloads(opportunities, params.stake)
            .into_iter()
            .map(|payload| payload.opportunity)
            .collect())
    }
}
