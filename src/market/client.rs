//! Gamma API client.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::MarketError;
use crate::metrics;

use super::types::{GammaMarket, Market, MarketPage};
use super::MarketSource;

/// Client for the Polymarket Gamma market listing API.
#[derive(Debug, Clone)]
pub struct GammaClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL for the Gamma API.
    base_url: String,
}

impl GammaClient {
    /// Create a new Gamma client from config.
    pub fn new(config: &Config) -> Result<Self, MarketError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()?;

        Ok(Self::with_http(http, &config.gamma_api_url))
    }

    /// Create a client around an existing HTTP client.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MarketSource for GammaClient {
    #[instrument(skip(self))]
    async fn list_markets(
        &self,
        limit: usize,
        offset: usize,
        category: Option<&str>,
    ) -> Result<MarketPage, MarketError> {
        let url = format!("{}/markets", self.base_url);
        let start = Instant::now();

        let mut params = vec![
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("active", "true".to_string()),
            ("closed", "false".to_string()),
        ];
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            params.push(("category", category.to_string()));
        }

        debug!(url = %url, ?params, "Requesting markets");

        let response = self.http.get(&url).query(&params).send().await?;
        metrics::record_upstream_latency(start);

        if !response.status().is_success() {
            return Err(MarketError::FetchFailed {
                offset,
                reason: format!("HTTP {}", response.status()),
            });
        }

        let raw: Vec<GammaMarket> = response.json().await.map_err(|e| {
            MarketError::ParseError(format!("Failed to parse Gamma markets: {}", e))
        })?;

        let raw_len = raw.len();
        let mut markets = Vec::with_capacity(raw_len);
        for entry in raw {
            match Market::try_from(entry) {
                Ok(market) => markets.push(market),
                Err(e) => warn!(offset, error = %e, "Skipping malformed market"),
            }
        }

        Ok(MarketPage { markets, raw_len })
    }
}
