//! Mock market source for unit testing.
//!
//! Serves a fixed market list with real limit/offset paging and
//! records every page request it receives.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::MarketError;

use super::types::{Market, MarketPage};
use super::MarketSource;

/// Configuration for mock source behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether to fail every request.
    pub fail_requests: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// A recorded `list_markets` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Requested page size.
    pub limit: usize,
    /// Requested offset.
    pub offset: usize,
    /// Requested category filter.
    pub category: Option<String>,
}

/// Mock market source for testing.
#[derive(Debug, Clone, Default)]
pub struct MockMarketSource {
    /// Mock configuration.
    config: MockConfig,
    /// Listing entries in order; `None` stands for an entry that fails to parse.
    markets: Arc<Mutex<Vec<Option<Market>>>>,
    /// Requests seen so far.
    requests: Arc<Mutex<Vec<PageRequest>>>,
}

impl MockMarketSource {
    /// Create a new mock source with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Add a market to the listing.
    pub fn add_market(&self, market: Market) {
        self.markets.lock().unwrap().push(Some(market));
    }

    /// Add an entry that counts toward paging but never yields a market.
    pub fn add_malformed(&self) {
        self.markets.lock().unwrap().push(None);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketSource for MockMarketSource {
    async fn list_markets(
        &self,
        limit: usize,
        offset: usize,
        category: Option<&str>,
    ) -> Result<MarketPage, MarketError> {
        self.requests.lock().unwrap().push(PageRequest {
            limit,
            offset,
            category: category.map(str::to_string),
        });

        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.config.fail_requests {
            return Err(MarketError::FetchFailed {
                offset,
                reason: "Mock market failure".to_string(),
            });
        }

        let entries = self.markets.lock().unwrap();
        let page: Vec<Option<Market>> = entries
            .iter()
            .filter(|entry| match (category, entry) {
                (Some(c), Some(m)) if !c.is_empty() => {
                    m.category.as_deref().map_or(true, |mc| mc == c)
                }
                _ => true,
            })
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(MarketPage {
            raw_len: page.len(),
            markets: page.into_iter().flatten().collect(),
        })
    }
}

/// Builder for creating mock markets.
#[derive(Debug, Clone)]
pub struct MockMarketBuilder {
    market: Market,
}

impl MockMarketBuilder {
    /// Create a new builder for the given market ID.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            market: Market {
                question: format!("Question {id}"),
                id,
                category: None,
                event_id: None,
                event_slug: None,
                outcomes: Vec::new(),
                outcome_prices: Vec::new(),
            },
        }
    }

    /// Set the parent event slug.
    pub fn event(mut self, slug: impl Into<String>) -> Self {
        self.market.event_slug = Some(slug.into());
        self
    }

    /// Set the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.market.category = Some(category.into());
        self
    }

    /// Add a priced outcome.
    pub fn outcome(mut self, name: impl Into<String>, price: Decimal) -> Self {
        self.market.outcomes.push(name.into());
        self.market.outcome_prices.push(price);
        self
    }

    /// Build the market.
    pub fn build(self) -> Market {
        self.market
    }
}
