//! Market module for Gamma-listed prediction markets.
//!
//! This module handles:
//! - Market types and Gamma response parsing
//! - The `MarketSource` seam and its Gamma implementation
//! - Mock source for testing

pub mod client;
pub mod mock;
pub mod types;

use async_trait::async_trait;

use crate::error::MarketError;

pub use client::GammaClient;
pub use mock::{MockConfig, MockMarketBuilder, MockMarketSource, PageRequest};
pub use types::{GammaMarket, Market, MarketPage};

/// A paged listing of active, open markets.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Fetch one page of markets, optionally filtered by category.
    async fn list_markets(
        &self,
        limit: usize,
        offset: usize,
        category: Option<&str>,
    ) -> Result<MarketPage, MarketError>;
}
