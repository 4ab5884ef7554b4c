//! Arbitrage module for detecting opportunities across event outcomes.
//!
//! This module handles:
//! - Query parameter parsing with configured defaults
//! - Paged market fetching and opportunity detection
//! - Cost, edge, and bundle calculations

pub mod calculator;
pub mod detector;
pub mod params;

pub use calculator::{into_payloads, ArbOpportunity, FloatAmount, OpportunityPayload};
pub use detector::{
    best_prices_for_event, fetch_markets, find_arbitrage, group_by_event, scan_opportunities,
};
pub use params::ScanParams;
