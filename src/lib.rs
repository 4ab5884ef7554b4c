//! Polymarket multi-outcome arbitrage scanner.
//!
//! The backend groups Gamma-listed markets by event and looks for events where
//! buying the cheapest quote of every outcome costs less than $1.00, the
//! amount exactly one of them pays out:
//!
//! ```text
//! Lakers:   $0.45
//! Celtics:  $0.50
//! ─────────────────────
//! Total:    $0.95 < $1.00
//! Edge:     $0.05 per share set
//! ```
//!
//! The scan client collects parameters from a form, asks the backend for the
//! ranked list, and renders one card per opportunity.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`types`]: Wire types shared by service and client
//! - [`market`]: Market types and the Gamma client
//! - [`arbitrage`]: Opportunity detection and bundle sizing
//! - [`scan`]: Scan client (form, feed, orchestrator, renderer)
//! - [`api`]: HTTP API and server-rendered scan page
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod arbitrage;
pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod scan;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::{Result, ScannerError};
