//! Backend-side scan parameters.
//!
//! The scan client forwards raw form strings; this is where they are
//! defaulted and parsed.

use rust_decimal::Decimal;

use crate::config::Config;
use crate::error::ParamsError;

/// Parsed parameters for one opportunity scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanParams {
    /// Market category filter.
    pub category: String,
    /// Minimum edge an opportunity must reach.
    pub min_edge: Decimal,
    /// Stake per outcome used to size the bundle.
    pub stake: Decimal,
    /// Maximum number of markets to pull from upstream.
    pub max_markets: usize,
}

impl ScanParams {
    /// Parse raw query values, falling back to the configured defaults for
    /// missing or blank ones.
    pub fn parse(
        config: &Config,
        category: Option<&str>,
        min_edge: Option<&str>,
        stake: Option<&str>,
        max_markets: Option<&str>,
    ) -> Result<Self, ParamsError> {
        Ok(Self {
            category: present(category)
                .map(str::to_string)
                .unwrap_or_else(|| config.default_category.clone()),
            min_edge: parse_decimal_or("min_edge", min_edge, config.default_min_edge)?,
            stake: parse_decimal_or("stake", stake, config.default_stake)?,
            max_markets: parse_or("max_markets", max_markets, config.default_max_markets)?,
        })
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<&str>,
    default: T,
) -> Result<T, ParamsError> {
    match present(value) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ParamsError::InvalidNumber {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Like [`parse_or`], but also accepts scientific notation (`1e-2`).
fn parse_decimal_or(
    name: &'static str,
    value: Option<&str>,
    default: Decimal,
) -> Result<Decimal, ParamsError> {
    match present(value) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(raw))
            .map_err(|_| ParamsError::InvalidNumber {
                name,
                value: raw.to_string(),
            }),
    }
}
