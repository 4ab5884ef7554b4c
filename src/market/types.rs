//! Market types for Gamma-listed prediction markets.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::error::MarketError;

/// A listed market with its outcome prices.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    /// Unique market identifier.
    pub id: String,
    /// Market question text.
    pub question: String,
    /// Category label, if the listing carries one.
    pub category: Option<String>,
    /// Parent event ID.
    pub event_id: Option<String>,
    /// Parent event slug.
    pub event_slug: Option<String>,
    /// Outcome names, parallel to `outcome_prices`.
    pub outcomes: Vec<String>,
    /// Outcome prices, parallel to `outcomes`.
    pub outcome_prices: Vec<Decimal>,
}

impl Market {
    /// Key used to group sibling markets of the same event.
    ///
    /// Slug first, then event ID, then the question text.
    pub fn event_key(&self) -> &str {
        [self.event_slug.as_deref(), self.event_id.as_deref()]
            .into_iter()
            .flatten()
            .find(|key| !key.is_empty())
            .unwrap_or(&self.question)
    }

    /// Iterate over `(outcome, price)` pairs.
    pub fn priced_outcomes(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.outcomes
            .iter()
            .map(String::as_str)
            .zip(self.outcome_prices.iter().copied())
    }
}

/// One page of a market listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketPage {
    /// Entries that parsed into markets.
    pub markets: Vec<Market>,
    /// Entries the upstream returned, parsed or not. Paging advances by this.
    pub raw_len: usize,
}

/// Raw market entry from the Gamma `/markets` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GammaMarket {
    /// Market ID (number or string upstream).
    pub id: Option<Value>,
    /// Market question.
    pub question: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Event ID.
    #[serde(alias = "eventId")]
    pub event_id: Option<Value>,
    /// Event slug.
    #[serde(alias = "eventSlug")]
    pub event_slug: Option<String>,
    /// Outcomes: a JSON array or a JSON-encoded string of one.
    pub outcomes: Option<Value>,
    /// Outcome prices: same encoding rules as `outcomes`.
    #[serde(rename = "outcomePrices")]
    pub outcome_prices: Option<Value>,
}

impl TryFrom<GammaMarket> for Market {
    type Error = MarketError;

    fn try_from(raw: GammaMarket) -> Result<Self, Self::Error> {
        let outcomes = unpack_list(raw.outcomes)?
            .into_iter()
            .map(|v| scalar_to_string(&v))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| MarketError::ParseError("non-scalar outcome name".to_string()))?;

        let outcome_prices = unpack_list(raw.outcome_prices)?
            .into_iter()
            .map(|v| {
                scalar_to_string(&v)
                    .and_then(|s| s.parse::<Decimal>().ok())
                    .ok_or_else(|| MarketError::ParseError(format!("invalid outcome price {v}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Market {
            id: raw.id.as_ref().and_then(scalar_to_string).unwrap_or_default(),
            question: raw.question.unwrap_or_default(),
            category: raw.category,
            event_id: raw.event_id.as_ref().and_then(scalar_to_string),
            event_slug: raw.event_slug,
            outcomes,
            outcome_prices,
        })
    }
}

/// Gamma sometimes embeds arrays as JSON strings (`"[\"Yes\", \"No\"]"`).
fn unpack_list(value: Option<Value>) -> Result<Vec<Value>, MarketError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(Vec::new()),
        Some(Value::String(s)) => serde_json::from_str::<Vec<Value>>(&s)
            .map_err(|e| MarketError::ParseError(format!("invalid embedded list {s:?}: {e}"))),
        Some(other) => Err(MarketError::ParseError(format!("expected list, got {other}"))),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
