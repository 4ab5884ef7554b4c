//! Cost, edge, and bundle sizing for arbitrage opportunities.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::types::{Opportunity, Order};

/// Detected arbitrage opportunity across all outcomes of one event.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbOpportunity {
    /// Event grouping key.
    pub event_key: String,
    /// Sum of the best price of every outcome.
    pub total_cost: Decimal,
    /// Best price per outcome, in first-seen outcome order.
    pub best_prices: Vec<(String, Decimal)>,
    /// Market offering each best price, keyed by outcome.
    pub markets: BTreeMap<String, String>,
}

impl ArbOpportunity {
    /// Guaranteed margin per share set (`1 - total_cost`).
    pub fn edge(&self) -> Decimal {
        Decimal::ONE - self.total_cost
    }

    /// Build the order bundle for a given stake per outcome.
    ///
    /// Each outcome gets `stake / price` shares at its best price. Returns
    /// `None` when a size does not fit in a `Decimal`.
    pub fn build_orders(&self, stake: Decimal) -> Option<Vec<Order>> {
        self.best_prices
            .iter()
            .map(|(outcome, price)| {
                Some(Order {
                    outcome: outcome.clone(),
                    limit_price: *price,
                    size: stake.checked_div(*price)?,
                })
            })
            .collect()
    }

    /// Convert to the wire payload served by `/api/opportunities`.
    ///
    /// Returns `None` when the bundle cannot be sized for `stake`.
    pub fn into_payload(self, stake: Decimal) -> Option<OpportunityPayload> {
        let Some(orders) = self.build_orders(stake) else {
            warn!(
                event = %self.event_key,
                stake = %stake,
                "Skipping opportunity: order size overflows"
            );
            return None;
        };
        let edge = self.edge();
        Some(OpportunityPayload {
            opportunity: Opportunity {
                event_key: self.event_key,
                total_cost: self.total_cost,
                edge,
                orders,
            },
            best_prices: self
                .best_prices
                .into_iter()
                .map(|(outcome, price)| (outcome, FloatAmount(price)))
                .collect(),
            markets: self.markets,
        })
    }
}

/// Size every opportunity for `stake`, dropping the ones that cannot be sized.
pub fn into_payloads(opportunities: Vec<ArbOpportunity>, stake: Decimal) -> Vec<OpportunityPayload> {
    opportunities
        .into_iter()
        .filter_map(|opp| opp.into_payload(stake))
        .collect()
}

/// Response entry: the opportunity plus the price and market maps behind it.
#[derive(Debug, Clone, Serialize)]
pub struct OpportunityPayload {
    /// Fields consumed by the scan client.
    #[serde(flatten)]
    pub opportunity: Opportunity,
    /// Best price per outcome.
    pub best_prices: BTreeMap<String, FloatAmount>,
    /// Market ID per outcome.
    pub markets: BTreeMap<String, String>,
}

/// A decimal that serializes as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatAmount(pub Decimal);

impl Serialize for FloatAmount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}
