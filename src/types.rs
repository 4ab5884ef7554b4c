//! Wire types shared by the scan service and the scan client.
//!
//! Amounts are exact decimals in memory but travel as JSON numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One suggested order inside an opportunity's bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Outcome to buy.
    pub outcome: String,
    /// Limit price for the order.
    #[serde(with = "rust_decimal::serde::float")]
    pub limit_price: Decimal,
    /// Number of shares.
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
}

/// A ranked opportunity as returned by `GET /api/opportunities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Display identifier of the event.
    pub event_key: String,
    /// Combined cost of one share of every outcome.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cost: Decimal,
    /// Expected margin (`1 - total_cost`).
    #[serde(with = "rust_decimal::serde::float")]
    pub edge: Decimal,
    /// Suggested bundle, in execution order.
    #[serde(default)]
    pub orders: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn opportunity_parses_numbers_and_ignores_extra_fields() {
        let json = r#"{
            "event_key": "nba-lakers-celtics",
            "total_cost": 0.97,
            "edge": 0.03,
            "best_prices": {"Lakers": 0.45},
            "markets": {"Lakers": "123"},
            "orders": [{"outcome": "Lakers", "limit_price": 0.45, "size": 222.22}]
        }"#;

        let opp: Opportunity = serde_json::from_str(json).unwrap();

        assert_eq!(opp.event_key, "nba-lakers-celtics");
        assert_eq!(opp.total_cost, dec!(0.97));
        assert_eq!(opp.edge, dec!(0.03));
        assert_eq!(opp.orders.len(), 1);
        assert_eq!(opp.orders[0].limit_price, dec!(0.45));
    }

    #[test]
    fn missing_orders_defaults_to_empty_bundle() {
        let json = r#"{"event_key": "e", "total_cost": 1.0, "edge": 0.0}"#;

        let opp: Opportunity = serde_json::from_str(json).unwrap();

        assert!(opp.orders.is_empty());
    }

    #[test]
    fn amounts_serialize_as_json_numbers() {
        let order = Order {
            outcome: "Yes".to_string(),
            limit_price: dec!(0.5),
            size: dec!(200),
        };

        let value = serde_json::to_value(&order).unwrap();

        assert!(value["limit_price"].is_number());
        assert_eq!(value["size"].as_f64(), Some(200.0));
    }
}
