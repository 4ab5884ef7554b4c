//! Arbitrage opportunity detection.
//!
//! An event is an arbitrage when buying its cheapest quote for every outcome
//! costs less than the $1.00 one of them will pay out.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use super::calculator::ArbOpportunity;
use super::params::ScanParams;
use crate::error::MarketError;
use crate::market::{Market, MarketSource};
use crate::metrics;

/// Pull up to `max_markets` markets from the source, page by page.
///
/// The offset advances by the raw page length, so entries the source could
/// not parse neither end the scan nor shift later pages.
#[instrument(skip(source))]
pub async fn fetch_markets<S: MarketSource + ?Sized>(
    source: &S,
    category: &str,
    max_markets: usize,
    page_size: usize,
) -> Result<Vec<Market>, MarketError> {
    let mut markets: Vec<Market> = Vec::new();
    let mut offset = 0;
    let category = Some(category).filter(|c| !c.is_empty());

    while markets.len() < max_markets {
        let limit = page_size.min(max_markets - markets.len());
        let page = source.list_markets(limit, offset, category).await?;
        if page.raw_len == 0 {
            break;
        }
        debug!(
            offset,
            fetched = page.raw_len,
            parsed = page.markets.len(),
            "Fetched market page"
        );
        offset += page.raw_len;
        markets.extend(page.markets);
    }

    // A source that ignores `limit` must not push us past the cap.
    markets.truncate(max_markets);

    info!(count = markets.len(), "Fetched markets");
    metrics::inc_markets_fetched(markets.len() as u64);
    Ok(markets)
}

/// Group markets by event key, keeping first-seen event order.
pub fn group_by_event(markets: &[Market]) -> Vec<(&str, Vec<&Market>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Market>)> = Vec::new();

    for market in markets {
        let key = market.event_key();
        match index.get(key) {
            Some(&i) => groups[i].1.push(market),
            None => {
                index.insert(key, groups.len());
                groups.push((key, vec![market]));
            }
        }
    }

    groups
}

/// Lowest positive price per outcome across an event's markets, with the
/// market that offers it.
pub fn best_prices_for_event(
    markets: &[&Market],
) -> (Vec<(String, Decimal)>, BTreeMap<String, String>) {
    let mut best_prices: Vec<(String, Decimal)> = Vec::new();
    let mut market_map: BTreeMap<String, String> = BTreeMap::new();

    for market in markets {
        for (outcome, price) in market.priced_outcomes() {
            if price <= Decimal::ZERO {
                continue;
            }
            match best_prices.iter_mut().find(|(name, _)| name == outcome) {
                Some((_, best)) if price >= *best => continue,
                Some((_, best)) => *best = price,
                None => best_prices.push((outcome.to_string(), price)),
            }
            market_map.insert(outcome.to_string(), market.id.clone());
        }
    }

    (best_prices, market_map)
}

/// Find every event whose bundle clears `min_edge`, cheapest first.
pub fn find_arbitrage(markets: &[Market], min_edge: Decimal) -> Vec<ArbOpportunity> {
    let mut opportunities: Vec<ArbOpportunity> = group_by_event(markets)
        .into_iter()
        .filter_map(|(event_key, event_markets)| {
            let (best_prices, markets) = best_prices_for_event(&event_markets);
            if best_prices.is_empty() {
                return None;
            }

            let Some(total_cost) = best_prices
                .iter()
                .try_fold(Decimal::ZERO, |acc, (_, p)| acc.checked_add(*p))
            else {
                warn!(event = event_key, "Skipping event: total cost overflows");
                return None;
            };
            let opportunity = ArbOpportunity {
                event_key: event_key.to_string(),
                total_cost,
                best_prices,
                markets,
            };

            if opportunity.edge() >= min_edge {
                debug!(
                    event = %opportunity.event_key,
                    total_cost = %opportunity.total_cost,
                    edge = %opportunity.edge(),
                    "Arbitrage opportunity detected"
                );
                Some(opportunity)
            } else {
                None
            }
        })
        .collect();

    // Stable: ties keep event order.
    opportunities.sort_by(|a, b| a.total_cost.cmp(&b.total_cost));
    opportunities
}

/// Run a full scan: fetch, detect, rank.
#[instrument(skip(source, params), fields(category = %params.category))]
pub async fn scan_opportunities<S: MarketSource + ?Sized>(
    source: &S,
    params: &ScanParams,
    page_size: usize,
) -> Result<Vec<ArbOpportunity>, MarketError> {
    let markets = fetch_markets(source, &params.category, params.max_markets, page_size).await?;
    let opportunities = find_arbitrage(&markets, params.min_edge);

    info!(
        markets = markets.len(),
        opportunities = opportunities.len(),
        min_edge = %params.min_edge,
        "Scan complete"
    );
    metrics::inc_opportunities_found(opportunities.len() as u64);

    Ok(opportunities)
}
