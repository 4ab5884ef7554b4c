//! Opportunity cards and the renderer that places them on a surface.

use rust_decimal::{Decimal, RoundingStrategy};

use super::surface::Surface;
use crate::types::{Opportunity, Order};

/// Heading of the order list inside every card.
pub const BUNDLE_HEADING: &str = "Suggested bundle";

/// Format a decimal with exactly `dp` places, rounding half away from zero.
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// One formatted line of a card's bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLine {
    /// Outcome name.
    pub outcome: String,
    /// Limit price, 4 decimals.
    pub limit_price: String,
    /// Size, 2 decimals.
    pub size: String,
}

impl From<&Order> for BundleLine {
    fn from(order: &Order) -> Self {
        Self {
            outcome: order.outcome.clone(),
            limit_price: format_fixed(order.limit_price, 4),
            size: format_fixed(order.size, 2),
        }
    }
}

/// Display model for one opportunity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Event key, verbatim.
    pub title: String,
    /// Badge texts: total cost then edge.
    pub badges: Vec<String>,
    /// Bundle lines in received order.
    pub bundle: Vec<BundleLine>,
}

impl Card {
    /// Build the card for an opportunity.
    pub fn from_opportunity(opportunity: &Opportunity) -> Self {
        Self {
            title: opportunity.event_key.clone(),
            badges: vec![
                format!("Total cost: {}", format_fixed(opportunity.total_cost, 4)),
                format!("Edge: {}", format_fixed(opportunity.edge, 4)),
            ],
            bundle: opportunity.orders.iter().map(BundleLine::from).collect(),
        }
    }

    /// HTML markup for the card. All text is escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"card\">");
        html.push_str(&format!("<h3>{}</h3>", escape_html(&self.title)));

        html.push_str("<div class=\"badge-row\">");
        for badge in &self.badges {
            html.push_str(&format!("<span class=\"badge\">{}</span>", escape_html(badge)));
        }
        html.push_str("</div>");

        html.push_str(&format!(
            "<div class=\"orders\"><strong>{}</strong>",
            BUNDLE_HEADING
        ));
        for line in &self.bundle {
            html.push_str(&format!(
                "<div><span>{}</span>Limit {} · Size {}</div>",
                escape_html(&line.outcome),
                line.limit_price,
                line.size
            ));
        }
        html.push_str("</div></div>");
        html
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Event: {}", self.title)?;
        writeln!(f, "{}", self.badges.join(" | "))?;
        writeln!(f, "{}:", BUNDLE_HEADING)?;
        for line in &self.bundle {
            writeln!(
                f,
                "  - Outcome: {} | Limit: {} | Size: {}",
                line.outcome, line.limit_price, line.size
            )?;
        }
        Ok(())
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Append one card per opportunity, in order.
///
/// Never clears the surface; that is the orchestrator's job.
pub fn render<S: Surface + ?Sized>(surface: &mut S, opportunities: &[Opportunity]) {
    for opportunity in opportunities {
        surface.append(Card::from_opportunity(opportunity));
    }
}
