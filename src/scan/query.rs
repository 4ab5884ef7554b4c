//! Scan query collection from form controls.

use std::collections::HashMap;
use std::sync::RwLock;

use url::form_urlencoded;

/// Control ID of the category input.
pub const CATEGORY_CONTROL: &str = "category";
/// Control ID of the minimum-edge input.
pub const MIN_EDGE_CONTROL: &str = "min-edge";
/// Control ID of the stake input.
pub const STAKE_CONTROL: &str = "stake";
/// Control ID of the max-markets input.
pub const MAX_MARKETS_CONTROL: &str = "max-markets";
/// Control ID of the scan trigger.
pub const SCAN_BUTTON: &str = "scan-btn";
/// Element ID of the status region.
pub const STATUS_REGION: &str = "status";
/// Element ID of the results container.
pub const RESULTS_GRID: &str = "results-grid";

/// Anything that exposes named form controls.
pub trait ScanForm: Send + Sync {
    /// Current value of the control with the given ID, if it exists.
    fn control_value(&self, id: &str) -> Option<String>;
}

/// In-memory form state, editable between scans.
#[derive(Debug, Default)]
pub struct FormValues {
    values: RwLock<HashMap<String, String>>,
}

impl FormValues {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a form with all four scan controls filled in.
    pub fn with_values(category: &str, min_edge: &str, stake: &str, max_markets: &str) -> Self {
        let form = Self::new();
        form.set(CATEGORY_CONTROL, category);
        form.set(MIN_EDGE_CONTROL, min_edge);
        form.set(STAKE_CONTROL, stake);
        form.set(MAX_MARKETS_CONTROL, max_markets);
        form
    }

    /// Set the value of a control.
    pub fn set(&self, id: &str, value: impl Into<String>) {
        self.values
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string(), value.into());
    }
}

impl ScanForm for FormValues {
    fn control_value(&self, id: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }
}

/// Scan parameters exactly as typed into the form.
///
/// Values are never parsed or validated here; the service owns that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanQuery {
    /// Market category.
    pub category: String,
    /// Minimum edge.
    pub min_edge: String,
    /// Stake per bundle.
    pub stake: String,
    /// Market cap.
    pub max_markets: String,
}

impl ScanQuery {
    /// Read the four scan controls from a form.
    ///
    /// A missing control reads as an empty string.
    pub fn collect<F: ScanForm + ?Sized>(form: &F) -> Self {
        let read = |id: &str| form.control_value(id).unwrap_or_default();
        Self {
            category: read(CATEGORY_CONTROL),
            min_edge: read(MIN_EDGE_CONTROL),
            stake: read(STAKE_CONTROL),
            max_markets: read(MAX_MARKETS_CONTROL),
        }
    }

    /// Form-urlencoded query string, one parameter per field.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("category", &self.category)
            .append_pair("min_edge", &self.min_edge)
            .append_pair("stake", &self.stake)
            .append_pair("max_markets", &self.max_markets)
            .finish()
    }

    /// Decode a query string produced by [`ScanQuery::to_query_string`].
    ///
    /// Unknown keys are ignored; missing keys decode as empty strings.
    pub fn from_query_string(query: &str) -> Self {
        let mut decoded = Self::default();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            let slot = match &*key {
                "category" => &mut decoded.category,
                "min_edge" => &mut decoded.min_edge,
                "stake" => &mut decoded.stake,
                "max_markets" => &mut decoded.max_markets,
                _ => continue,
            };
            *slot = value.into_owned();
        }
        decoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collect_reads_values_verbatim() {
        let form = FormValues::with_values("sports", " 0.02", "abc", "10");

        let query = ScanQuery::collect(&form);

        assert_eq!(query.category, "sports");
        assert_eq!(query.min_edge, " 0.02");
        assert_eq!(query.stake, "abc");
        assert_eq!(query.max_markets, "10");
    }

    #[test]
    fn collect_reads_missing_controls_as_empty() {
        let form = FormValues::new();
        form.set(CATEGORY_CONTROL, "politics");

        let query = ScanQuery::collect(&form);

        assert_eq!(query.category, "politics");
        assert_eq!(query.min_edge, "");
    }

    #[test]
    fn query_string_has_one_parameter_per_field() {
        let query = ScanQuery::collect(&FormValues::with_values("sports", "0.02", "50", "10"));

        assert_eq!(
            query.to_query_string(),
            "category=sports&min_edge=0.02&stake=50&max_markets=10"
        );
    }

    #[test]
    fn query_string_round_trips() {
        let query = ScanQuery::collect(&FormValues::with_values("sports", "0.02", "50", "10"));

        assert_eq!(ScanQuery::from_query_string(&query.to_query_string()), query);
    }

    #[test]
    fn query_string_escapes_reserved_characters() {
        let query = ScanQuery {
            category: "a&b=c d".to_string(),
            min_edge: "1%".to_string(),
            stake: "".to_string(),
            max_markets: "€".to_string(),
        };

        let encoded = query.to_query_string();

        assert!(encoded.starts_with("category=a%26b%3Dc+d&min_edge=1%25"));
        assert_eq!(ScanQuery::from_query_string(&encoded), query);
    }
}
