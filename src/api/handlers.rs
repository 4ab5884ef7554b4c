//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use url::form_urlencoded;

use super::page::render_page;
use crate::arbitrage::{into_payloads, scan_opportunities, OpportunityPayload, ScanParams};
use crate::config::Config;
use crate::error::{MarketError, ParamsError};
use crate::market::MarketSource;
use crate::scan::{FormValues, HtmlSurface, LocalFeed, ScanQuery, Scanner};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration.
    pub config: Arc<Config>,
    /// Upstream market listing.
    pub source: Arc<dyn MarketSource>,
    /// Prometheus handle, if a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(config: Config, source: Arc<dyn MarketSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error.
    pub error: String,
}

/// Raw query parameters of `/api/opportunities`.
#[derive(Debug, Default, Deserialize)]
pub struct OpportunitiesQuery {
    /// Market category.
    pub category: Option<String>,
    /// Minimum edge.
    pub min_edge: Option<String>,
    /// Stake per outcome.
    pub stake: Option<String>,
    /// Market cap.
    pub max_markets: Option<String>,
}

/// Errors surfaced by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Query parameters did not parse.
    BadRequest(ParamsError),
    /// Upstream market data could not be fetched.
    Upstream(MarketError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(e) => {
                warn!(error = %e, "Rejected opportunities query");
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Upstream(e) => {
                error!(error = %e, "Upstream market fetch failed");
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Ranked opportunities for the given scan parameters.
pub async fn opportunities(
    State(state): State<AppState>,
    Query(query): Query<OpportunitiesQuery>,
) -> Result<Json<Vec<OpportunityPayload>>, ApiError> {
    let params = ScanParams::parse(
        &state.config,
        query.category.as_deref(),
        query.min_edge.as_deref(),
        query.stake.as_deref(),
        query.max_markets.as_deref(),
    )
    .map_err(ApiError::BadRequest)?;

    let found = scan_opportunities(state.source.as_ref(), &params, state.config.page_size)
        .await
        .map_err(ApiError::Upstream)?;

    Ok(Json(into_payloads(found, params.stake)))
}

/// Prometheus metrics in text exposition format.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Server-rendered scan page.
///
/// The form submits back here; a request carrying `scan` runs one scan
/// through the same [`Scanner`] the CLI uses.
pub async fn scan_page(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Html<String> {
    let raw = raw.unwrap_or_default();
    let submitted = ScanQuery::from_query_string(&raw);
    let prefill = ScanQuery {
        category: or_default(submitted.category, || state.config.default_category.clone()),
        min_edge: or_default(submitted.min_edge, || state.config.default_min_edge.to_string()),
        stake: or_default(submitted.stake, || state.config.default_stake.to_string()),
        max_markets: or_default(submitted.max_markets, || {
            state.config.default_max_markets.to_string()
        }),
    };

    let triggered = form_urlencoded::parse(raw.as_bytes()).any(|(key, _)| key == "scan");

    let surface = if triggered {
        let form = FormValues::with_values(
            &prefill.category,
            &prefill.min_edge,
            &prefill.stake,
            &prefill.max_markets,
        );
        let feed = LocalFeed::new(state.source.clone(), state.config.clone());
        let scanner = Scanner::new(feed, HtmlSurface::new(), form);
        scanner.run_scan().await;
        scanner.into_surface()
    } else {
        HtmlSurface::new()
    };

    Html(render_page(&prefill, &surface))
}

fn or_default(value: String, default: impl FnOnce() -> String) -> String {
    if value.trim().is_empty() {
        default()
    } else {
        value
    }
}
