//! HTTP API route definitions.

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{health, metrics, opportunities, scan_page, AppState};
use crate::scan::OPPORTUNITIES_PATH;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // Scan page
        .route("/", get(scan_page))
        // API
        .route(OPPORTUNITIES_PATH, get(opportunities))
        // Health and metrics
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::market::{MockConfig, MockMarketBuilder, MockMarketSource};

    fn state_with(source: MockMarketSource) -> AppState {
        AppState::new(Config::default(), Arc::new(source))
    }

    fn arb_source() -> MockMarketSource {
        let source = MockMarketSource::new();
        source.add_market(
            MockMarketBuilder::new("m1")
                .event("lakers-celtics")
                .outcome("Lakers", dec!(0.45))
                .build(),
        );
        source.add_market(
            MockMarketBuilder::new("m2")
                .event("lakers-celtics")
                .outcome("Celtics", dec!(0.50))
                .build(),
        );
        source
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1_000_000).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let (status, body) = get(create_router(state_with(MockMarketSource::new())), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn opportunities_endpoint_returns_ranked_payload() {
        let app = create_router(state_with(arb_source()));

        let (status, body) = get(
            app,
            "/api/opportunities?category=sports&min_edge=0.02&stake=50&max_markets=10",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let first = &json[0];
        assert_eq!(first["event_key"], "lakers-celtics");
        assert_eq!(first["total_cost"].as_f64(), Some(0.95));
        assert_eq!(first["orders"][0]["outcome"], "Lakers");
        assert_eq!(first["orders"][1]["size"].as_f64(), Some(100.0));
        assert_eq!(first["markets"]["Celtics"], "m2");
    }

    #[tokio::test]
    async fn opportunities_endpoint_applies_defaults() {
        let (status, body) = get(create_router(state_with(arb_source())), "/api/opportunities").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        // Default stake is 100: 100 / 0.45.
        assert!(json[0]["orders"][0]["size"].as_f64().unwrap() > 222.2);
    }

    #[tokio::test]
    async fn opportunities_endpoint_skips_events_it_cannot_size() {
        let source = arb_source();
        source.add_market(
            MockMarketBuilder::new("m3")
                .event("dust")
                .outcome("Yes", dec!(0.0000000000000000000000000001))
                .outcome("No", dec!(0.5))
                .build(),
        );

        let (status, body) = get(
            create_router(state_with(source)),
            "/api/opportunities?stake=100&min_edge=0.01",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let keys: Vec<_> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["event_key"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["lakers-celtics"]);
    }

    #[tokio::test]
    async fn opportunities_endpoint_rejects_bad_numbers() {
        let (status, body) = get(
            create_router(state_with(arb_source())),
            "/api/opportunities?min_edge=lots",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("min_edge"));
    }

    #[tokio::test]
    async fn opportunities_endpoint_maps_upstream_failure_to_502() {
        let source = MockMarketSource::with_config(MockConfig {
            fail_requests: true,
            ..Default::default()
        });

        let (status, _) = get(create_router(state_with(source)), "/api/opportunities").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn scan_page_is_idle_until_triggered() {
        let (status, body) = get(create_router(state_with(arb_source())), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("value=\"sports\""));
        assert!(!body.contains("class=\"card\""));
    }

    #[tokio::test]
    async fn scan_page_renders_cards_when_triggered() {
        let (status, body) = get(
            create_router(state_with(arb_source())),
            "/?category=sports&min_edge=0.02&stake=50&max_markets=10&scan=1",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Found 1 opportunities."));
        assert!(body.contains("<h3>lakers-celtics</h3>"));
        assert!(body.contains("Total cost: 0.9500"));
        assert!(body.contains("Edge: 0.0500"));
        assert!(body.contains("<span>Celtics</span>Limit 0.5000 · Size 100.00"));
    }

    #[tokio::test]
    async fn scan_page_reports_failure() {
        let source = MockMarketSource::with_config(MockConfig {
            fail_requests: true,
            ..Default::default()
        });

        let (_, body) = get(create_router(state_with(source)), "/?scan=1").await;

        assert!(body.contains("Scan failed. Try again."));
    }

    #[tokio::test]
    async fn metrics_endpoint_without_recorder_is_404() {
        let (status, _) = get(create_router(state_with(MockMarketSource::new())), "/metrics").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
