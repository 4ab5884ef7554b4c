//! Integration tests for the scan client against a live scan service.
//!
//! Each test binds a router to an ephemeral local port (the real one backed
//! by a mock market source, or a small stub) and drives it over HTTP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use polymarket_scan::api::{create_router, AppState};
use polymarket_scan::arbitrage::fetch_markets;
use polymarket_scan::config::Config;
use polymarket_scan::market::{GammaClient, MockConfig, MockMarketBuilder, MockMarketSource};
use polymarket_scan::scan::{
    FormValues, HttpFeed, MemorySurface, ScanOutcome, Scanner, Status, OPPORTUNITIES_PATH,
};

/// Serve a router on an ephemeral port and return its base URL.
async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn sports_source() -> MockMarketSource {
    let source = MockMarketSource::new();
    for (id, event, outcome, price) in [
        ("m1", "lakers-celtics", "Lakers", dec!(0.45)),
        ("m2", "lakers-celtics", "Celtics", dec!(0.50)),
        ("m3", "yankees-mets", "Yankees", dec!(0.40)),
        ("m4", "yankees-mets", "Mets", dec!(0.50)),
        ("m5", "fair-game", "Home", dec!(0.50)),
        ("m6", "fair-game", "Away", dec!(0.51)),
    ] {
        source.add_market(
            MockMarketBuilder::new(id)
                .event(event)
                .category("sports")
                .outcome(outcome, price)
                .build(),
        );
    }
    source
}

async fn service(source: MockMarketSource) -> String {
    spawn(create_router(AppState::new(Config::default(), Arc::new(source)))).await
}

fn scanner(base_url: &str, min_edge: &str) -> Scanner<HttpFeed, MemorySurface, FormValues> {
    Scanner::new(
        HttpFeed::with_http(reqwest::Client::new(), base_url),
        MemorySurface::new(),
        FormValues::with_values("sports", min_edge, "50", "10"),
    )
}

#[tokio::test]
async fn scan_renders_ranked_cards_from_service() {
    let base = service(sports_source()).await;
    let scanner = scanner(&base, "0.02");

    let outcome = scanner.run_scan().await;

    assert_eq!(outcome, ScanOutcome::Found(2));
    let surface = scanner.surface();
    let titles: Vec<_> = surface.cards().iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["yankees-mets", "lakers-celtics"]);
    assert_eq!(surface.cards()[0].badges, vec!["Total cost: 0.9000", "Edge: 0.1000"]);
    assert_eq!(surface.cards()[1].bundle[1].outcome, "Celtics");
    assert_eq!(surface.cards()[1].bundle[1].size, "100.00");
    assert_eq!(surface.status(), &Status::found(2));
}

#[tokio::test]
async fn scan_with_high_edge_reports_nothing_found() {
    let base = service(sports_source()).await;
    let scanner = scanner(&base, "0.5");

    assert_eq!(scanner.run_scan().await, ScanOutcome::Empty);
    assert!(scanner.surface().cards().is_empty());
    assert_eq!(scanner.surface().status(), &Status::empty());
}

#[tokio::test]
async fn upstream_failure_shows_generic_failure() {
    let base = service(MockMarketSource::with_config(MockConfig {
        fail_requests: true,
        ..Default::default()
    }))
    .await;
    let scanner = scanner(&base, "0.02");

    assert_eq!(scanner.run_scan().await, ScanOutcome::Failed);
    assert_eq!(scanner.surface().status(), &Status::failed());
}

#[tokio::test]
async fn invalid_form_value_is_rejected_by_service() {
    let base = service(sports_source()).await;
    let scanner = scanner(&base, "not-a-number");

    assert_eq!(scanner.run_scan().await, ScanOutcome::Failed);
    assert!(scanner.surface().cards().is_empty());
}

#[tokio::test]
async fn malformed_body_shows_generic_failure() {
    let base = spawn(Router::new().route(OPPORTUNITIES_PATH, get(|| async { "<html>oops</html>" })))
        .await;
    let scanner = scanner(&base, "0.02");

    assert_eq!(scanner.run_scan().await, ScanOutcome::Failed);
    assert_eq!(scanner.surface().status(), &Status::failed());
}

#[tokio::test]
async fn unreachable_service_shows_generic_failure() {
    // Bind then drop to get a port nobody is listening on.
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let scanner = scanner(&format!("http://{}", addr), "0.02");

    assert_eq!(scanner.run_scan().await, ScanOutcome::Failed);
    assert!(scanner.surface().cards().is_empty());
    assert_eq!(scanner.surface().status(), &Status::failed());
}

#[tokio::test]
async fn rescan_replaces_previous_cards() {
    let base = service(sports_source()).await;
    let scanner = scanner(&base, "0.02");

    scanner.run_scan().await;
    scanner.form().set("min-edge", "0.08");
    let outcome = scanner.run_scan().await;

    assert_eq!(outcome, ScanOutcome::Found(1));
    let surface = scanner.surface();
    assert_eq!(surface.cards().len(), 1);
    assert_eq!(surface.cards()[0].title, "yankees-mets");
}

#[tokio::test]
async fn failed_rescan_clears_cards_from_earlier_scan() {
    // Healthy listing for the first scan, then the upstream starts failing.
    let healthy = Arc::new(AtomicBool::new(true));
    let flag = healthy.clone();
    let base = spawn(Router::new().route(
        OPPORTUNITIES_PATH,
        get(move || {
            let flag = flag.clone();
            async move {
                if flag.load(Ordering::SeqCst) {
                    Json(json!([{
                        "event_key": "lakers-celtics",
                        "total_cost": 0.95,
                        "edge": 0.05,
                        "orders": [{"outcome": "Lakers", "limit_price": 0.45, "size": 111.11}]
                    }]))
                    .into_response()
                } else {
                    StatusCode::BAD_GATEWAY.into_response()
                }
            }
        }),
    ))
    .await;
    let scanner = scanner(&base, "0.02");

    assert_eq!(scanner.run_scan().await, ScanOutcome::Found(1));
    healthy.store(false, Ordering::SeqCst);

    assert_eq!(scanner.run_scan().await, ScanOutcome::Failed);
    assert!(scanner.surface().cards().is_empty());
    assert_eq!(scanner.surface().status(), &Status::failed());
}

/// Stub Gamma `/markets`: pages a fixed listing by `offset` and `limit`.
async fn gamma_stub(entries: Vec<Value>) -> String {
    let entries = Arc::new(entries);
    spawn(Router::new().route(
        "/markets",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let entries = entries.clone();
            async move {
                let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
                let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(100);
                let page: Vec<Value> = entries.iter().skip(offset).take(limit).cloned().collect();
                Json(page)
            }
        }),
    ))
    .await
}

#[tokio::test]
async fn gamma_paging_survives_malformed_entries() {
    let bad = json!({"id": "bad", "outcomes": 5});
    let valid = |id: &str| {
        json!({
            "id": id,
            "question": "Who wins?",
            "eventSlug": "evt",
            "outcomes": "[\"Yes\", \"No\"]",
            "outcomePrices": "[\"0.45\", \"0.50\"]"
        })
    };
    let base = gamma_stub(vec![bad.clone(), bad, valid("m1"), valid("m2")]).await;
    let client = GammaClient::with_http(reqwest::Client::new(), &base);

    let markets = fetch_markets(&client, "", 10, 2).await.unwrap();

    let ids: Vec<_> = markets.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "m2"]);
}
