//! Product/market listing and single-market drill-down.

mod common;

use std::sync::Arc;

use common::{stat_body, FakeGateway};
use pricedesk::{CatalogQuery, Endpoint, MarketId, PriceDeskError, ProductId};
use serde_json::json;

fn india() -> MarketId {
    MarketId::new("India").unwrap()
}

fn charcoal() -> ProductId {
    ProductId::from("Coconut Shell Charcoal")
}

fn price_rows() -> serde_json::Value {
    json!([
        {"date": "2024-12-30T00:00:00", "market": "India", "product": "Coconut Shell Charcoal", "price": 500.0},
        {"date": "2025-01-06T00:00:00", "market": "India", "product": "Coconut Shell Charcoal", "price": 540.0},
        {"date": "2025-01-13T00:00:00", "market": "India", "product": "Coconut Shell Charcoal", "price": 560.0,
         "currency": "USD", "unit": "per tonne", "source_url": "https://example.org/report.pdf"}
    ])
}

#[tokio::test]
async fn products_and_markets_decode() {
    let gw = Arc::new(
        FakeGateway::new()
            .endpoint_ok(Endpoint::Products, 0, json!(["Coconut Shell Charcoal", "Desiccated Coconut"]))
            .endpoint_ok(Endpoint::MarketsByProduct, 0, json!(["India", "Sri Lanka"])),
    );
    let catalog = CatalogQuery::new(gw.clone());

    let products = catalog.products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].as_str(), "Desiccated Coconut");

    let markets = catalog.markets(&charcoal()).await.unwrap();
    assert_eq!(markets, vec![india(), MarketId::new("Sri Lanka").unwrap()]);
    let req = &gw.requests_to(Endpoint::MarketsByProduct)[0];
    assert_eq!(req.param("product"), Some("Coconut Shell Charcoal"));
}

#[tokio::test]
async fn unexpected_listing_shape_is_a_transport_decode_error() {
    let gw = Arc::new(FakeGateway::new().endpoint_ok(Endpoint::Products, 0, json!({"items": []})));
    let catalog = CatalogQuery::new(gw);

    let err = catalog.products().await.unwrap_err();
    assert!(matches!(err, PriceDeskError::Transport(ref e) if e.endpoint == "/products"));
}

#[tokio::test]
async fn market_detail_fetches_prices_and_stats_together() {
    let gw = Arc::new(
        FakeGateway::new()
            .endpoint_ok(Endpoint::PricesFiltered, 20, price_rows())
            .analytics_ok("India", 20, stat_body("India", 533.0)),
    );
    let catalog = CatalogQuery::new(gw.clone());

    let detail = catalog.market_detail(&charcoal(), &india()).await.unwrap();

    assert_eq!(gw.max_in_flight(), 2);
    assert_eq!(detail.stat.market, india());
    assert_eq!(detail.prices.len(), 3);
    assert_eq!(detail.prices[2].source_url.as_deref(), Some("https://example.org/report.pdf"));
    assert_eq!(detail.monthly.len(), 2);
    assert_eq!(detail.monthly[1].avg, 550.0);
    assert_eq!(detail.mom.pct_change, Some(10.0));
}

#[tokio::test]
async fn market_detail_fails_if_either_request_fails() {
    let gw = Arc::new(
        FakeGateway::new()
            .endpoint_ok(Endpoint::PricesFiltered, 0, price_rows())
            .analytics_err("India", 0),
    );
    let catalog = CatalogQuery::new(gw);

    assert!(catalog.market_detail(&charcoal(), &india()).await.is_err());
}

#[tokio::test]
async fn health_passes_payload_through() {
    let gw = Arc::new(FakeGateway::new().endpoint_ok(Endpoint::Health, 0, json!({"status": "running"})));
    let catalog = CatalogQuery::new(gw);

    assert_eq!(catalog.health().await.unwrap()["status"], "running");
}
