//! `HttpGateway` against an in-process backend.

use std::collections::HashMap;

use axum::extract::{Multipart, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pricedesk::{
    config, ApiGateway, HttpGateway, MarketId, Period, PriceDesk, ProductId, ReportFile,
    SubmitOutcome, TransportErrorKind,
};
use serde_json::{json, Value};

type Params = Query<HashMap<String, String>>;

async fn analytics(Query(q): Params) -> Result<Json<Value>, StatusCode> {
    match (q.get("product"), q.get("market").map(String::as_str)) {
        (_, Some("Atlantis")) => Err(StatusCode::INTERNAL_SERVER_ERROR),
        (Some(product), Some(market)) => Ok(Json(json!({
            "product": product,
            "market": market,
            "min": 500.0,
            "max": 700.0,
            "avg": 600.0,
            "latest_price": 650.0,
            "period": q.get("period"),
        }))),
        _ => Err(StatusCode::UNPROCESSABLE_ENTITY),
    }
}

async fn prices(Query(q): Params) -> Json<Value> {
    Json(json!({
        "periodMin": 1.0,
        "periodMax": 3.0,
        "periodAvg": 2.0,
        "weeklyPrice": 2.5,
        "echo": q,
    }))
}

async fn upload(mut multipart: Multipart) -> Result<Json<Value>, StatusCode> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            return Ok(Json(json!({
                "file_name": file_name,
                "content_type": content_type,
                "size": bytes.len(),
                "market": "Sri Lanka",
                "min": 10,
                "max": 20,
                "avg": 15
            })));
        }
    }
    Err(StatusCode::UNPROCESSABLE_ENTITY)
}

/// Start the fake backend and return its base URL.
async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/analytics", get(analytics))
        .route("/prices", get(prices))
        .route("/products", get(|| async { "this is not json" }))
        .route(
            "/markets-by-product",
            get(|| async { Json(json!(["India", "Sri Lanka"])) }),
        )
        .route("/upload-pdf", post(upload));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn india() -> MarketId {
    MarketId::new("India").unwrap()
}

#[tokio::test]
async fn analytics_sends_query_params() {
    let base = spawn_backend().await;
    let gw = HttpGateway::new(base, None).unwrap();

    let product = ProductId::from("Coconut Shell Charcoal");
    let body = gw
        .analytics(&product, &india(), Some(&Period::from("2025-01")))
        .await
        .unwrap();

    assert_eq!(body["product"], "Coconut Shell Charcoal");
    assert_eq!(body["market"], "India");
    assert_eq!(body["period"], "2025-01");
}

#[tokio::test]
async fn non_2xx_is_a_status_error() {
    let base = spawn_backend().await;
    let gw = HttpGateway::new(base, None).unwrap();

    let err = gw
        .analytics(&"x".into(), &MarketId::new("Atlantis").unwrap(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Status(500));
    assert_eq!(err.endpoint, "/analytics");
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let base = spawn_backend().await;
    let gw = HttpGateway::new(base, None).unwrap();

    let err = gw.products().await.unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Decode);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gw = HttpGateway::new(format!("http://{addr}"), None).unwrap();
    let err = gw.markets_by_product(&"x".into()).await.unwrap_err();
    assert_eq!(err.kind, TransportErrorKind::Network);
}

#[tokio::test]
async fn upload_uses_the_backend_field_name() {
    let base = spawn_backend().await;
    let gw = HttpGateway::new(base, None).unwrap();

    let file = ReportFile::new("jan-2025.pdf", b"%PDF-1.4 fake".to_vec());
    let body = gw.upload(&file).await.unwrap();

    assert_eq!(config::UPLOAD_FIELD_NAME, "file");
    assert_eq!(body["file_name"], "jan-2025.pdf");
    assert_eq!(body["content_type"], "application/pdf");
    assert_eq!(body["size"], 13);
}

#[tokio::test]
async fn end_to_end_upload_then_dashboard_and_compare() {
    let base = spawn_backend().await;
    let tmp = tempfile::tempdir().unwrap();
    let desk = PriceDesk::builder()
        .base_url(base)
        .store_dir(tmp.path())
        .build()
        .unwrap();

    let file = ReportFile::new("jan-2025.pdf", b"%PDF-1.4 fake".to_vec());
    let outcome = desk.uploads().submit(Some(&file)).await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::NavigateToDashboard(_)));

    let mut dashboard = desk.dashboard();
    assert_eq!(dashboard.report().unwrap().field("avg"), Some(&json!(15)));
    dashboard.settled().await;
    let cards = dashboard.cards();
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[0].market, "Sri Lanka");
    assert_eq!(cards[0].weekly, Some(650.0));

    let mut compare = desk.compare(
        MarketId::parse_list(&config::DEFAULT_COMPARE_MARKETS).unwrap(),
        config::DEFAULT_PERIOD.into(),
    );
    compare.settled().await;
    let rows = compare.rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].market, "India");
    assert_eq!(rows[1].weekly_price, Some(2.5));

    let markets = desk.catalog().markets(&"Coconut Shell Charcoal".into()).await.unwrap();
    assert_eq!(markets[0], india());
}
