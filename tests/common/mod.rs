//! Shared test fixtures for the PriceDesk integration tests.
//!
//! Provides [`FakeGateway`], a scripted [`ApiGateway`] with per-market latency
//! and failures that records every request it sees, plus helpers to build a
//! [`PriceDesk`] over it with a temporary handoff store.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pricedesk::{ApiGateway, Endpoint, MarketId, PriceDesk, ReportFile, TransportError};
use serde_json::{json, Value};

pub const MARKETS: [&str; 4] = ["Sri Lanka", "India", "Indonesia", "Thailand"];

#[derive(Clone)]
struct Reply {
    delay: Duration,
    body: Result<Value, TransportError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub endpoint: Endpoint,
    pub params: Vec<(String, String)>,
}

impl Recorded {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Scripted backend. Unscripted requests fail with HTTP 404.
#[derive(Default)]
pub struct FakeGateway {
    analytics: HashMap<String, Reply>,
    prices: HashMap<String, Reply>,
    fixed: HashMap<Endpoint, Reply>,
    upload_reply: Mutex<Option<Reply>>,
    requests: Mutex<Vec<Recorded>>,
    completed: Mutex<Vec<String>>,
    uploaded: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analytics_ok(mut self, market: &str, delay_ms: u64, body: Value) -> Self {
        self.analytics.insert(market.to_string(), ok(delay_ms, body));
        self
    }

    pub fn analytics_err(mut self, market: &str, delay_ms: u64) -> Self {
        self.analytics
            .insert(market.to_string(), err(delay_ms, "/analytics"));
        self
    }

    pub fn prices_ok(mut self, market: &str, delay_ms: u64, body: Value) -> Self {
        self.prices.insert(market.to_string(), ok(delay_ms, body));
        self
    }

    pub fn prices_err(mut self, market: &str, delay_ms: u64) -> Self {
        self.prices.insert(market.to_string(), err(delay_ms, "/prices"));
        self
    }

    pub fn endpoint_ok(mut self, endpoint: Endpoint, delay_ms: u64, body: Value) -> Self {
        self.fixed.insert(endpoint, ok(delay_ms, body));
        self
    }

    pub fn endpoint_err(mut self, endpoint: Endpoint) -> Self {
        self.fixed.insert(endpoint, err(0, endpoint.path()));
        self
    }

    pub fn set_upload_ok(&self, delay_ms: u64, body: Value) {
        *self.upload_reply.lock().unwrap() = Some(ok(delay_ms, body));
    }

    pub fn set_upload_err(&self, delay_ms: u64) {
        *self.upload_reply.lock().unwrap() = Some(err(delay_ms, "/upload-pdf"));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, endpoint: Endpoint) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.endpoint == endpoint)
            .collect()
    }

    /// Markets in the order their responses were delivered.
    pub fn completion_order(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploaded.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn deliver(&self, label: String, reply: Reply) -> Result<Value, TransportError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(reply.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().unwrap().push(label);
        reply.body
    }
}

fn ok(delay_ms: u64, body: Value) -> Reply {
    Reply {
        delay: Duration::from_millis(delay_ms),
        body: Ok(body),
    }
}

fn err(delay_ms: u64, endpoint: &str) -> Reply {
    Reply {
        delay: Duration::from_millis(delay_ms),
        body: Err(TransportError::network(endpoint, "connection reset")),
    }
}

fn not_found(endpoint: Endpoint) -> Reply {
    Reply {
        delay: Duration::ZERO,
        body: Err(TransportError::status(endpoint.path(), 404)),
    }
}

#[async_trait]
impl ApiGateway for FakeGateway {
    async fn request(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
    ) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(Recorded {
            endpoint,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let market = params
            .iter()
            .find(|(k, _)| *k == "market")
            .map(|(_, v)| v.to_string())
            .unwrap_or_default();
        let scripted = match endpoint {
            Endpoint::Analytics => self.analytics.get(&market),
            Endpoint::Prices => self.prices.get(&market),
            other => self.fixed.get(&other),
        };
        let reply = scripted.cloned().unwrap_or_else(|| not_found(endpoint));
        self.deliver(market, reply).await
    }

    async fn upload(&self, file: &ReportFile) -> Result<Value, TransportError> {
        self.uploaded.lock().unwrap().push(file.name.clone());
        let reply = self
            .upload_reply
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| err(0, "/upload-pdf"));
        self.deliver(file.name.clone(), reply).await
    }
}

/// Analytics body with the given average and a fixed spread.
pub fn stat_body(market: &str, avg: f64) -> Value {
    json!({
        "market": market,
        "min": avg - 10.0,
        "max": avg + 10.0,
        "avg": avg,
        "latest_price": avg + 1.0
    })
}

pub fn series_body(avg: f64) -> Value {
    json!({
        "periodMin": avg - 5.0,
        "periodMax": avg + 5.0,
        "periodAvg": avg,
        "weeklyPrice": avg + 2.0
    })
}

pub fn markets(ids: &[&str]) -> Vec<MarketId> {
    MarketId::parse_list(ids).unwrap()
}

/// Build a `PriceDesk` over `gateway` with a fresh temporary store.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn desk(gateway: Arc<FakeGateway>) -> (PriceDesk, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let desk = PriceDesk::builder()
        .gateway(gateway)
        .store_dir(tmp.path())
        .build()
        .unwrap();
    (desk, tmp)
}

pub fn pdf(name: &str) -> ReportFile {
    ReportFile::new(name, b"%PDF-1.4 monthly report".to_vec())
}
