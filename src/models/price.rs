use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::market::MarketId;

// ---------------------------------------------------------------------------
// PriceStat — Summary statistics for one product/market pair
// ---------------------------------------------------------------------------

/// One analytics record per market.
///
/// The backend usually guarantees `min <= avg <= max`, but nothing here relies
/// on it; values are carried exactly as returned (`None` where the backend
/// sent `null` or omitted the field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStat {
    pub market: MarketId,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub latest: Option<f64>,
}

#[derive(Deserialize)]
struct StatBody {
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    avg: Option<f64>,
    #[serde(default, alias = "latest_price")]
    latest: Option<f64>,
}

impl PriceStat {
    /// Build a stat from an `/analytics` response body.
    ///
    /// The market is taken from the request, never from the body.
    pub fn from_response(market: MarketId, body: Value) -> Result<Self, serde_json::Error> {
        let StatBody { min, max, avg, latest } = serde_json::from_value(body)?;
        Ok(Self {
            market,
            min,
            max,
            avg,
            latest,
        })
    }
}

// ---------------------------------------------------------------------------
// PriceSeriesPoint — Per-market statistics for a comparison period
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSeriesPoint {
    pub market: MarketId,
    pub period_min: Option<f64>,
    pub period_max: Option<f64>,
    pub period_avg: Option<f64>,
    pub weekly_price: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesBody {
    #[serde(default, alias = "period_min")]
    period_min: Option<f64>,
    #[serde(default, alias = "period_max")]
    period_max: Option<f64>,
    #[serde(default, alias = "period_avg")]
    period_avg: Option<f64>,
    #[serde(default, alias = "weekly_price")]
    weekly_price: Option<f64>,
}

impl PriceSeriesPoint {
    /// Build a series point from a `/prices` response body, keyed to `market`.
    pub fn from_response(market: MarketId, body: Value) -> Result<Self, serde_json::Error> {
        let SeriesBody {
            period_min,
            period_max,
            period_avg,
            weekly_price,
        } = serde_json::from_value(body)?;
        Ok(Self {
            market,
            period_min,
            period_max,
            period_avg,
            weekly_price,
        })
    }
}

// ---------------------------------------------------------------------------
// PriceRecord — Single extracted price row (`/prices-filtered`)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: String,
    pub market: String,
    #[serde(default = "default_product")]
    pub product: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub source_url: Option<String>,
}

fn default_product() -> String {
    crate::config::DEFAULT_PRODUCT.to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_unit() -> String {
    "per tonne".to_string()
}

// ---------------------------------------------------------------------------
// MarketOutcome — Per-market result of a tagged fan-out
// ---------------------------------------------------------------------------

/// Outcome of one market's query inside a multi-market request.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketOutcome<T> {
    Ok(T),
    Failed { market: MarketId, reason: String },
}

impl<T> MarketOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, MarketOutcome::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            MarketOutcome::Ok(value) => Some(value),
            MarketOutcome::Failed { .. } => None,
        }
    }
}
