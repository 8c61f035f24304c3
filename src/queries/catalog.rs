//! Product and market browsing, and single-market drill-down.

use std::sync::Arc;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PriceDeskError, Result, TransportError};
use crate::gateway::{ApiGateway, Endpoint};
use crate::models::{MarketId, PriceRecord, PriceStat, ProductId};
use crate::trend::{self, MomChange, MonthAverage};

// ---------------------------------------------------------------------------
// MarketDetail
// ---------------------------------------------------------------------------

/// Everything shown for one selected product/market pair.
#[derive(Debug, Clone)]
pub struct MarketDetail {
    pub stat: PriceStat,
    pub prices: Vec<PriceRecord>,
    pub monthly: Vec<MonthAverage>,
    pub mom: MomChange,
}

// ---------------------------------------------------------------------------
// CatalogQuery
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct CatalogQuery {
    gateway: Arc<dyn ApiGateway>,
}

impl CatalogQuery {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// List the products the backend holds prices for.
    pub async fn products(&self) -> Result<Vec<ProductId>> {
        let body = self.gateway.products().await?;
        decode(Endpoint::Products, body)
    }

    /// List the markets quoted for `product`.
    pub async fn markets(&self, product: &ProductId) -> Result<Vec<MarketId>> {
        let body = self.gateway.markets_by_product(product).await?;
        decode(Endpoint::MarketsByProduct, body)
    }

    /// Fetch raw price rows and analytics for one market concurrently.
    ///
    /// Fails if either request fails.
    pub async fn market_detail(&self, product: &ProductId, market: &MarketId) -> Result<MarketDetail> {
        let (prices, analytics) = futures::join!(
            self.gateway.prices_filtered(product, market),
            self.gateway.analytics(product, market, None),
        );

        let prices: Vec<PriceRecord> = decode(Endpoint::PricesFiltered, prices?)?;
        let stat = PriceStat::from_response(market.clone(), analytics?)
            .map_err(|e| TransportError::decode(Endpoint::Analytics.path(), e.to_string()))?;

        let monthly = trend::month_averages(&prices);
        let mom = trend::mom_change(&monthly);
        debug!(
            "Loaded {} price rows across {} months for {}/{}",
            prices.len(),
            monthly.len(),
            product,
            market
        );

        Ok(MarketDetail {
            stat,
            prices,
            monthly,
            mom,
        })
    }

    /// Backend liveness probe.
    pub async fn health(&self) -> Result<Value> {
        Ok(self.gateway.health().await?)
    }
}

fn decode<T: DeserializeOwned>(endpoint: Endpoint, body: Value) -> Result<T> {
    serde_json::from_value(body)
        .map_err(|e| PriceDeskError::from(TransportError::decode(endpoint.path(), e.to_string())))
}
