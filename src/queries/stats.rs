//! Per-market analytics aggregation for the dashboard.

use std::sync::Arc;

use log::{info, warn};

use crate::error::AggregationError;
use crate::gateway::ApiGateway;
use crate::models::{MarketId, MarketOutcome, Period, PriceStat, ProductId};
use crate::queries::fanout::{self, MarketResult};

// ---------------------------------------------------------------------------
// MarketStatsAggregator
// ---------------------------------------------------------------------------

/// Issues one `/analytics` request per market concurrently and merges the
/// responses into [`PriceStat`] records aligned to the input market order.
#[derive(Clone)]
pub struct MarketStatsAggregator {
    gateway: Arc<dyn ApiGateway>,
}

impl MarketStatsAggregator {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch statistics for every market, failing the whole aggregation if
    /// any single market fails.
    ///
    /// On success, `result[i].market == markets[i]`. An empty market list
    /// yields an empty result without touching the network.
    pub async fn aggregate(
        &self,
        markets: &[MarketId],
        product: &ProductId,
        period: Option<&Period>,
    ) -> Result<Vec<PriceStat>, AggregationError> {
        let results = self.fetch_all(markets, product, period).await?;
        match fanout::fail_fast(results) {
            Ok(stats) => {
                info!("Aggregated {} market stats for {}", stats.len(), product);
                Ok(stats)
            }
            Err(e) => {
                warn!("Stats aggregation for {} aborted: {}", product, e);
                Err(e)
            }
        }
    }

    /// Like [`aggregate`](Self::aggregate), but keeps the markets that
    /// succeeded and flags the ones that did not.
    ///
    /// Only invalid input (duplicate markets) is reported as an error.
    pub async fn aggregate_tagged(
        &self,
        markets: &[MarketId],
        product: &ProductId,
        period: Option<&Period>,
    ) -> Result<Vec<MarketOutcome<PriceStat>>, AggregationError> {
        let results = self.fetch_all(markets, product, period).await?;
        Ok(fanout::tag(markets, results))
    }

    async fn fetch_all(
        &self,
        markets: &[MarketId],
        product: &ProductId,
        period: Option<&Period>,
    ) -> Result<Vec<MarketResult<PriceStat>>, AggregationError> {
        fanout::fan_out(markets, |market| {
            let gateway = Arc::clone(&self.gateway);
            let market = market.clone();
            let product = product.clone();
            let period = period.cloned();
            async move { fetch_stat(gateway.as_ref(), &product, period.as_ref(), market).await }
        })
        .await
    }
}

async fn fetch_stat(
    gateway: &dyn ApiGateway,
    product: &ProductId,
    period: Option<&Period>,
    market: MarketId,
) -> MarketResult<PriceStat> {
    let body = gateway
        .analytics(product, &market, period)
        .await
        .map_err(|source| AggregationError::Request {
            market: market.clone(),
            source,
        })?;
    PriceStat::from_response(market.clone(), body).map_err(|e| AggregationError::Decode {
        market,
        message: e.to_string(),
    })
}
