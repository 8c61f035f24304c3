//! Side-by-side market comparison for one reporting period.

use std::sync::Arc;

use log::{info, warn};

use crate::error::AggregationError;
use crate::gateway::ApiGateway;
use crate::models::{MarketId, MarketOutcome, Period, PriceSeriesPoint};
use crate::queries::fanout::{self, MarketResult};

/// Issues one `/prices` request per market concurrently and merges the
/// responses into [`PriceSeriesPoint`] records in input order.
///
/// Uses the same all-or-nothing policy as the dashboard stats.
#[derive(Clone)]
pub struct ComparisonAssembler {
    gateway: Arc<dyn ApiGateway>,
}

impl ComparisonAssembler {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn assemble(
        &self,
        markets: &[MarketId],
        period: &Period,
    ) -> Result<Vec<PriceSeriesPoint>, AggregationError> {
        let results = self.fetch_all(markets, period).await?;
        match fanout::fail_fast(results) {
            Ok(series) => {
                info!("Assembled comparison of {} markets for {}", series.len(), period);
                Ok(series)
            }
            Err(e) => {
                warn!("Comparison for {} aborted: {}", period, e);
                Err(e)
            }
        }
    }

    pub async fn assemble_tagged(
        &self,
        markets: &[MarketId],
        period: &Period,
    ) -> Result<Vec<MarketOutcome<PriceSeriesPoint>>, AggregationError> {
        let results = self.fetch_all(markets, period).await?;
        Ok(fanout::tag(markets, results))
    }

    async fn fetch_all(
        &self,
        markets: &[MarketId],
        period: &Period,
    ) -> Result<Vec<MarketResult<PriceSeriesPoint>>, AggregationError> {
        fanout::fan_out(markets, |market| {
            let gateway = Arc::clone(&self.gateway);
            let market = market.clone();
            let period = period.clone();
            async move {
                let body = gateway
                    .prices(&market, &period)
                    .await
                    .map_err(|source| AggregationError::Request {
                        market: market.clone(),
                        source,
                    })?;
                PriceSeriesPoint::from_response(market.clone(), body).map_err(|e| {
                    AggregationError::Decode {
                        market,
                        message: e.to_string(),
                    }
                })
            }
        })
        .await
    }
}
