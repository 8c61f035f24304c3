//! Dashboard and compare pages: what each view loads when it mounts.

use log::{info, warn};

use crate::models::{MarketId, Period, PriceSeriesPoint, PriceStat, ProductId, UploadResult};
use crate::projection::{ChartSeries, ComparisonRow, StatsCard};
use crate::queries::{ComparisonAssembler, MarketStatsAggregator};
use crate::store::HandoffReader;
use crate::view::{ViewSlot, ViewState};

// ---------------------------------------------------------------------------
// DashboardPage
// ---------------------------------------------------------------------------

/// Per-market stat cards plus the last uploaded report.
pub struct DashboardPage {
    report: Option<UploadResult>,
    stats: ViewSlot<Vec<PriceStat>>,
}

impl DashboardPage {
    /// Read the handoff slot and start aggregating `markets`.
    ///
    /// A missing or unreadable slot leaves [`report`](Self::report) empty; it
    /// does not prevent the stats from loading. The slot is never modified here.
    ///
    /// The slot is read with blocking `std::fs` on the calling thread. It holds
    /// one small JSON document.
    pub fn mount(
        aggregator: MarketStatsAggregator,
        handoff: &HandoffReader,
        product: ProductId,
        markets: Vec<MarketId>,
        period: Option<Period>,
    ) -> Self {
        let report = match handoff.read() {
            Ok(report) => report,
            Err(e) => {
                warn!("Ignoring unreadable upload handoff: {}", e);
                None
            }
        };
        info!("Dashboard mounted for {} ({} markets)", product, markets.len());

        let stats = ViewSlot::mount(async move {
            aggregator
                .aggregate(&markets, &product, period.as_ref())
                .await
        });

        Self { report, stats }
    }

    pub fn report(&self) -> Option<&UploadResult> {
        self.report.as_ref()
    }

    pub fn state(&self) -> ViewState<Vec<PriceStat>> {
        self.stats.state()
    }

    /// Cards for every market, or none at all while loading or after a failure.
    pub fn cards(&self) -> Vec<StatsCard> {
        self.stats
            .with_ready(|stats| stats.iter().map(StatsCard::from).collect())
            .unwrap_or_default()
    }

    pub fn chart(&self) -> ChartSeries {
        self.stats
            .with_ready(|stats| ChartSeries::from_stats(stats))
            .unwrap_or_default()
    }

    pub async fn settled(&mut self) -> ViewState<Vec<PriceStat>> {
        self.stats.settled().await
    }

    pub fn unmount(&mut self) {
        self.stats.unmount();
    }
}

// ---------------------------------------------------------------------------
// ComparePage
// ---------------------------------------------------------------------------

pub struct ComparePage {
    period: Period,
    series: ViewSlot<Vec<PriceSeriesPoint>>,
}

impl ComparePage {
    pub fn mount(assembler: ComparisonAssembler, markets: Vec<MarketId>, period: Period) -> Self {
        info!("Compare page mounted for {} ({} markets)", period, markets.len());
        let query_period = period.clone();
        let series = ViewSlot::mount(async move { assembler.assemble(&markets, &query_period).await });
        Self { period, series }
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn state(&self) -> ViewState<Vec<PriceSeriesPoint>> {
        self.series.state()
    }

    pub fn rows(&self) -> Vec<ComparisonRow> {
        self.series
            .with_ready(|points| points.iter().map(ComparisonRow::from).collect())
            .unwrap_or_default()
    }

    pub async fn settled(&mut self) -> ViewState<Vec<PriceSeriesPoint>> {
        self.series.settled().await
    }

    pub fn unmount(&mut self) {
        self.series.unmount();
    }
}
