//! PriceDesk client SDK.
//!
//! Talks to the commodity price backend that extracts weekly prices from the
//! monthly PDF report. Provides the client-side pipeline behind the price
//! dashboard: concurrent per-market analytics, market comparison for a period,
//! and the upload flow that hands the parsed report to the dashboard through a
//! locally persisted slot.
//!
//! # Quick start
//!
//! ```no_run
//! use pricedesk::PriceDesk;
//!
//! # async fn example() -> pricedesk::Result<()> {
//! let desk = PriceDesk::builder().from_env().build()?;
//!
//! // Stats for the default dashboard markets, in display order
//! let markets = pricedesk::MarketId::parse_list(&pricedesk::config::DEFAULT_MARKETS)?;
//! let stats = desk
//!     .stats()
//!     .aggregate(&markets, &"Coconut Shell Charcoal".into(), None)
//!     .await?;
//!
//! // Upload a report and hand it off to the dashboard
//! let report = pricedesk::ReportFile::from_path("report-2025-01.pdf")?;
//! desk.uploads().submit(Some(&report)).await?;
//! let dashboard = desk.dashboard();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod pages;
pub mod projection;
pub mod queries;
pub mod store;
pub mod trend;
pub mod upload;
pub mod view;

pub use error::{
    AggregationError, PriceDeskError, Result, StoreError, TransportError, TransportErrorKind,
    UploadError,
};
pub use gateway::{ApiGateway, Endpoint, HttpGateway};
pub use models::{
    MarketId, MarketOutcome, Period, PriceRecord, PriceSeriesPoint, PriceStat, ProductId,
    ReportFile, UploadResult,
};
pub use pages::{ComparePage, DashboardPage};
pub use queries::{CatalogQuery, ComparisonAssembler, MarketStatsAggregator};
pub use store::{HandoffReader, HandoffStore};
pub use upload::{SubmitOutcome, UploadHandoff, UploadPhase};
pub use view::{ViewSlot, ViewState};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// PriceDeskBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`PriceDesk`] instance.
///
/// Use [`PriceDesk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](PriceDeskBuilder::build) to create the client.
pub struct PriceDeskBuilder {
    base_url: String,
    store_dir: Option<PathBuf>,
    timeout: Option<Duration>,
    gateway: Option<Arc<dyn ApiGateway>>,
}

impl Default for PriceDeskBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_BASE_URL.to_string(),
            store_dir: None,
            timeout: None,
            gateway: None,
        }
    }
}

impl PriceDeskBuilder {
    /// Set the backend base address. Defaults to [`config::DEFAULT_BASE_URL`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Take the base address from `PRICEDESK_API_URL` when it is set.
    pub fn from_env(mut self) -> Self {
        if let Ok(url) = std::env::var(config::BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    /// Set the directory holding the upload handoff slot.
    ///
    /// If not set, the platform cache directory is used (e.g.
    /// `~/.cache/pricedesk` on Linux).
    pub fn store_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.store_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set a request timeout. By default only the transport's own limits apply.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom [`ApiGateway`] instead of HTTP. `base_url` and `timeout`
    /// are then ignored.
    pub fn gateway(mut self, gateway: Arc<dyn ApiGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Build the client, opening (and creating if needed) the handoff store.
    ///
    /// No network traffic happens here.
    pub fn build(self) -> Result<PriceDesk> {
        let gateway = match self.gateway {
            Some(gw) => gw,
            None => Arc::new(HttpGateway::new(self.base_url.clone(), self.timeout)?),
        };
        let store = HandoffStore::open(self.store_dir)?;
        let store_dir = store.dir().to_path_buf();
        Ok(PriceDesk {
            base_url: self.base_url,
            store_dir,
            uploads: UploadHandoff::new(Arc::clone(&gateway), store),
            gateway,
        })
    }
}

// ---------------------------------------------------------------------------
// PriceDesk
// ---------------------------------------------------------------------------

/// The main entry point: a shared gateway plus the upload flow that owns the
/// handoff store.
pub struct PriceDesk {
    base_url: String,
    store_dir: PathBuf,
    gateway: Arc<dyn ApiGateway>,
    uploads: UploadHandoff,
}

impl PriceDesk {
    pub fn builder() -> PriceDeskBuilder {
        PriceDeskBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Per-market analytics aggregation.
    pub fn stats(&self) -> MarketStatsAggregator {
        MarketStatsAggregator::new(Arc::clone(&self.gateway))
    }

    /// Per-market price series for a comparison period.
    pub fn comparison(&self) -> ComparisonAssembler {
        ComparisonAssembler::new(Arc::clone(&self.gateway))
    }

    /// Product/market listing and single-market detail.
    pub fn catalog(&self) -> CatalogQuery {
        CatalogQuery::new(Arc::clone(&self.gateway))
    }

    /// The upload flow. It is the only writer of the handoff slot.
    pub fn uploads(&self) -> &UploadHandoff {
        &self.uploads
    }

    pub fn handoff(&self) -> HandoffReader {
        self.uploads.reader()
    }

    pub fn gateway(&self) -> Arc<dyn ApiGateway> {
        Arc::clone(&self.gateway)
    }

    // -- Pages -------------------------------------------------------------

    /// Mount the dashboard for the default product and markets.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dashboard(&self) -> DashboardPage {
        let markets = config::DEFAULT_MARKETS
            .iter()
            .filter_map(|m| MarketId::new(*m).ok())
            .collect();
        self.dashboard_for(config::DEFAULT_PRODUCT.into(), markets, None)
    }

    pub fn dashboard_for(
        &self,
        product: ProductId,
        markets: Vec<MarketId>,
        period: Option<Period>,
    ) -> DashboardPage {
        DashboardPage::mount(self.stats(), &self.handoff(), product, markets, period)
    }

    /// Mount the compare page for `markets` over `period`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn compare(&self, markets: Vec<MarketId>, period: Period) -> ComparePage {
        ComparePage::mount(self.comparison(), markets, period)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for PriceDesk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PriceDesk(base_url={}, store_dir={}, upload={:?})",
            self.base_url,
            self.store_dir.display(),
            self.uploads.phase()
        )
    }
}
