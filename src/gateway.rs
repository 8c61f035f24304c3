//! Typed HTTP access to the price backend.
//!
//! [`ApiGateway`] is the seam every query goes through: one call is one HTTP
//! request, with no retries and no timeout beyond what the transport applies.
//! Failures of any sort (network, non-2xx status, malformed JSON) come back as
//! a single [`TransportError`]; error bodies from the backend are never read.
//!
//! [`HttpGateway`] is the reqwest-backed implementation. Tests substitute their
//! own implementation to script latency and failures.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::config;
use crate::error::{PriceDeskError, Result, TransportError};
use crate::models::{MarketId, Period, ProductId, ReportFile};

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Read-only (GET) backend endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Products,
    MarketsByProduct,
    PricesFiltered,
    Analytics,
    Prices,
    Health,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Products => config::PRODUCTS_PATH,
            Endpoint::MarketsByProduct => config::MARKETS_BY_PRODUCT_PATH,
            Endpoint::PricesFiltered => config::PRICES_FILTERED_PATH,
            Endpoint::Analytics => config::ANALYTICS_PATH,
            Endpoint::Prices => config::PRICES_PATH,
            Endpoint::Health => config::HEALTH_PATH,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// ---------------------------------------------------------------------------
// ApiGateway
// ---------------------------------------------------------------------------

/// Raw access to the backend API.
///
/// Implementors provide [`request`](Self::request) and [`upload`](Self::upload);
/// the per-endpoint helpers only fix the endpoint and parameter names.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Issue a GET against `endpoint` with the given query parameters.
    async fn request(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
    ) -> std::result::Result<Value, TransportError>;

    /// POST a report to `/upload-pdf` as multipart form data under
    /// [`config::UPLOAD_FIELD_NAME`].
    async fn upload(&self, file: &ReportFile) -> std::result::Result<Value, TransportError>;

    async fn products(&self) -> std::result::Result<Value, TransportError> {
        self.request(Endpoint::Products, &[]).await
    }

    async fn markets_by_product(
        &self,
        product: &ProductId,
    ) -> std::result::Result<Value, TransportError> {
        self.request(Endpoint::MarketsByProduct, &[("product", product.as_str())])
            .await
    }

    async fn prices_filtered(
        &self,
        product: &ProductId,
        market: &MarketId,
    ) -> std::result::Result<Value, TransportError> {
        self.request(
            Endpoint::PricesFiltered,
            &[("product", product.as_str()), ("market", market.as_str())],
        )
        .await
    }

    async fn analytics(
        &self,
        product: &ProductId,
        market: &MarketId,
        period: Option<&Period>,
    ) -> std::result::Result<Value, TransportError> {
        let mut params = vec![("product", product.as_str()), ("market", market.as_str())];
        if let Some(p) = period {
            params.push(("period", p.as_str()));
        }
        self.request(Endpoint::Analytics, &params).await
    }

    async fn prices(
        &self,
        market: &MarketId,
        period: &Period,
    ) -> std::result::Result<Value, TransportError> {
        self.request(
            Endpoint::Prices,
            &[("market", market.as_str()), ("period", period.as_str())],
        )
        .await
    }

    async fn health(&self) -> std::result::Result<Value, TransportError> {
        self.request(Endpoint::Health, &[]).await
    }
}

// ---------------------------------------------------------------------------
// HttpGateway
// ---------------------------------------------------------------------------

/// [`ApiGateway`] over a shared async reqwest client.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: String,
    client: Client,
}

impl HttpGateway {
    /// Create a gateway for `base_url`.
    ///
    /// `timeout` of `None` leaves the transport default in place.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| PriceDeskError::InvalidArgument(format!("HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_json(
        &self,
        path: &str,
        req: RequestBuilder,
    ) -> std::result::Result<Value, TransportError> {
        let resp = req
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(path, e))?
            .error_for_status()
            .map_err(|e| TransportError::from_reqwest(path, e))?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::decode(path, e.to_string()))
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn request(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
    ) -> std::result::Result<Value, TransportError> {
        let url = self.url(endpoint.path());
        debug!("GET {} {:?}", url, params);
        let req = self.client.get(&url).query(params);
        self.send_json(endpoint.path(), req).await
    }

    async fn upload(&self, file: &ReportFile) -> std::result::Result<Value, TransportError> {
        let path = config::UPLOAD_PDF_PATH;
        let url = self.url(path);
        debug!("POST {} ({}, {} bytes)", url, file.name, file.bytes.len());

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(config::PDF_MEDIA_TYPE)
            .map_err(|e| TransportError::from_reqwest(path, e))?;
        let form = Form::new().part(config::UPLOAD_FIELD_NAME, part);

        self.send_json(path, self.client.post(&url).multipart(form))
            .await
    }
}
