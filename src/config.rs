use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable consulted by [`PriceDeskBuilder::from_env`](crate::PriceDeskBuilder::from_env).
pub const BASE_URL_ENV: &str = "PRICEDESK_API_URL";

pub const PRODUCTS_PATH: &str = "/products";
pub const MARKETS_BY_PRODUCT_PATH: &str = "/markets-by-product";
pub const PRICES_FILTERED_PATH: &str = "/prices-filtered";
pub const ANALYTICS_PATH: &str = "/analytics";
pub const PRICES_PATH: &str = "/prices";
pub const UPLOAD_PDF_PATH: &str = "/upload-pdf";
pub const HEALTH_PATH: &str = "/health";

/// Multipart field name the upload endpoint reads the PDF from.
///
/// This is a wire contract with the backend's `UploadFile` parameter. Renaming
/// it makes every upload fail on the server side with no client-side error.
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Name of the persisted slot holding the last upload result.
pub const HANDOFF_SLOT: &str = "parsedData";

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

pub const DEFAULT_PRODUCT: &str = "Coconut Shell Charcoal";

/// Markets shown on the dashboard, in display order.
pub const DEFAULT_MARKETS: [&str; 4] = ["Sri Lanka", "India", "Indonesia", "Thailand"];

/// Markets shown on the compare page, in display order.
pub const DEFAULT_COMPARE_MARKETS: [&str; 2] = ["Sri Lanka", "India"];

/// Reporting period of the monthly report currently loaded by the backend.
pub const DEFAULT_PERIOD: &str = "2025-01";

pub fn default_store_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("pricedesk")
    } else {
        PathBuf::from(".pricedesk-cache")
    }
}
