use std::fmt;

use crate::models::MarketId;

// ---------------------------------------------------------------------------
// TransportError — anything that went wrong between us and the backend
// ---------------------------------------------------------------------------

/// Diagnostic classification of a [`TransportError`].
///
/// Callers never branch on this to interpret backend error bodies; it only
/// makes log lines and messages more useful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportErrorKind {
    Network,
    Status(u16),
    Decode,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Network => write!(f, "network failure"),
            TransportErrorKind::Status(code) => write!(f, "HTTP status {}", code),
            TransportErrorKind::Decode => write!(f, "malformed JSON"),
        }
    }
}

/// A single request to the backend failed (network, non-2xx, or bad JSON).
#[derive(Debug, Clone, thiserror::Error)]
#[error("{endpoint}: {kind}: {message}")]
pub struct TransportError {
    pub endpoint: String,
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(endpoint: impl Into<String>, kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(endpoint, TransportErrorKind::Network, message)
    }

    pub fn status(endpoint: impl Into<String>, code: u16) -> Self {
        Self::new(endpoint, TransportErrorKind::Status(code), "request rejected")
    }

    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(endpoint, TransportErrorKind::Decode, message)
    }

    /// Map a reqwest failure onto the single transport error type.
    pub(crate) fn from_reqwest(endpoint: &str, err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::status(endpoint, status.as_u16())
        } else if err.is_decode() {
            Self::decode(endpoint, err.to_string())
        } else {
            Self::network(endpoint, err.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// AggregationError
// ---------------------------------------------------------------------------

/// A multi-market query could not produce a complete, ordered result.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AggregationError {
    #[error("request for market '{market}' failed: {source}")]
    Request {
        market: MarketId,
        #[source]
        source: TransportError,
    },

    #[error("response for market '{market}' has an unexpected shape: {message}")]
    Decode { market: MarketId, message: String },

    #[error("market identifiers must be non-empty")]
    EmptyMarket,

    #[error("market '{0}' appears more than once in the request set")]
    DuplicateMarket(MarketId),
}

impl AggregationError {
    /// The market whose query broke the aggregation, when there is one.
    pub fn market(&self) -> Option<&MarketId> {
        match self {
            AggregationError::Request { market, .. } | AggregationError::Decode { market, .. } => {
                Some(market)
            }
            AggregationError::DuplicateMarket(market) => Some(market),
            AggregationError::EmptyMarket => None,
        }
    }
}

// ---------------------------------------------------------------------------
// UploadError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, thiserror::Error)]
pub enum UploadError {
    #[error("no file selected")]
    NoFile,

    #[error("'{0}' is not a PDF document")]
    NotPdf(String),

    #[error("upload failed: {0}")]
    Transport(#[from] TransportError),

    #[error("upload succeeded but the result could not be stored: {0}")]
    Persist(String),
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("handoff slot '{slot}' was corrupt and has been removed: {message}")]
    Corrupt { slot: String, message: String },
}

// ---------------------------------------------------------------------------
// PriceDeskError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PriceDeskError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Could not load {view}: {reason}")]
    ViewFailed { view: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, PriceDeskError>;
