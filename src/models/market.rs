use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AggregationError;

// ---------------------------------------------------------------------------
// MarketId — Trading venue identifier (e.g. "Sri Lanka")
// ---------------------------------------------------------------------------

/// Opaque, non-empty market identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MarketId(String);

impl MarketId {
    pub fn new(id: impl Into<String>) -> Result<Self, AggregationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AggregationError::EmptyMarket);
        }
        Ok(Self(id))
    }

    /// Parse an ordered market list, rejecting empty and repeated identifiers.
    pub fn parse_list<S: AsRef<str>>(ids: &[S]) -> Result<Vec<MarketId>, AggregationError> {
        let markets = ids
            .iter()
            .map(|id| MarketId::new(id.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        ensure_distinct(&markets)?;
        Ok(markets)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fail on the first market that appears twice.
pub fn ensure_distinct(markets: &[MarketId]) -> Result<(), AggregationError> {
    let mut seen = HashSet::with_capacity(markets.len());
    for market in markets {
        if !seen.insert(market) {
            return Err(AggregationError::DuplicateMarket(market.clone()));
        }
    }
    Ok(())
}

impl TryFrom<String> for MarketId {
    type Error = AggregationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MarketId::new(value)
    }
}

impl From<MarketId> for String {
    fn from(id: MarketId) -> Self {
        id.0
    }
}

impl AsRef<str> for MarketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// ProductId — Commodity variant (e.g. "Coconut Shell Charcoal")
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Period — Year-month ("2025-01"); the backend validates the format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(String);

impl Period {
    pub fn new(period: impl Into<String>) -> Self {
        Self(period.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Period {
    fn from(period: &str) -> Self {
        Self::new(period)
    }
}

impl From<String> for Period {
    fn from(period: String) -> Self {
        Self(period)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
