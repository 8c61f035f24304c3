//! Query interfaces for the PriceDesk client.
//!
//! Each query struct holds a shared handle to an
//! [`ApiGateway`](crate::gateway::ApiGateway) and exposes async methods. The
//! multi-market queries share one fan-out helper so that concurrency, ordering
//! and merge policy behave identically across the dashboard and compare views.

pub mod catalog;
pub mod comparison;
mod fanout;
pub mod stats;

pub use catalog::{CatalogQuery, MarketDetail};
pub use comparison::ComparisonAssembler;
pub use stats::MarketStatsAggregator;
