//! Cached Hyperliquid instrument universe and order-book imbalance signals.
//!
//! Two independent components sit on top of a [`market_data::MarketDataSource`]:
//!
//! - [`universe::AssetUniverseCache`] lazily loads perpetual and spot metadata
//!   and keeps it until an explicit refresh.
//! - [`imbalance::ImbalanceSignalEngine`] turns L2 book snapshots into simple
//!   and depth-weighted order-book imbalance, cached per instrument with a TTL.

pub mod blocking;
pub mod config;
pub mod error;
pub mod imbalance;
pub mod market_data;
pub mod telemetry;
pub mod universe;

pub use error::{Error, Result, SourceError, SourceResult};
