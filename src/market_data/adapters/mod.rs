// Shared trait for market data adapters

use serde_json::Value;

use crate::error::SourceResult;

/// Everything the caching layer needs from an exchange.
///
/// Each fetch returns the raw JSON document, or `Ok(None)` when the upstream
/// answered without one. Parsing and validation happen in the caller so that a
/// malformed document is reported the same way for every implementation.
#[async_trait::async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Perpetuals metadata: `{"universe": [{name, szDecimals, maxLeverage, ...}]}`.
    async fn fetch_perpetuals_metadata(&self) -> SourceResult<Option<Value>>;

    /// Spot metadata: `{"tokens": [...], "universe": [...]}`.
    async fn fetch_spot_metadata(&self) -> SourceResult<Option<Value>>;

    /// L2 snapshot for one coin: `{"levels": [[bids...], [asks...]]}`.
    async fn fetch_order_book(&self, coin: &str) -> SourceResult<Option<Value>>;

    /// Called once when the owning component is dropped. Never called for
    /// borrowed handles.
    fn release(&self) {}
}

// Make the Hyperliquid adapter visible
pub mod hyperliquid;
pub mod hyperliquid_types;
