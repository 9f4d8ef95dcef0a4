// Market data module entrypoint
pub mod adapters; // source capability + venue-specific fetchers (e.g. Hyperliquid)
pub mod handle;   // owned vs borrowed source handles

#[cfg(test)]
pub(crate) mod testing; // scripted in-memory source for tests

pub use adapters::hyperliquid::{HyperliquidConfig, HyperliquidInfoClient};
pub use adapters::MarketDataSource;
pub use handle::{Ownership, SourceHandle};
