//! Synchronous wrappers for hosts without an async runtime.
//!
//! Each wrapper owns a current-thread tokio runtime and blocks on the async
//! operation. Do not call these from inside an async context; tokio panics
//! when `block_on` is nested in a runtime thread.

use std::io;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::error::Result;
use crate::imbalance::{ImbalanceBreakdown, ImbalanceSignalEngine, OrderBookSnapshot};
use crate::universe::{AssetClass, AssetUniverseCache, PerpetualAsset, RefreshReport, SpotAsset};

fn runtime() -> io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}

pub struct BlockingUniverse {
    runtime: Runtime,
    inner: AssetUniverseCache,
}

impl BlockingUniverse {
    pub fn new(inner: AssetUniverseCache) -> io::Result<Self> {
        Ok(Self {
            runtime: runtime()?,
            inner,
        })
    }

    pub fn inner(&self) -> &AssetUniverseCache {
        &self.inner
    }

    pub fn perpetuals(&self, include_delisted: bool) -> Vec<PerpetualAsset> {
        self.runtime.block_on(self.inner.perpetuals(include_delisted))
    }

    pub fn spot(&self, quote: Option<&str>) -> Vec<SpotAsset> {
        self.runtime.block_on(self.inner.spot(quote))
    }

    pub fn perpetual_symbols(&self) -> Vec<String> {
        self.runtime.block_on(self.inner.perpetual_symbols())
    }

    pub fn spot_symbols(&self, quote: Option<&str>) -> Vec<String> {
        self.runtime.block_on(self.inner.spot_symbols(quote))
    }

    pub fn top_perpetuals_by_leverage(&self, n: usize) -> Vec<PerpetualAsset> {
        self.runtime.block_on(self.inner.top_perpetuals_by_leverage(n))
    }

    pub fn major_spot_pairs(&self) -> Vec<SpotAsset> {
        self.runtime.block_on(self.inner.major_spot_pairs())
    }

    pub fn refresh_if_needed(&self, class: AssetClass) -> Result<()> {
        self.runtime.block_on(self.inner.refresh_if_needed(class))
    }

    pub fn refresh_all(&self) -> RefreshReport {
        self.runtime.block_on(self.inner.refresh_all())
    }
}

pub struct BlockingImbalance {
    runtime: Runtime,
    inner: ImbalanceSignalEngine,
}

impl BlockingImbalance {
    pub fn new(inner: ImbalanceSignalEngine) -> io::Result<Self> {
        Ok(Self {
            runtime: runtime()?,
            inner,
        })
    }

    pub fn inner(&self) -> &ImbalanceSignalEngine {
        &self.inner
    }

    pub fn calculate(&self, instrument: &str) -> Result<Option<f64>> {
        self.runtime.block_on(self.inner.calculate(instrument))
    }

    pub fn order_book(&self, instrument: &str) -> Result<Option<Arc<OrderBookSnapshot>>> {
        self.runtime.block_on(self.inner.order_book(instrument))
    }

    pub fn breakdown(&self, instrument: &str) -> Result<Option<ImbalanceBreakdown>> {
        self.runtime.block_on(self.inner.breakdown(instrument))
    }

    pub fn clear_cache(&self) {
        self.inner.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imbalance::ImbalanceConfig;
    use crate::market_data::testing::{l2_book, perp_meta, ScriptedSource};
    use crate::universe::UniverseConfig;

    #[test]
    fn test_blocking_universe() {
        let source = ScriptedSource::new();
        source.set_perps(Ok(Some(perp_meta(&[("BTC", 40, false), ("ETH", 25, false)]))));
        let cache = AssetUniverseCache::with_source(UniverseConfig::default(), Arc::new(source.clone()));
        let blocking = BlockingUniverse::new(cache).unwrap();

        assert_eq!(blocking.perpetual_symbols(), vec!["BTCUSD", "ETHUSD"]);
        assert_eq!(blocking.top_perpetuals_by_leverage(1)[0].name, "BTC");
        assert_eq!(source.perp_calls(), 1);
    }

    #[test]
    fn test_blocking_imbalance() {
        let source = ScriptedSource::new();
        source.set_book("ETH", Ok(Some(l2_book("ETH", &[(100.0, 3.0)], &[(101.0, 1.0)]))));
        let engine = ImbalanceSignalEngine::with_source(&ImbalanceConfig::default(), Arc::new(source.clone()));
        let blocking = BlockingImbalance::new(engine).unwrap();

        assert_eq!(blocking.calculate("ETH").unwrap(), Some(0.5));
        assert!(blocking.breakdown("ETH").unwrap().is_some());
        blocking.clear_cache();
        assert!(blocking.inner().cached("ETH").is_none());
    }
}
