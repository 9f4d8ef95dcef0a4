// TTL-cached imbalance signals keyed by instrument. Book fetches run outside
// the map lock; same-instrument refreshes are not coalesced (last write wins).

use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, warn};

use super::book::OrderBookSnapshot;
use super::obi::{self, ImbalanceMode};
use super::snapshot::{ImbalanceBreakdown, ImbalanceSnapshot};
use super::ticker::instrument_from_ticker;
use crate::error::{Error, Result, SourceError, SourceResult};
use crate::market_data::{HyperliquidConfig, HyperliquidInfoClient, MarketDataSource, Ownership, SourceHandle};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImbalanceConfig {
    pub levels: usize, // per side, clamped to [1, 20]
    pub mode: ImbalanceMode,
    pub ttl_secs: f64,
}

impl Default for ImbalanceConfig {
    fn default() -> Self {
        Self {
            levels: 5,
            mode: ImbalanceMode::default(),
            ttl_secs: 2.0,
        }
    }
}

impl ImbalanceConfig {
    pub fn depth(&self) -> usize {
        obi::clamp_levels(self.levels)
    }

    /// Non-positive or NaN TTLs disable caching.
    pub fn ttl(&self) -> Duration {
        if self.ttl_secs.is_nan() || self.ttl_secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(self.ttl_secs).unwrap_or(Duration::MAX)
    }
}

pub struct ImbalanceSignalEngine {
    source: SourceHandle,
    levels: usize,
    mode: ImbalanceMode,
    ttl: Duration,
    cache: RwLock<AHashMap<String, Arc<ImbalanceSnapshot>>>,
}

impl ImbalanceSignalEngine {
    pub fn new(config: &ImbalanceConfig, source: SourceHandle) -> Self {
        Self {
            source,
            levels: config.depth(),
            mode: config.mode,
            ttl: config.ttl(),
            cache: RwLock::new(AHashMap::new()),
        }
    }

    pub fn hyperliquid(config: &ImbalanceConfig, hyperliquid: &HyperliquidConfig) -> SourceResult<Self> {
        let client = HyperliquidInfoClient::new(hyperliquid)?;
        Ok(Self::new(config, SourceHandle::owned(client)))
    }

    pub fn with_source(config: &ImbalanceConfig, source: Arc<dyn MarketDataSource>) -> Self {
        Self::new(config, SourceHandle::borrowed(source))
    }

    pub fn ownership(&self) -> Ownership {
        self.source.ownership()
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn mode(&self) -> ImbalanceMode {
        self.mode
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Configured-mode imbalance in [-1, 1], or `None` when the book is
    /// unavailable. Only a blank instrument id is an error.
    pub async fn calculate(&self, instrument: &str) -> Result<Option<f64>> {
        Ok(self.snapshot(instrument).await?.map(|s| s.value(self.mode)))
    }

    /// [`calculate`](Self::calculate) for a ticker such as "BTCUSD" or "ETH/USDC".
    pub async fn calculate_for_ticker(&self, ticker: &str) -> Result<Option<f64>> {
        self.calculate(instrument_from_ticker(ticker)).await
    }

    pub async fn order_book(&self, instrument: &str) -> Result<Option<Arc<OrderBookSnapshot>>> {
        Ok(self.snapshot(instrument).await?.map(|s| Arc::clone(&s.book)))
    }

    pub async fn breakdown(&self, instrument: &str) -> Result<Option<ImbalanceBreakdown>> {
        Ok(self.snapshot(instrument).await?.map(|s| s.breakdown(self.mode)))
    }

    /// Fresh cached entry, or a newly computed one. Fetch and parse failures
    /// are logged and reported as `None`; any stale entry stays in place.
    pub async fn snapshot(&self, instrument: &str) -> Result<Option<Arc<ImbalanceSnapshot>>> {
        let instrument = validate_instrument(instrument)?;

        if let Some(entry) = self.fresh(instrument) {
            metrics::counter!("lobx_imbalance_cache_total", "outcome" => "hit").increment(1);
            return Ok(Some(entry));
        }
        metrics::counter!("lobx_imbalance_cache_total", "outcome" => "miss").increment(1);

        match self.compute(instrument).await {
            Ok(entry) => Ok(Some(entry)),
            Err(err) => {
                warn!(instrument, error = %err, "order book unavailable");
                metrics::counter!("lobx_imbalance_fetch_failures_total").increment(1);
                Ok(None)
            }
        }
    }

    // fresh or not
    pub fn cached(&self, instrument: &str) -> Option<Arc<ImbalanceSnapshot>> {
        self.cache.read().get(instrument.trim()).cloned()
    }

    pub fn cached_instruments(&self) -> Vec<String> {
        self.cache.read().keys().cloned().collect()
    }

    pub fn evict(&self, instrument: &str) -> bool {
        self.cache.write().remove(instrument.trim()).is_some()
    }

    pub fn clear_cache(&self) {
        let mut cache = self.cache.write();
        debug!(entries = cache.len(), "clearing imbalance cache");
        cache.clear();
    }

    fn fresh(&self, instrument: &str) -> Option<Arc<ImbalanceSnapshot>> {
        self.cache
            .read()
            .get(instrument)
            .filter(|entry| entry.is_fresh(self.ttl))
            .cloned()
    }

    async fn compute(&self, instrument: &str) -> Result<Arc<ImbalanceSnapshot>> {
        let doc = self
            .source
            .get()
            .fetch_order_book(instrument)
            .await?
            .ok_or(SourceError::Empty)?;
        let book = OrderBookSnapshot::parse(instrument, doc)?;
        let entry = Arc::new(ImbalanceSnapshot::compute(instrument, book, self.levels)?);

        debug!(
            instrument,
            simple = entry.simple,
            weighted = entry.weighted,
            bid_levels = entry.bid_levels,
            ask_levels = entry.ask_levels,
            "computed imbalance"
        );
        self.cache
            .write()
            .insert(instrument.to_string(), Arc::clone(&entry));
        Ok(entry)
    }
}

fn validate_instrument(instrument: &str) -> Result<&str> {
    let trimmed = instrument.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInstrument(instrument.to_string()));
    }
    Ok(trimmed)
}
