// Lazily populated perpetual and spot universes. Fetches run outside the slot
// lock as a shared future, so cold-start callers join one upstream request.
// Lists never expire; a failed refresh leaves the previous list in place.

use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use itertools::Itertools;
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::meta;
use super::types::{AssetClass, PerpetualAsset, SpotAsset};
use crate::error::{Result, SourceError, SourceResult};
use crate::market_data::{HyperliquidConfig, HyperliquidInfoClient, MarketDataSource, Ownership, SourceHandle};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub reference_quote: String,
    pub major_prefixes: Vec<String>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            reference_quote: "USDC".into(),
            major_prefixes: ["BTC", "ETH", "SOL", "UBTC", "UETH", "USOL", "HYPE"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

type Assets<T> = Arc<[T]>;
type FetchOutcome<T> = Result<Assets<T>>;
type InFlight<T> = Shared<BoxFuture<'static, FetchOutcome<T>>>;

struct Slot<T> {
    assets: Option<Assets<T>>,
    populated_at: Option<Instant>,
    // fetches are numbered in start order; only a newer one may replace the list
    next_seq: u64,
    applied_seq: u64,
    in_flight: Option<(u64, InFlight<T>)>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Self {
            assets: None,
            populated_at: None,
            next_seq: 0,
            applied_seq: 0,
            in_flight: None,
        }
    }

    fn complete(&mut self, seq: u64, outcome: &FetchOutcome<T>) {
        if matches!(&self.in_flight, Some((pending, _)) if *pending == seq) {
            self.in_flight = None;
        }
        if let Ok(assets) = outcome {
            if seq > self.applied_seq {
                self.assets = Some(Arc::clone(assets));
                self.applied_seq = seq;
                self.populated_at = Some(Instant::now());
            } else {
                debug!(seq, applied = self.applied_seq, "discarding superseded universe fetch");
            }
        }
    }
}

enum Population<T> {
    Ready(Assets<T>),
    Pending(InFlight<T>),
}

impl<T> Population<T> {
    async fn settle(self) -> FetchOutcome<T> {
        match self {
            Population::Ready(assets) => Ok(assets),
            Population::Pending(pending) => pending.await,
        }
    }
}

struct SlotCell<T> {
    class: AssetClass,
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T: Send + Sync + 'static> SlotCell<T> {
    fn new(class: AssetClass) -> Self {
        Self {
            class,
            slot: Arc::new(Mutex::new(Slot::new())),
        }
    }

    fn is_populated(&self) -> bool {
        self.slot.lock().assets.is_some()
    }

    fn populate<F>(&self, fetch: F) -> Population<T>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Vec<T>>>,
    {
        let mut slot = self.slot.lock();
        if let Some(assets) = &slot.assets {
            return Population::Ready(Arc::clone(assets));
        }
        if let Some((_, pending)) = &slot.in_flight {
            return Population::Pending(pending.clone());
        }
        Population::Pending(self.start(&mut slot, fetch()))
    }

    // always a new fetch; cold-start callers join it
    fn refresh(&self, fetch: BoxFuture<'static, Result<Vec<T>>>) -> InFlight<T> {
        let mut slot = self.slot.lock();
        self.start(&mut slot, fetch)
    }

    fn start(&self, slot: &mut Slot<T>, fetch: BoxFuture<'static, Result<Vec<T>>>) -> InFlight<T> {
        slot.next_seq += 1;
        let seq = slot.next_seq;
        let class = self.class;
        let cell: Weak<Mutex<Slot<T>>> = Arc::downgrade(&self.slot);

        let pending = async move {
            let outcome: FetchOutcome<T> = fetch.await.map(Arc::from);
            if let Some(cell) = cell.upgrade() {
                cell.lock().complete(seq, &outcome);
            }
            record_fetch(class, &outcome);
            outcome
        }
        .boxed()
        .shared();

        slot.in_flight = Some((seq, pending.clone()));
        pending
    }

    fn status(&self) -> SlotStatus {
        let slot = self.slot.lock();
        SlotStatus {
            populated: slot.assets.is_some(),
            assets: slot.assets.as_ref().map_or(0, |a| a.len()),
            age: slot.populated_at.map(|at| at.elapsed()),
            fetching: slot.in_flight.is_some(),
        }
    }
}

fn record_fetch<T>(class: AssetClass, outcome: &FetchOutcome<T>) {
    match outcome {
        Ok(assets) => {
            info!(class = %class, assets = assets.len(), "universe refreshed");
            metrics::counter!("lobx_universe_fetch_total", "class" => class.as_str(), "outcome" => "ok").increment(1);
            metrics::gauge!("lobx_universe_assets", "class" => class.as_str()).set(assets.len() as f64);
        }
        Err(err) => {
            warn!(class = %class, error = %err, "universe fetch failed, keeping previous list");
            metrics::counter!("lobx_universe_fetch_total", "class" => class.as_str(), "outcome" => "error").increment(1);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStatus {
    pub populated: bool,
    pub assets: usize,
    pub age: Option<Duration>, // since last replaced
    pub fetching: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniverseStatus {
    pub perpetuals: SlotStatus,
    pub spot: SlotStatus,
}

/// Outcome of [`AssetUniverseCache::refresh_all`]; counts are list lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub perpetuals: Result<usize>,
    pub spot: Result<usize>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.perpetuals.is_ok() && self.spot.is_ok()
    }
}

pub struct AssetUniverseCache {
    source: SourceHandle,
    config: UniverseConfig,
    perpetuals: SlotCell<PerpetualAsset>,
    spot: SlotCell<SpotAsset>,
}

impl AssetUniverseCache {
    pub fn new(config: UniverseConfig, source: SourceHandle) -> Self {
        Self {
            source,
            config,
            perpetuals: SlotCell::new(AssetClass::Perpetual),
            spot: SlotCell::new(AssetClass::Spot),
        }
    }

    pub fn hyperliquid(config: UniverseConfig, hyperliquid: &HyperliquidConfig) -> SourceResult<Self> {
        let client = HyperliquidInfoClient::new(hyperliquid)?;
        Ok(Self::new(config, SourceHandle::owned(client)))
    }

    pub fn with_source(config: UniverseConfig, source: Arc<dyn MarketDataSource>) -> Self {
        Self::new(config, SourceHandle::borrowed(source))
    }

    pub fn ownership(&self) -> Ownership {
        self.source.ownership()
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    fn fetch_perpetuals(&self) -> BoxFuture<'static, Result<Vec<PerpetualAsset>>> {
        let source = self.source.source();
        async move {
            let doc = source.fetch_perpetuals_metadata().await?.ok_or(SourceError::Empty)?;
            meta::parse_perpetuals(doc)
        }
        .boxed()
    }

    fn fetch_spot(&self) -> BoxFuture<'static, Result<Vec<SpotAsset>>> {
        let source = self.source.source();
        async move {
            let doc = source.fetch_spot_metadata().await?.ok_or(SourceError::Empty)?;
            meta::parse_spot(doc)
        }
        .boxed()
    }

    async fn perpetual_assets(&self) -> Option<Assets<PerpetualAsset>> {
        self.perpetuals.populate(|| self.fetch_perpetuals()).settle().await.ok()
    }

    async fn spot_assets(&self) -> Option<Assets<SpotAsset>> {
        self.spot.populate(|| self.fetch_spot()).settle().await.ok()
    }

    /// Cached perpetuals, delisted ones dropped unless requested. Empty when
    /// the universe has never been loaded and the first fetch fails.
    pub async fn perpetuals(&self, include_delisted: bool) -> Vec<PerpetualAsset> {
        let Some(assets) = self.perpetual_assets().await else {
            return Vec::new();
        };
        assets
            .iter()
            .filter(|a| include_delisted || !a.is_delisted)
            .cloned()
            .collect()
    }

    /// Cached spot pairs, optionally limited to one quote token (full,
    /// case-insensitive match). A blank filter matches everything.
    pub async fn spot(&self, quote: Option<&str>) -> Vec<SpotAsset> {
        let Some(assets) = self.spot_assets().await else {
            return Vec::new();
        };
        let quote = quote.map(str::trim).filter(|q| !q.is_empty());
        assets
            .iter()
            .filter(|pair| quote.map_or(true, |q| pair.is_quoted_in(q)))
            .cloned()
            .collect()
    }

    pub async fn perpetual_symbols(&self) -> Vec<String> {
        self.perpetuals(false).await.iter().map(PerpetualAsset::symbol).collect()
    }

    pub async fn spot_symbols(&self, quote: Option<&str>) -> Vec<String> {
        self.spot(quote).await.iter().map(SpotAsset::symbol).collect()
    }

    /// Listed perpetuals by max leverage descending, ties by name ascending
    /// (ordinal byte comparison).
    pub async fn top_perpetuals_by_leverage(&self, n: usize) -> Vec<PerpetualAsset> {
        self.perpetuals(false)
            .await
            .into_iter()
            .sorted_by(|a, b| {
                b.max_leverage
                    .cmp(&a.max_leverage)
                    .then_with(|| a.name.cmp(&b.name))
            })
            .take(n)
            .collect()
    }

    pub async fn major_spot_pairs(&self) -> Vec<SpotAsset> {
        self.major_spot_pairs_with(self.config.major_prefixes.as_slice()).await
    }

    /// Pairs quoted in the reference currency whose base token equals or
    /// starts with one of `prefixes`, case-insensitively.
    pub async fn major_spot_pairs_with<S: AsRef<str>>(&self, prefixes: &[S]) -> Vec<SpotAsset> {
        let prefixes: Vec<String> = prefixes
            .iter()
            .map(|p| p.as_ref().trim().to_ascii_uppercase())
            .filter(|p| !p.is_empty())
            .collect();
        self.spot(Some(&self.config.reference_quote))
            .await
            .into_iter()
            .filter(|pair| {
                let base = pair.base.to_ascii_uppercase();
                prefixes.iter().any(|p| base.starts_with(p.as_str()))
            })
            .collect()
    }

    pub async fn refresh_perpetuals(&self) -> Result<usize> {
        let assets = self.perpetuals.refresh(self.fetch_perpetuals()).await?;
        Ok(assets.len())
    }

    pub async fn refresh_spot(&self) -> Result<usize> {
        let assets = self.spot.refresh(self.fetch_spot()).await?;
        Ok(assets.len())
    }

    /// Loads a class only if it has never been loaded. This is a cold-start
    /// gate, not a staleness check: after the first success it is a no-op for
    /// the life of the cache. Use the `refresh_*` methods to pick up changes.
    pub async fn refresh_if_needed(&self, class: AssetClass) -> Result<()> {
        match class {
            AssetClass::Perpetual => {
                self.perpetuals.populate(|| self.fetch_perpetuals()).settle().await?;
            }
            AssetClass::Spot => {
                self.spot.populate(|| self.fetch_spot()).settle().await?;
            }
        }
        Ok(())
    }

    pub async fn refresh_all(&self) -> RefreshReport {
        let (perpetuals, spot) = futures::join!(self.refresh_perpetuals(), self.refresh_spot());
        RefreshReport { perpetuals, spot }
    }

    pub fn is_populated(&self, class: AssetClass) -> bool {
        match class {
            AssetClass::Perpetual => self.perpetuals.is_populated(),
            AssetClass::Spot => self.spot.is_populated(),
        }
    }

    pub fn status(&self) -> UniverseStatus {
        UniverseStatus {
            perpetuals: self.perpetuals.status(),
            spot: self.spot.status(),
        }
    }
}
