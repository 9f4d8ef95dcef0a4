// Scripted in-memory market data source with call counters

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::Mutex;
use serde_json::{json, Value};

use super::MarketDataSource;
use crate::error::{SourceError, SourceResult};

type Scripted = SourceResult<Option<Value>>;

#[derive(Clone)]
pub struct ScriptedSource {
    inner: Arc<Inner>,
}

struct Inner {
    perps: Mutex<Scripted>,
    spot: Mutex<Scripted>,
    books: Mutex<AHashMap<String, Scripted>>,
    latency: Mutex<Option<Duration>>,
    perp_calls: AtomicUsize,
    spot_calls: AtomicUsize,
    book_calls: AtomicUsize,
    releases: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                perps: Mutex::new(Ok(None)),
                spot: Mutex::new(Ok(None)),
                books: Mutex::new(AHashMap::new()),
                latency: Mutex::new(None),
                perp_calls: AtomicUsize::new(0),
                spot_calls: AtomicUsize::new(0),
                book_calls: AtomicUsize::new(0),
                releases: AtomicUsize::new(0),
            }),
        }
    }

    pub fn set_perps(&self, doc: Scripted) {
        *self.inner.perps.lock() = doc;
    }

    pub fn set_spot(&self, doc: Scripted) {
        *self.inner.spot.lock() = doc;
    }

    pub fn set_book(&self, coin: &str, doc: Scripted) {
        self.inner.books.lock().insert(coin.to_string(), doc);
    }

    /// Every fetch sleeps this long first (tokio time, so pausable).
    pub fn set_latency(&self, latency: Duration) {
        *self.inner.latency.lock() = Some(latency);
    }

    pub fn perp_calls(&self) -> usize {
        self.inner.perp_calls.load(Ordering::SeqCst)
    }

    pub fn spot_calls(&self) -> usize {
        self.inner.spot_calls.load(Ordering::SeqCst)
    }

    pub fn book_calls(&self) -> usize {
        self.inner.book_calls.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.inner.releases.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        let latency = *self.inner.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait::async_trait]
impl MarketDataSource for ScriptedSource {
    async fn fetch_perpetuals_metadata(&self) -> SourceResult<Option<Value>> {
        self.inner.perp_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        self.inner.perps.lock().clone()
    }

    async fn fetch_spot_metadata(&self) -> SourceResult<Option<Value>> {
        self.inner.spot_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        self.inner.spot.lock().clone()
    }

    async fn fetch_order_book(&self, coin: &str) -> SourceResult<Option<Value>> {
        self.inner.book_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        self.inner
            .books
            .lock()
            .get(coin)
            .cloned()
            .unwrap_or(Err(SourceError::Transport(format!("no book scripted for {coin}"))))
    }

    fn release(&self) {
        self.inner.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// `meta` document with the given (name, max_leverage, is_delisted) rows.
pub fn perp_meta(rows: &[(&str, u32, bool)]) -> Value {
    let universe: Vec<Value> = rows
        .iter()
        .map(|(name, lev, delisted)| {
            json!({ "name": name, "szDecimals": 2, "maxLeverage": lev, "isDelisted": delisted })
        })
        .collect();
    json!({ "universe": universe })
}

/// `spotMeta` document. Tokens get their position as index; pairs are
/// (pair_index, base_token, quote_token, is_canonical).
pub fn spot_meta(tokens: &[&str], pairs: &[(u32, u32, u32, bool)]) -> Value {
    let tokens: Vec<Value> = tokens
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "name": name, "index": i, "szDecimals": 2 }))
        .collect();
    let universe: Vec<Value> = pairs
        .iter()
        .map(|(index, base, quote, canonical)| {
            json!({ "index": index, "tokens": [base, quote], "isCanonical": canonical })
        })
        .collect();
    json!({ "tokens": tokens, "universe": universe })
}

/// `l2Book` document from (price, size) pairs, best level first.
pub fn l2_book(coin: &str, bids: &[(f64, f64)], asks: &[(f64, f64)]) -> Value {
    let side = |levels: &[(f64, f64)]| -> Vec<Value> {
        levels
            .iter()
            .map(|(px, sz)| json!({ "px": px.to_string(), "sz": sz.to_string(), "n": 1 }))
            .collect()
    };
    json!({ "coin": coin, "time": 1_700_000_000_000u64, "levels": [side(bids), side(asks)] })
}
