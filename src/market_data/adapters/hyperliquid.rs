// Hyperliquid `/info` REST adapter

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::MarketDataSource;
use crate::error::{SourceError, SourceResult};

pub const DEFAULT_INFO_URL: &str = "https://api.hyperliquid.xyz/info";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HyperliquidConfig {
    pub info_url: String,
    /// Per-request timeout. Expiry surfaces as `SourceError::Timeout`.
    pub timeout_ms: u64,
}

impl Default for HyperliquidConfig {
    fn default() -> Self {
        Self {
            info_url: DEFAULT_INFO_URL.into(),
            timeout_ms: 5_000,
        }
    }
}

impl HyperliquidConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

pub struct HyperliquidInfoClient {
    http: reqwest::Client,
    info_url: String, // "https://api.hyperliquid.xyz/info"
    timeout: Duration,
    closed: AtomicBool,
}

impl HyperliquidInfoClient {
    pub fn new(config: &HyperliquidConfig) -> SourceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            info_url: config.info_url.clone(),
            timeout: config.timeout(),
            closed: AtomicBool::new(false),
        })
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    async fn post_info(&self, body: Value) -> SourceResult<Option<Value>> {
        if self.is_closed() {
            return Err(SourceError::Closed);
        }
        debug!(url = %self.info_url, body = %body, "POST /info");

        let res = self
            .http
            .post(&self.info_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        ensure_success(res.status())?;
        let doc: Value = res.json().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout)
            } else {
                SourceError::Decode(e.to_string())
            }
        })?;
        Ok(into_document(doc))
    }

    fn map_transport(&self, e: reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::Timeout(self.timeout)
        } else {
            SourceError::Transport(e.to_string())
        }
    }
}

fn ensure_success(status: StatusCode) -> SourceResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(SourceError::Status(status.as_u16()))
    }
}

// a literal `null` reply means "no document"
fn into_document(doc: Value) -> Option<Value> {
    if doc.is_null() {
        None
    } else {
        Some(doc)
    }
}

#[async_trait::async_trait]
impl MarketDataSource for HyperliquidInfoClient {
    async fn fetch_perpetuals_metadata(&self) -> SourceResult<Option<Value>> {
        self.post_info(json!({ "type": "meta" })).await
    }

    async fn fetch_spot_metadata(&self) -> SourceResult<Option<Value>> {
        self.post_info(json!({ "type": "spotMeta" })).await
    }

    async fn fetch_order_book(&self, coin: &str) -> SourceResult<Option<Value>> {
        self.post_info(json!({ "type": "l2Book", "coin": coin })).await
    }

    fn release(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!(url = %self.info_url, "released Hyperliquid info client");
        }
    }
}
