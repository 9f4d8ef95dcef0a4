//! Conversion from raw metadata documents into universe assets.
//!
//! Missing top-level lists are malformed payloads. A spot pair that points at
//! a token index the document does not define is dropped with a warning.

use ahash::AHashMap;
use serde_json::Value;
use tracing::warn;

use super::types::{PerpetualAsset, SpotAsset};
use crate::error::{Error, Result};
use crate::market_data::adapters::hyperliquid_types::{PerpMeta, SpotMeta};

pub fn parse_perpetuals(doc: Value) -> Result<Vec<PerpetualAsset>> {
    let meta: PerpMeta = serde_json::from_value(doc)
        .map_err(|e| Error::malformed(format!("perpetuals metadata: {e}")))?;

    Ok(meta
        .universe
        .into_iter()
        .map(|asset| PerpetualAsset {
            name: asset.name,
            sz_decimals: asset.sz_decimals,
            max_leverage: asset.max_leverage.max(1),
            only_isolated: asset.only_isolated,
            is_delisted: asset.is_delisted,
        })
        .collect())
}

pub fn parse_spot(doc: Value) -> Result<Vec<SpotAsset>> {
    let meta: SpotMeta = serde_json::from_value(doc)
        .map_err(|e| Error::malformed(format!("spot metadata: {e}")))?;

    let names: AHashMap<u32, String> = meta
        .tokens
        .into_iter()
        .map(|token| (token.index, token.name))
        .collect();

    let mut pairs = Vec::with_capacity(meta.universe.len());
    for pair in meta.universe {
        let (base_token, quote_token) = pair.tokens;
        let (Some(base), Some(quote)) = (names.get(&base_token), names.get(&quote_token)) else {
            warn!(pair = pair.index, base_token, quote_token, "spot pair references unknown token, skipping");
            continue;
        };
        pairs.push(SpotAsset {
            index: pair.index,
            base: base.clone(),
            quote: quote.clone(),
            base_token,
            quote_token,
            is_canonical: pair.is_canonical,
        });
    }
    Ok(pairs)
}
