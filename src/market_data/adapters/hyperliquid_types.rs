// Source: https://api.hyperliquid.xyz/info (POST bodies below)
use rust_decimal::Decimal;
use serde::Deserialize;

// Types for REST /info -> { "type": "meta" }
#[derive(Debug, Deserialize)]
pub struct PerpMeta {
    pub universe: Vec<PerpAssetMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerpAssetMeta {
    pub name: String,
    pub sz_decimals: u32,
    pub max_leverage: u32,
    #[serde(default)]
    pub only_isolated: bool,
    #[serde(default)]
    pub is_delisted: bool,
    // marginTableId and friends are ignored
}

// Types for REST /info -> { "type": "spotMeta" }
#[derive(Debug, Deserialize)]
pub struct SpotMeta {
    pub tokens: Vec<SpotToken>,
    pub universe: Vec<SpotPair>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotToken {
    pub name: String,
    pub index: u32,
    #[serde(default)]
    pub sz_decimals: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotPair {
    pub index: u32,
    pub tokens: (u32, u32), // (base_token_index, quote_token_index)
    #[serde(default)]
    pub is_canonical: bool,
}

// Types for REST /info -> { "type": "l2Book", "coin": "ETH" }
#[derive(Debug, Deserialize)]
pub struct L2Book {
    #[serde(default)]
    pub coin: String,
    pub levels: Vec<Vec<L2Level>>, // [bids, asks]
    #[serde(default)]
    pub time: u64,
}

#[derive(Debug, Deserialize)]
pub struct L2Level {
    pub px: Decimal, // price string, e.g. "1234.56"
    pub sz: Decimal, // size string, e.g. "0.01"
    #[serde(default = "default_order_count")]
    pub n: u32, // number of orders at this level
}

fn default_order_count() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_l2_level_defaults_order_count() {
        let level: L2Level = serde_json::from_str(r#"{"px":"101.5","sz":"2"}"#).unwrap();
        assert_eq!(level.px, dec!(101.5));
        assert_eq!(level.sz, dec!(2));
        assert_eq!(level.n, 1);
    }

    #[test]
    fn test_perp_meta_optional_flags() {
        let meta: PerpMeta = serde_json::from_str(
            r#"{"universe":[{"name":"BTC","szDecimals":5,"maxLeverage":40},
                            {"name":"FTT","szDecimals":1,"maxLeverage":3,"onlyIsolated":true,"isDelisted":true}]}"#,
        )
        .unwrap();
        assert!(!meta.universe[0].is_delisted);
        assert!(meta.universe[1].only_isolated);
        assert!(meta.universe[1].is_delisted);
    }
}
