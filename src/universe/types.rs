use std::fmt;

use serde::{Deserialize, Serialize};

/// Perpetuals settle in USD(C); trading symbols carry this suffix.
pub const PERP_SETTLEMENT_SUFFIX: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Perpetual,
    Spot,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Perpetual => "perpetual",
            AssetClass::Spot => "spot",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerpetualAsset {
    pub name: String,
    pub sz_decimals: u32,
    /// Always >= 1.
    pub max_leverage: u32,
    pub only_isolated: bool,
    pub is_delisted: bool,
}

impl PerpetualAsset {
    /// e.g. "BTC" -> "BTCUSD"
    pub fn symbol(&self) -> String {
        format!("{}{}", self.name, PERP_SETTLEMENT_SUFFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpotAsset {
    pub index: u32,
    pub base: String,
    pub quote: String,
    pub base_token: u32,
    pub quote_token: u32,
    pub is_canonical: bool,
}

impl SpotAsset {
    /// "PURR/USDC"
    pub fn display_name(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }

    /// Identifier the exchange expects for this pair: the display name for
    /// canonical pairs, "@{index}" otherwise.
    pub fn api_id(&self) -> String {
        if self.is_canonical {
            self.display_name()
        } else {
            format!("@{}", self.index)
        }
    }

    /// "PURRUSDC"
    pub fn symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }

    pub fn is_quoted_in(&self, quote: &str) -> bool {
        self.quote.eq_ignore_ascii_case(quote)
    }
}
