//! Host configuration.
//!
//! The library types take their settings as plain structs; this loader is for
//! the binary. Sources, lowest precedence first: built-in defaults, an optional
//! config file, then `LOBX__SECTION__KEY` environment variables (a `.env` file
//! is loaded first if present).

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::imbalance::ImbalanceConfig;
use crate::market_data::HyperliquidConfig;
use crate::universe::UniverseConfig;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
    pub hyperliquid: HyperliquidConfig,
    pub universe: UniverseConfig,
    pub imbalance: ImbalanceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            hyperliquid: HyperliquidConfig::default(),
            universe: UniverseConfig::default(),
            imbalance: ImbalanceConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        Self::from_builder(builder.add_source(
            Environment::with_prefix("LOBX")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("universe.major_prefixes"),
        ))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imbalance::ImbalanceMode;
    use config::FileFormat;

    #[test]
    fn test_defaults_when_nothing_configured() {
        let cfg = AppConfig::from_builder(Config::builder()).unwrap();
        assert_eq!(cfg.log_filter, "info");
        assert_eq!(cfg.imbalance.levels, 5);
        assert_eq!(cfg.imbalance.mode, ImbalanceMode::Weighted);
        assert_eq!(cfg.universe.reference_quote, "USDC");
        assert_eq!(cfg.hyperliquid.timeout_ms, 5_000);
    }

    #[test]
    fn test_partial_file_overrides() {
        let json = r#"{
            "imbalance": { "levels": 10, "mode": "simple" },
            "universe": { "major_prefixes": ["btc", "eth"] }
        }"#;
        let builder = Config::builder().add_source(File::from_str(json, FileFormat::Json));
        let cfg = AppConfig::from_builder(builder).unwrap();

        assert_eq!(cfg.imbalance.levels, 10);
        assert_eq!(cfg.imbalance.mode, ImbalanceMode::Simple);
        assert_eq!(cfg.imbalance.ttl_secs, 2.0);
        assert_eq!(cfg.universe.major_prefixes, vec!["btc", "eth"]);
        assert_eq!(cfg.universe.reference_quote, "USDC");
    }
}
