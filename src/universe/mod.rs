// Instrument universe: perpetual + spot metadata, cached until refreshed
pub mod cache; // AssetUniverseCache with single-flight population
pub mod meta;  // metadata documents -> domain assets
pub mod types; // PerpetualAsset, SpotAsset, AssetClass

pub use cache::{AssetUniverseCache, RefreshReport, SlotStatus, UniverseConfig, UniverseStatus};
pub use types::{AssetClass, PerpetualAsset, SpotAsset};
