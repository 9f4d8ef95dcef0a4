// Order-book imbalance signals
pub mod book;     // L2 snapshot parsing
pub mod engine;   // TTL-cached ImbalanceSignalEngine
pub mod obi;      // simple + depth-weighted imbalance
pub mod snapshot; // cached per-instrument signal + breakdown
pub mod ticker;   // ticker -> instrument id

pub use book::{BookLevel, OrderBookSnapshot};
pub use engine::{ImbalanceConfig, ImbalanceSignalEngine};
pub use obi::{ImbalanceMode, MAX_LEVELS, MIN_LEVELS};
pub use snapshot::{ImbalanceBreakdown, ImbalanceSnapshot};
pub use ticker::instrument_from_ticker;
