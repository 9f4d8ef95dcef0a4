use std::sync::Arc;
use std::time::Duration;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::time::Instant;

use super::book::OrderBookSnapshot;
use super::obi::{self, ImbalanceMode};
use crate::error::{Error, Result};

/// Signal computed from one book fetch. Cached per instrument.
#[derive(Debug, Clone)]
pub struct ImbalanceSnapshot {
    pub instrument: String,
    pub captured_at: Instant,
    pub simple: f64,
    pub weighted: f64,
    /// Size summed over the considered depth.
    pub bid_depth: Decimal,
    pub ask_depth: Decimal,
    /// Levels actually present within the considered depth.
    pub bid_levels: usize,
    pub ask_levels: usize,
    pub spread: Decimal,
    pub mid_price: Decimal,
    pub book: Arc<OrderBookSnapshot>,
}

impl ImbalanceSnapshot {
    /// Fails as malformed when the book's sizes do not fit a decimal sum.
    pub fn compute(instrument: &str, book: OrderBookSnapshot, levels: usize) -> Result<Self> {
        let levels = obi::clamp_levels(levels);
        let overflow = || Error::malformed(format!("l2 book for {instrument}: depth overflows"));
        let bid_depth = obi::depth(&book.bids, levels).ok_or_else(overflow)?;
        let ask_depth = obi::depth(&book.asks, levels).ok_or_else(overflow)?;
        let simple = obi::depth_imbalance(bid_depth, ask_depth).ok_or_else(overflow)?;

        Ok(Self {
            instrument: instrument.to_string(),
            captured_at: Instant::now(),
            simple,
            weighted: obi::weighted_imbalance(&book.bids, &book.asks, levels),
            bid_depth,
            ask_depth,
            bid_levels: book.bids.len().min(levels),
            ask_levels: book.asks.len().min(levels),
            spread: book.spread(),
            mid_price: book.mid_price(),
            book: Arc::new(book),
        })
    }

    pub fn value(&self, mode: ImbalanceMode) -> f64 {
        match mode {
            ImbalanceMode::Simple => self.simple,
            ImbalanceMode::Weighted => self.weighted,
        }
    }

    pub fn age(&self) -> Duration {
        self.captured_at.elapsed()
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }

    /// Spread relative to mid in basis points; 0 when there is no mid.
    pub fn spread_bps(&self) -> f64 {
        if self.mid_price <= Decimal::ZERO {
            return 0.0;
        }
        self.spread
            .checked_div(self.mid_price)
            .and_then(|ratio| ratio.checked_mul(Decimal::from(10_000)))
            .and_then(|bps| bps.to_f64())
            .unwrap_or(0.0)
    }

    pub fn breakdown(&self, mode: ImbalanceMode) -> ImbalanceBreakdown {
        ImbalanceBreakdown {
            instrument: self.instrument.clone(),
            mode,
            imbalance: self.value(mode),
            simple: self.simple,
            weighted: self.weighted,
            bid_depth: self.bid_depth,
            ask_depth: self.ask_depth,
            bid_levels: self.bid_levels,
            ask_levels: self.ask_levels,
            spread: self.spread,
            mid_price: self.mid_price,
            spread_bps: self.spread_bps(),
            age: self.age(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImbalanceBreakdown {
    pub instrument: String,
    pub mode: ImbalanceMode,
    /// The configured-mode value.
    pub imbalance: f64,
    pub simple: f64,
    pub weighted: f64,
    pub bid_depth: Decimal,
    pub ask_depth: Decimal,
    pub bid_levels: usize,
    pub ask_levels: usize,
    pub spread: Decimal,
    pub mid_price: Decimal,
    pub spread_bps: f64,
    pub age: Duration,
}
