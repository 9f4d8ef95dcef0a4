//! Order-book imbalance over the top `levels` of each side.
//!
//! Both variants are `(bid - ask) / (bid + ask)` and therefore live in [-1, 1];
//! an empty denominator yields 0.
//!
//! - simple: plain size sums
//! - weighted: level `i` (0 = best) contributes `size / (i + 1)`. Missing
//!   levels contribute nothing, so a thin side is not penalised for depth it
//!   does not have.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::book::BookLevel;

pub const MIN_LEVELS: usize = 1;
pub const MAX_LEVELS: usize = 20;

pub fn clamp_levels(levels: usize) -> usize {
    levels.clamp(MIN_LEVELS, MAX_LEVELS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImbalanceMode {
    Simple,
    #[default]
    Weighted,
}

/// Total size over the first `levels` entries; `None` if the sum overflows.
pub fn depth(side: &[BookLevel], levels: usize) -> Option<Decimal> {
    side.iter()
        .take(levels)
        .try_fold(Decimal::ZERO, |total, l| total.checked_add(l.size))
}

pub fn weighted_depth(side: &[BookLevel], levels: usize) -> f64 {
    side.iter()
        .take(levels)
        .enumerate()
        .map(|(i, l)| l.size.to_f64().unwrap_or(0.0) / (i + 1) as f64)
        .sum()
}

pub fn simple_imbalance(bids: &[BookLevel], asks: &[BookLevel], levels: usize) -> Option<f64> {
    depth_imbalance(depth(bids, levels)?, depth(asks, levels)?)
}

/// Imbalance of two already summed depths; `None` if their total overflows.
pub fn depth_imbalance(bid: Decimal, ask: Decimal) -> Option<f64> {
    let total = bid.checked_add(ask)?;
    if total.is_zero() {
        return Some(0.0);
    }
    let ratio = (bid - ask).checked_div(total)?;
    Some(ratio.to_f64().unwrap_or(0.0).clamp(-1.0, 1.0))
}

pub fn weighted_imbalance(bids: &[BookLevel], asks: &[BookLevel], levels: usize) -> f64 {
    normalized(weighted_depth(bids, levels), weighted_depth(asks, levels))
}

fn normalized(bid: f64, ask: f64) -> f64 {
    let total = bid + ask;
    if !total.is_finite() || total <= 0.0 {
        return 0.0;
    }
    ((bid - ask) / total).clamp(-1.0, 1.0)
}
