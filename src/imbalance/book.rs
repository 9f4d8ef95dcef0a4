use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::market_data::adapters::hyperliquid_types::{L2Book, L2Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub size: Decimal,
    pub orders: u32,
}

impl From<L2Level> for BookLevel {
    fn from(level: L2Level) -> Self {
        Self {
            price: level.px,
            size: level.sz,
            orders: level.n,
        }
    }
}

/// One L2 snapshot, best level first on each side, plus the document it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBookSnapshot {
    pub coin: String,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    pub time_ms: u64,
    pub raw: Value,
}

impl OrderBookSnapshot {
    /// Parse an `l2Book` document. Fewer than two level groups, a missing
    /// `levels` field or a negative price/size make the document malformed.
    pub fn parse(coin: &str, raw: Value) -> Result<Self> {
        let book: L2Book = serde_json::from_value(raw.clone())
            .map_err(|e| Error::malformed(format!("l2 book for {coin}: {e}")))?;

        if book.levels.len() < 2 {
            return Err(Error::malformed(format!(
                "l2 book for {coin}: expected bid and ask groups, got {}",
                book.levels.len()
            )));
        }

        let mut groups = book.levels.into_iter();
        let bids = side(coin, groups.next().unwrap_or_default())?;
        let asks = side(coin, groups.next().unwrap_or_default())?;

        Ok(Self {
            coin: if book.coin.is_empty() { coin.to_string() } else { book.coin },
            bids,
            asks,
            time_ms: book.time,
            raw,
        })
    }

    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.first()
    }

    /// best ask - best bid, floored at zero; zero when either side is empty.
    pub fn spread(&self) -> Decimal {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => (ask.price - bid.price).max(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }

    /// (best bid + best ask) / 2; zero when either side is empty.
    pub fn mid_price(&self) -> Decimal {
        match (self.best_bid(), self.best_ask()) {
            // prices are non-negative, so the difference never overflows
            (Some(bid), Some(ask)) => bid
                .price
                .checked_add(ask.price)
                .map(|sum| sum / Decimal::TWO)
                .or_else(|| bid.price.checked_add((ask.price - bid.price) / Decimal::TWO))
                .unwrap_or_else(|| bid.price.max(ask.price)),
            _ => Decimal::ZERO,
        }
    }
}

fn side(coin: &str, levels: Vec<L2Level>) -> Result<Vec<BookLevel>> {
    levels
        .into_iter()
        .map(|level| {
            if level.px.is_sign_negative() || level.sz.is_sign_negative() {
                Err(Error::malformed(format!(
                    "l2 book for {coin}: negative level {} @ {}",
                    level.sz, level.px
                )))
            } else {
                Ok(BookLevel::from(level))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::testing::l2_book;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_levels_and_stats() {
        let doc = l2_book("ETH", &[(100.0, 5.0), (99.0, 3.0)], &[(101.0, 4.0)]);
        let book = OrderBookSnapshot::parse("ETH", doc.clone()).unwrap();
        assert_eq!(book.coin, "ETH");
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.asks.len(), 1);
        assert_eq!(book.best_bid().unwrap().price, dec!(100));
        assert_eq!(book.spread(), dec!(1));
        assert_eq!(book.mid_price(), dec!(100.5));
        assert_eq!(book.raw, doc);
    }

    #[test]
    fn test_missing_order_count_defaults_to_one() {
        let doc = json!({ "levels": [[{ "px": "10", "sz": "1" }], []] });
        let book = OrderBookSnapshot::parse("PURR", doc).unwrap();
        assert_eq!(book.coin, "PURR");
        assert_eq!(book.bids[0].orders, 1);
    }

    #[test]
    fn test_one_sided_book_has_zero_spread_and_mid() {
        let doc = l2_book("ETH", &[(100.0, 5.0)], &[]);
        let book = OrderBookSnapshot::parse("ETH", doc).unwrap();
        assert_eq!(book.spread(), Decimal::ZERO);
        assert_eq!(book.mid_price(), Decimal::ZERO);
    }

    #[test]
    fn test_mid_price_of_extreme_prices() {
        let max = Decimal::MAX.to_string();
        let doc = json!({ "levels": [[{ "px": max, "sz": "1" }], [{ "px": max, "sz": "1" }]] });
        let book = OrderBookSnapshot::parse("X", doc).unwrap();
        assert_eq!(book.spread(), Decimal::ZERO);
        assert_eq!(book.mid_price(), Decimal::MAX);
    }

    #[test]
    fn test_invalid_documents() {
        let single_group = json!({ "levels": [[{ "px": "10", "sz": "1", "n": 2 }]] });
        assert!(matches!(OrderBookSnapshot::parse("X", single_group), Err(Error::Malformed(_))));

        let no_levels = json!({ "coin": "X", "time": 1 });
        assert!(matches!(OrderBookSnapshot::parse("X", no_levels), Err(Error::Malformed(_))));

        let negative = json!({ "levels": [[{ "px": "10", "sz": "-1" }], []] });
        assert!(matches!(OrderBookSnapshot::parse("X", negative), Err(Error::Malformed(_))));
    }
}
