/// Reference-currency suffixes stripped from tickers, longest first.
pub const QUOTE_SUFFIXES: [&str; 3] = ["USDC", "USDT", "USD"];

const PAIR_DELIMITERS: [char; 2] = ['/', '-'];

/// Map a higher-level ticker onto the coin the book endpoint expects.
///
/// "BTCUSD" -> "BTC", "ETH-USDT" -> "ETH", "PURR/HFUN" -> "PURR", "@107" -> "@107".
/// Suffixes match ignoring ASCII case and the base keeps its casing, so
/// "kPEPEusdc" -> "kPEPE". A ticker that is nothing but a suffix ("USDC") is
/// returned unchanged.
pub fn instrument_from_ticker(ticker: &str) -> &str {
    let ticker = ticker.trim();
    for suffix in QUOTE_SUFFIXES {
        if let Some(base) = strip_suffix_ignore_case(ticker, suffix) {
            let base = base.trim_end_matches(&PAIR_DELIMITERS[..]);
            if !base.is_empty() {
                return base;
            }
        }
    }
    match ticker.split_once(&PAIR_DELIMITERS[..]) {
        Some((base, _)) if !base.is_empty() => base,
        _ => ticker,
    }
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    let tail = s.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &s[..split])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_quote_suffixes() {
        assert_eq!(instrument_from_ticker("BTCUSD"), "BTC");
        assert_eq!(instrument_from_ticker("ETHUSDC"), "ETH");
        assert_eq!(instrument_from_ticker("SOLUSDT"), "SOL");
        assert_eq!(instrument_from_ticker("ETH-USDT"), "ETH");
        assert_eq!(instrument_from_ticker("PURR/USDC"), "PURR");
    }

    #[test]
    fn test_suffix_match_ignores_case() {
        assert_eq!(instrument_from_ticker("ethusdc"), "eth");
        assert_eq!(instrument_from_ticker("Btc-Usdt"), "Btc");
        assert_eq!(instrument_from_ticker("kPEPEusd"), "kPEPE");
        assert_eq!(instrument_from_ticker("usdc"), "usdc");
        // multi-byte tails never split a char
        assert_eq!(instrument_from_ticker("ПУРР"), "ПУРР");
    }

    #[test]
    fn test_pair_delimiter_fallback() {
        assert_eq!(instrument_from_ticker("PURR/HFUN"), "PURR");
        assert_eq!(instrument_from_ticker("kPEPE-PERP"), "kPEPE");
    }

    #[test]
    fn test_unchanged_tickers() {
        assert_eq!(instrument_from_ticker("HYPE"), "HYPE");
        assert_eq!(instrument_from_ticker("@107"), "@107");
        assert_eq!(instrument_from_ticker("USDC"), "USDC");
        assert_eq!(instrument_from_ticker(" BTC "), "BTC");
    }
}
