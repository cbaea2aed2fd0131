//! Ticker mention extraction from free text.

use regex::Regex;
use sentiment_core::SentimentError;
use std::collections::{BTreeSet, HashSet};

/// Upper-case words that look like tickers but almost never are.
pub const TICKER_BLACKLIST: &[&str] = &[
    "I", "A", "THE", "AND", "OR", "BUT", "FOR", "TO", "AT", "BY", "UP", "DOWN", "IN", "OUT",
    "ON", "OFF", "ALL", "NEW", "OLD", "BUY", "SELL", "HOLD", "LONG", "SHORT", "PUT", "CALL",
    "DD", "ETF", "IPO", "CEO", "CFO", "COO", "USA", "USD", "GDP", "EPS", "PE", "PEG", "RSI",
    "MACD", "EMA", "SMA", "ATH", "LOL", "IMO", "TLDR", "YOLO", "FOMO", "FUD", "HODL", "WSB",
    "SEC", "FDA", "NYSE", "NASDAQ", "SP", "DOW", "QQQ", "SPY", "VOO", "VTI",
];

/// `{}` is replaced by the lower-cased ticker.
const CONTEXT_PHRASES: &[&str] = &[
    "{} stock",
    "{} shares",
    "{} calls",
    "{} puts",
    "buying {}",
    "selling {}",
    "holding {}",
];

pub struct TickerExtractor {
    candidate: Regex,
    blacklist: HashSet<String>,
}

impl TickerExtractor {
    pub fn new() -> Result<Self, SentimentError> {
        let candidate = Regex::new(r"\b[A-Z]{1,5}\b")
            .map_err(|e| SentimentError::InvalidPattern(format!("ticker candidate: {e}")))?;
        Ok(Self {
            candidate,
            blacklist: TICKER_BLACKLIST.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Add words that should never be reported as tickers.
    pub fn with_blacklist<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.blacklist
            .extend(words.into_iter().map(|w| w.as_ref().to_uppercase()));
        self
    }

    /// Tickers mentioned in `text`, deduplicated and sorted.
    ///
    /// A candidate counts when it is written as a cashtag, appears more than
    /// once, or sits in a trading phrase such as "buying amd".
    pub fn extract(&self, text: &str) -> Vec<String> {
        let candidates: Vec<&str> = self
            .candidate
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|c| c.len() > 1 && !self.blacklist.contains(*c))
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        let lower = text.to_lowercase();
        let mut tickers = BTreeSet::new();
        for &ticker in &candidates {
            if tickers.contains(ticker) {
                continue;
            }
            let ticker_lower = ticker.to_lowercase();
            let cashtag = lower.contains(&format!("${ticker_lower}"));
            let repeated = candidates.iter().filter(|c| **c == ticker).count() > 1;
            let in_context = CONTEXT_PHRASES
                .iter()
                .any(|phrase| lower.contains(&phrase.replace("{}", &ticker_lower)));

            if cashtag || repeated || in_context {
                tickers.insert(ticker.to_string());
            }
        }
        tickers.into_iter().collect()
    }
}
