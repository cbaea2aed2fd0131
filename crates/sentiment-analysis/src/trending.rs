//! Trending Module
//!
//! Rolls scored ticker mentions up into the per-ticker views the dashboard
//! shows: trending rank over a window, per-day rows, and the market summary
//! for one day.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sentiment_core::weighted::{mean, ratio, round4, weighted_mean};
use sentiment_core::{LabelCounts, SentimentLabel, SentimentResult, TextItem};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::tickers::TickerExtractor;

/// Look-back period for trending queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum TrendingWindow {
    #[default]
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TrendingWindow {
    /// Parse "24h", "7d" or "30d". Anything else means the last 24 hours.
    pub fn parse(period: &str) -> Self {
        match period.trim() {
            "7d" => TrendingWindow::Week,
            "30d" => TrendingWindow::Month,
            _ => TrendingWindow::Day,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "24h",
            TrendingWindow::Week => "7d",
            TrendingWindow::Month => "30d",
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            TrendingWindow::Day => 1,
            TrendingWindow::Week => 7,
            TrendingWindow::Month => 30,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::days(self.days())
    }
}

/// Where a mention was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MentionSource {
    Post,
    Comment,
}

/// One scored mention of one ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TickerMention {
    pub ticker: String,
    pub timestamp: DateTime<Utc>,
    pub source: MentionSource,
    pub result: SentimentResult,
}

impl TickerMention {
    pub fn new(
        ticker: impl Into<String>,
        timestamp: DateTime<Utc>,
        source: MentionSource,
        result: SentimentResult,
    ) -> Self {
        Self {
            ticker: ticker.into().trim().to_uppercase(),
            timestamp,
            source,
            result,
        }
    }
}

/// Fan a scored item out into one mention per distinct ticker it names.
///
/// Items that arrive without tickers get them extracted from the body.
pub fn mentions_from_item(
    item: &TextItem,
    extractor: &TickerExtractor,
    timestamp: DateTime<Utc>,
    source: MentionSource,
    result: &SentimentResult,
) -> Vec<TickerMention> {
    let named: Vec<String> = if item.tickers.is_empty() {
        extractor.extract(&item.body)
    } else {
        item.tickers.clone()
    };
    let tickers: BTreeSet<String> = named
        .iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();

    tickers
        .into_iter()
        .map(|ticker| TickerMention::new(ticker, timestamp, source, result.clone()))
        .collect()
}

/// A ticker's standing in the trending list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TrendingTicker {
    pub ticker: String,
    pub total_mentions: usize,
    /// Confidence-weighted mean score of the mentions
    pub avg_sentiment: f64,
    pub positive_mentions: usize,
    pub negative_mentions: usize,
    pub neutral_mentions: usize,
    /// Positive / negative mentions; absent without negatives
    pub sentiment_ratio: Option<f64>,
}

/// Rank tickers by mention count inside `window` ending at `now`.
///
/// Filtered (bot/meta) results never count. Equal mention counts are
/// ordered alphabetically by ticker.
pub fn rank_trending(
    mentions: &[TickerMention],
    window: TrendingWindow,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<TrendingTicker> {
    let cutoff = now - window.duration();

    let mut by_ticker: BTreeMap<&str, Vec<&SentimentResult>> = BTreeMap::new();
    for mention in mentions {
        if mention.timestamp < cutoff || mention.result.filtered {
            continue;
        }
        by_ticker.entry(mention.ticker.as_str()).or_default().push(&mention.result);
    }

    let mut trending: Vec<TrendingTicker> = by_ticker
        .into_iter()
        .map(|(ticker, results)| {
            let counts: LabelCounts = results.iter().map(|r| r.label).collect();
            let sentiment_ratio = (counts.negative > 0)
                .then(|| round4(ratio(counts.positive as f64, counts.negative as f64)));

            TrendingTicker {
                ticker: ticker.to_string(),
                total_mentions: results.len(),
                avg_sentiment: round4(weighted_mean(results.iter().map(|r| (r.score, r.confidence)))),
                positive_mentions: counts.positive,
                negative_mentions: counts.negative,
                neutral_mentions: counts.neutral,
                sentiment_ratio,
            }
        })
        .collect();

    trending.sort_by(|a, b| {
        b.total_mentions
            .cmp(&a.total_mentions)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    trending.truncate(limit);

    debug!(window = window.as_str(), tickers = trending.len(), "Ranked trending tickers");
    trending
}

/// Per-ticker, per-day roll-up row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DailyTickerSentiment {
    pub ticker: String,
    /// UTC calendar day
    pub date: NaiveDate,
    pub total_mentions: usize,
    pub post_mentions: usize,
    pub comment_mentions: usize,
    pub avg_sentiment: f64,
    pub counts: LabelCounts,
}

/// Group mentions into (ticker, UTC day) rows, ordered by ticker then day.
pub fn daily_summaries(mentions: &[TickerMention]) -> Vec<DailyTickerSentiment> {
    let mut buckets: BTreeMap<(&str, NaiveDate), Vec<&TickerMention>> = BTreeMap::new();
    for mention in mentions.iter().filter(|m| !m.result.filtered) {
        buckets
            .entry((mention.ticker.as_str(), mention.timestamp.date_naive()))
            .or_default()
            .push(mention);
    }

    buckets
        .into_iter()
        .map(|((ticker, date), day)| {
            let posts = day.iter().filter(|m| m.source == MentionSource::Post).count();
            DailyTickerSentiment {
                ticker: ticker.to_string(),
                date,
                total_mentions: day.len(),
                post_mentions: posts,
                comment_mentions: day.len() - posts,
                avg_sentiment: round4(weighted_mean(
                    day.iter().map(|m| (m.result.score, m.result.confidence)),
                )),
                counts: day.iter().map(|m| m.result.label).collect(),
            }
        })
        .collect()
}

/// Overall market tone for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MarketMood {
    Bullish,
    Bearish,
    Neutral,
}

impl MarketMood {
    /// Strictly above 0.1 is bullish, strictly below -0.1 bearish.
    pub fn from_score(avg_sentiment: f64) -> Self {
        if avg_sentiment > 0.1 {
            MarketMood::Bullish
        } else if avg_sentiment < -0.1 {
            MarketMood::Bearish
        } else {
            MarketMood::Neutral
        }
    }
}

/// Market-wide summary for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MarketSummary {
    pub date: NaiveDate,
    pub total_mentions: usize,
    pub total_posts: usize,
    pub sentiment_breakdown: LabelCounts,
    /// Mean of the per-ticker daily averages
    pub avg_sentiment: f64,
    pub market_mood: MarketMood,
}

/// Summarise the rows for `date`. A day with no rows is neutral and empty.
pub fn market_summary(rows: &[DailyTickerSentiment], date: NaiveDate) -> MarketSummary {
    let day: Vec<&DailyTickerSentiment> = rows.iter().filter(|r| r.date == date).collect();

    let mut breakdown = LabelCounts::default();
    for row in &day {
        breakdown.positive += row.counts.get(SentimentLabel::Positive);
        breakdown.negative += row.counts.get(SentimentLabel::Negative);
        breakdown.neutral += row.counts.get(SentimentLabel::Neutral);
    }

    let averages: Vec<f64> = day.iter().map(|r| r.avg_sentiment).collect();
    let avg_sentiment = round4(mean(&averages));

    MarketSummary {
        date,
        total_mentions: day.iter().map(|r| r.total_mentions).sum(),
        total_posts: day.iter().map(|r| r.post_mentions).sum(),
        sentiment_breakdown: breakdown,
        avg_sentiment,
        market_mood: MarketMood::from_score(avg_sentiment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sentiment_core::{FilterReason, ScoringMethod};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap()
    }

    fn result(score: f64, confidence: f64) -> SentimentResult {
        SentimentResult {
            score,
            label: SentimentLabel::from_score(score),
            confidence,
            lexicon_compound: score,
            statistical_polarity: 0.0,
            subjectivity: 0.5,
            sarcasm_confidence: 0.0,
            sarcasm_detected: false,
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
            filtered: false,
            filter_reason: None,
            method: ScoringMethod::Fused,
        }
    }

    fn mention(ticker: &str, hours_ago: i64, source: MentionSource, score: f64) -> TickerMention {
        TickerMention::new(ticker, now() - Duration::hours(hours_ago), source, result(score, 0.5))
    }

    #[test]
    fn test_window_parse() {
        assert_eq!(TrendingWindow::parse("7d"), TrendingWindow::Week);
        assert_eq!(TrendingWindow::parse("30d"), TrendingWindow::Month);
        assert_eq!(TrendingWindow::parse("24h"), TrendingWindow::Day);
        assert_eq!(TrendingWindow::parse("1y"), TrendingWindow::Day);
        assert_eq!(TrendingWindow::Week.duration(), Duration::days(7));
    }

    #[test]
    fn test_rank_by_mentions() {
        let mentions = vec![
            mention("GME", 1, MentionSource::Post, 0.6),
            mention("GME", 2, MentionSource::Comment, -0.4),
            mention("GME", 3, MentionSource::Comment, 0.6),
            mention("AMC", 1, MentionSource::Post, -0.5),
            mention("TSLA", 4, MentionSource::Post, 0.2),
            mention("TSLA", 5, MentionSource::Post, 0.0),
        ];

        let ranked = rank_trending(&mentions, TrendingWindow::Day, now(), 10);
        let order: Vec<&str> = ranked.iter().map(|t| t.ticker.as_str()).collect();
        assert_eq!(order, vec!["GME", "TSLA", "AMC"]);

        let gme = &ranked[0];
        assert_eq!(gme.total_mentions, 3);
        assert_eq!(gme.positive_mentions, 2);
        assert_eq!(gme.negative_mentions, 1);
        assert_eq!(gme.sentiment_ratio, Some(2.0));
        assert!((gme.avg_sentiment - 0.2667).abs() < 1e-9);

        let tsla = &ranked[1];
        assert_eq!(tsla.sentiment_ratio, None);
        assert_eq!(tsla.neutral_mentions, 1);
    }

    #[test]
    fn test_ties_are_alphabetical() {
        let mentions = vec![
            mention("ZM", 1, MentionSource::Post, 0.3),
            mention("AAPL", 1, MentionSource::Post, 0.3),
            mention("MSFT", 1, MentionSource::Post, 0.3),
        ];
        let ranked = rank_trending(&mentions, TrendingWindow::Day, now(), 2);
        let order: Vec<&str> = ranked.iter().map(|t| t.ticker.as_str()).collect();
        assert_eq!(order, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_window_cutoff_and_filtered() {
        let mut mentions = vec![
            mention("NVDA", 2, MentionSource::Post, 0.5),
            mention("NVDA", 30, MentionSource::Post, 0.5),
        ];
        mentions.push(TickerMention::new(
            "NVDA",
            now(),
            MentionSource::Comment,
            SentimentResult::filtered(FilterReason::Bot),
        ));

        let day = rank_trending(&mentions, TrendingWindow::Day, now(), 10);
        assert_eq!(day[0].total_mentions, 1);

        let week = rank_trending(&mentions, TrendingWindow::Week, now(), 10);
        assert_eq!(week[0].total_mentions, 2);
    }

    #[test]
    fn test_mentions_from_item() {
        let item = TextItem::new("$pltr PLTR").with_tickers(vec!["pltr".into(), "PLTR".into(), "amd".into()]);
        let extractor = TickerExtractor::new().unwrap();
        let mentions = mentions_from_item(&item, &extractor, now(), MentionSource::Post, &result(0.4, 0.3));
        let tickers: Vec<&str> = mentions.iter().map(|m| m.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AMD", "PLTR"]);
    }

    #[test]
    fn test_mentions_extracted_from_body() {
        let extractor = TickerExtractor::new().unwrap();
        let item = TextItem::new("Loaded up on $NVDA, also buying AMD. THE dip is real");
        let mentions = mentions_from_item(&item, &extractor, now(), MentionSource::Comment, &result(0.4, 0.3));
        let tickers: Vec<&str> = mentions.iter().map(|m| m.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AMD", "NVDA"]);
        assert!(mentions.iter().all(|m| m.source == MentionSource::Comment));

        let chatter = TextItem::new("no tickers in here");
        assert!(mentions_from_item(&chatter, &extractor, now(), MentionSource::Post, &result(0.4, 0.3)).is_empty());
    }

    #[test]
    fn test_daily_summaries() {
        let mentions = vec![
            mention("GME", 1, MentionSource::Post, 0.6),
            mention("GME", 2, MentionSource::Comment, 0.2),
            mention("GME", 30, MentionSource::Comment, -0.6),
            mention("AMC", 1, MentionSource::Comment, -0.3),
        ];
        let rows = daily_summaries(&mentions);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].ticker, "AMC");
        let today = now().date_naive();
        let gme_today = rows
            .iter()
            .find(|r| r.ticker == "GME" && r.date == today)
            .unwrap();
        assert_eq!(gme_today.total_mentions, 2);
        assert_eq!(gme_today.post_mentions, 1);
        assert_eq!(gme_today.comment_mentions, 1);
        assert!((gme_today.avg_sentiment - 0.4).abs() < 1e-9);
        assert_eq!(gme_today.counts.positive, 2);
    }

    #[test]
    fn test_market_summary() {
        let mentions = vec![
            mention("GME", 1, MentionSource::Post, 0.6),
            mention("GME", 2, MentionSource::Post, 0.2),
            mention("AMC", 1, MentionSource::Comment, 0.0),
            mention("AMC", 30, MentionSource::Comment, -0.9),
        ];
        let rows = daily_summaries(&mentions);
        let summary = market_summary(&rows, now().date_naive());

        assert_eq!(summary.total_mentions, 3);
        assert_eq!(summary.total_posts, 2);
        assert_eq!(summary.sentiment_breakdown.positive, 2);
        assert_eq!(summary.sentiment_breakdown.neutral, 1);
        assert!((summary.avg_sentiment - 0.2).abs() < 1e-9);
        assert_eq!(summary.market_mood, MarketMood::Bullish);
    }

    #[test]
    fn test_empty_market_summary() {
        let summary = market_summary(&[], now().date_naive());
        assert_eq!(summary.total_mentions, 0);
        assert_eq!(summary.avg_sentiment, 0.0);
        assert_eq!(summary.market_mood, MarketMood::Neutral);
    }

    #[test]
    fn test_mood_thresholds() {
        assert_eq!(MarketMood::from_score(0.1), MarketMood::Neutral);
        assert_eq!(MarketMood::from_score(0.1001), MarketMood::Bullish);
        assert_eq!(MarketMood::from_score(-0.1001), MarketMood::Bearish);
    }

    #[test]
    fn test_window_serializes_as_period() {
        assert_eq!(serde_json::to_string(&TrendingWindow::Week).unwrap(), "\"7d\"");
    }
}
