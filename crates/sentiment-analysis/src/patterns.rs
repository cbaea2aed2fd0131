//! Compiled pattern sets for filtering and context detection.
//!
//! Bot signatures match anywhere in the text, meta-thread signatures only in
//! the leading prefix the caller hands in. All sets are case-insensitive.

use regex::{Regex, RegexSet, RegexSetBuilder};
use sentiment_core::SentimentError;

/// Automated accounts, moderator bots and stat-dump replies
pub const BOT_PATTERNS: &[&str] = &[
    r"\*\*User Report\*\*",
    r"Total Submissions.*First Seen In WSB",
    r"\[AutoModerator\]",
    r"I am a bot",
    r"This is an automated",
    r"beep boop",
    r"Join WSB Discord",
];

/// Recurring scheduled threads
pub const META_PATTERNS: &[&str] = &[
    r"^Rate My Portfolio",
    r"^Daily Discussion",
    r"^Weekend Discussion",
    r"^What Are Your Moves",
    r"Options Questions Safe Haven",
    r"Please use this thread",
    r"This thread is for",
];

/// Explicit sarcasm markers and stock sarcastic phrases
pub const SARCASM_PATTERNS: &[&str] = &[
    r"/s\b",
    r"\bkek\b",
    r"\blmao\b",
    r"\blmfao\b",
    r"🤡",
    r"🤣",
    r"😂",
    r"\bsure buddy\b",
    r"\btotally\b",
    r"\bdefinitely not\b",
    r"\byeah right\b",
];

/// Negation cue followed by whitespace. Contractions match on the "n't" tail.
pub const NEGATION_CUE: &str =
    r"(?i)(?:\bnot|\bno|\bnever|\bneither|\bnor|\bhardly|\bbarely|\bcannot|n['’]t)\s+";

/// Strong words whose sentiment a nearby negation partially reverses
pub const REVERSAL_WORDS: &[&str] = &["bullish", "bearish", "good", "bad", "great", "terrible"];

/// Praise that reads as sarcasm next to a loss
pub const POSITIVE_ADJECTIVES: &[&str] = &["great", "amazing", "awesome", "fantastic", "brilliant"];

/// Words that put a text in a losing context
pub const BEARISH_CONTEXT: &[&str] = &["loss", "crash", "down", "red", "dump"];

#[derive(Debug, Clone)]
pub struct PatternStore {
    bot: RegexSet,
    meta: RegexSet,
    sarcasm: RegexSet,
    negation_cue: Regex,
}

impl PatternStore {
    /// Compile the built-in pattern sets.
    pub fn new() -> Result<Self, SentimentError> {
        Self::from_sets(BOT_PATTERNS, META_PATTERNS, SARCASM_PATTERNS)
    }

    /// Compile caller-supplied pattern sets.
    pub fn from_sets<S: AsRef<str>>(
        bot: &[S],
        meta: &[S],
        sarcasm: &[S],
    ) -> Result<Self, SentimentError> {
        let negation_cue = Regex::new(NEGATION_CUE)
            .map_err(|e| SentimentError::InvalidPattern(format!("negation cue: {e}")))?;

        Ok(Self {
            bot: compile_set("bot", bot)?,
            meta: compile_set("meta", meta)?,
            sarcasm: compile_set("sarcasm", sarcasm)?,
            negation_cue,
        })
    }

    /// Any bot signature, anywhere in the text.
    pub fn is_bot(&self, text: &str) -> bool {
        self.bot.is_match(text)
    }

    /// Any meta-thread signature. Callers pass only the leading prefix.
    pub fn is_meta(&self, prefix: &str) -> bool {
        self.meta.is_match(prefix)
    }

    /// Number of distinct sarcasm indicators present.
    pub fn sarcasm_hits(&self, text: &str) -> usize {
        self.sarcasm.matches(text).iter().count()
    }

    /// Byte offsets just past each negation cue (and its trailing whitespace).
    pub fn negation_cue_ends(&self, text: &str) -> Vec<usize> {
        self.negation_cue.find_iter(text).map(|m| m.end()).collect()
    }
}

fn compile_set<S: AsRef<str>>(name: &str, patterns: &[S]) -> Result<RegexSet, SentimentError> {
    RegexSetBuilder::new(patterns.iter().map(|p| p.as_ref()))
        .case_insensitive(true)
        .build()
        .map_err(|e| SentimentError::InvalidPattern(format!("{name} set: {e}")))
}
