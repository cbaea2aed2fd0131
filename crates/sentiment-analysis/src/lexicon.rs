//! Sentiment lexicon
//!
//! VADER's general-purpose lexicon with the finance/forum overlay merged into
//! an owned copy. Nothing global is mutated: each `Lexicon` is built once and
//! shared read-only behind an `Arc`.
//!
//! Multi-word overlay entries are stored hyphen-joined (`to-the-moon`). Before
//! scoring, [`Lexicon::prepare`] rewrites emoji into their descriptions and
//! joins matching phrases in the text, so the analyzer sees one token.

use regex::{Regex, RegexBuilder};
use sentiment_core::SentimentError;
use std::borrow::Cow;
use std::collections::HashMap;
use unicase::UniCase;
use vader_sentiment::{EMOJI_LEXICON, LEXICON};

const FINANCE_LEXICON: &str = include_str!("../data/finance_lexicon.tsv");

/// Term -> valence table in the shape the VADER analyzer borrows.
pub type ValenceMap = HashMap<UniCase<&'static str>, f64>;

/// Immutable term -> valence table
#[derive(Debug, Clone)]
pub struct Lexicon {
    terms: ValenceMap,
    phrases: Vec<&'static str>,
    phrase_matcher: Option<Regex>,
}

impl Lexicon {
    /// VADER's lexicon on its own.
    pub fn base() -> Self {
        Self {
            terms: (*LEXICON).clone(),
            phrases: Vec::new(),
            phrase_matcher: None,
        }
    }

    /// The base lexicon with the bundled finance/forum overlay applied.
    pub fn financial() -> Result<Self, SentimentError> {
        Self::from_tsv(FINANCE_LEXICON)
    }

    /// The base lexicon with a `term<TAB>valence` overlay. Blank lines and `#`
    /// comments are skipped; overlay entries replace base entries.
    pub fn from_tsv(data: &'static str) -> Result<Self, SentimentError> {
        let mut entries = Vec::new();
        for (line_no, line) in data.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let (term, value) = line.split_once('\t').ok_or_else(|| {
                SentimentError::InvalidLexicon(format!("line {}: missing tab separator", line_no + 1))
            })?;
            let valence: f64 = value.trim().parse().map_err(|_| {
                SentimentError::InvalidLexicon(format!(
                    "line {}: `{}` is not a number",
                    line_no + 1,
                    value.trim()
                ))
            })?;
            let term = term.trim();
            if term.is_empty() || term.contains(char::is_whitespace) {
                return Err(SentimentError::InvalidLexicon(format!(
                    "line {}: term must be one hyphen-joined token",
                    line_no + 1
                )));
            }
            entries.push((term, valence));
        }
        Self::base().with_entries(entries)
    }

    /// Add or replace entries. Hyphenated terms also match their
    /// space-separated spelling in text.
    pub fn with_entries<I>(mut self, entries: I) -> Result<Self, SentimentError>
    where
        I: IntoIterator<Item = (&'static str, f64)>,
    {
        for (term, valence) in entries {
            self.terms.insert(UniCase::new(term), valence);
            if term.contains('-') && !self.phrases.iter().any(|p| p.eq_ignore_ascii_case(term)) {
                self.phrases.push(term);
            }
        }
        self.phrase_matcher = phrase_matcher(&mut self.phrases)?;
        Ok(self)
    }

    /// The merged table, for handing to the analyzer.
    pub fn valences(&self) -> &ValenceMap {
        &self.terms
    }

    pub fn get(&self, term: &str) -> Option<f64> {
        lookup(&self.terms, term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.get(term).is_some()
    }

    /// Emoji replaced by their descriptions, then overlay phrases joined
    /// into their hyphenated lexicon tokens ("Diamond  hands" -> "Diamond-hands").
    pub fn prepare<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let described = describe_emoji(text);
        let Some(matcher) = &self.phrase_matcher else {
            return described;
        };
        if !matcher.is_match(&described) {
            return described;
        }
        let joined = matcher.replace_all(&described, |caps: &regex::Captures| {
            caps[0]
                .split(|c: char| c.is_whitespace() || c == '-')
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
                .join("-")
        });
        Cow::Owned(joined.into_owned())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Multi-word entries, longest first.
    pub fn phrases(&self) -> &[&'static str] {
        &self.phrases
    }
}

fn lookup<'a>(terms: &'a HashMap<UniCase<&'a str>, f64>, term: &'a str) -> Option<f64> {
    terms.get(&UniCase::new(term)).copied()
}

/// Case-insensitive alternation over every phrase, longest first so the
/// most specific match wins.
fn phrase_matcher(phrases: &mut [&'static str]) -> Result<Option<Regex>, SentimentError> {
    if phrases.is_empty() {
        return Ok(None);
    }
    phrases.sort_by(|a, b| {
        let words = |p: &str| p.split('-').count();
        words(*b).cmp(&words(*a)).then(b.len().cmp(&a.len())).then(a.cmp(b))
    });
    let alternatives: Vec<String> = phrases
        .iter()
        .map(|phrase| {
            phrase
                .split('-')
                .filter(|w| !w.is_empty())
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"[\s\-]+")
        })
        .collect();
    let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|e| SentimentError::InvalidPattern(e.to_string()))
}

/// Swap each emoji for its space-padded description, the same table the
/// analyzer would use, so descriptions can take part in phrase matching.
fn describe_emoji(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    let mut buf = [0u8; 4];
    let mut out = String::with_capacity(text.len() + 16);
    let mut replaced = false;
    for c in text.chars() {
        let key: &str = c.encode_utf8(&mut buf);
        match EMOJI_LEXICON.get(key) {
            Some(description) => {
                out.push(' ');
                out.push_str(description);
                out.push(' ');
                replaced = true;
            }
            None => out.push(c),
        }
    }
    if replaced {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_lexicon_loads() {
        let lexicon = Lexicon::financial().unwrap();
        assert!(lexicon.len() > 7000);
        assert_eq!(lexicon.get("bullish"), Some(2.5));
        assert_eq!(lexicon.get("crash"), Some(-3.0));
        assert_eq!(lexicon.get("hold"), Some(0.0));
        assert_eq!(lexicon.get("Liar"), Some(-2.3));
        assert!(lexicon.get("tsla").is_none());
    }

    #[test]
    fn test_overlay_replaces_base_entry() {
        assert_eq!(Lexicon::base().get("crash"), Some(-1.7));
        let lexicon = Lexicon::from_tsv("crash\t-0.4\n").unwrap();
        assert_eq!(lexicon.get("crash"), Some(-0.4));
        let lexicon = lexicon.with_entries([("crash", -3.5)]).unwrap();
        assert_eq!(lexicon.get("crash"), Some(-3.5));
    }

    #[test]
    fn test_base_is_not_mutated_by_overlay() {
        let _ = Lexicon::financial().unwrap();
        assert_eq!(LEXICON.get(&UniCase::new("crash")).copied(), Some(-1.7));
        assert!(Lexicon::base().get("tendies").is_none());
    }

    #[test]
    fn test_emoji_are_described() {
        assert_eq!(describe_emoji("tendies🚀"), "tendies rocket ");
        assert_eq!(describe_emoji("📉📉"), " chart decreasing  chart decreasing ");
        assert!(matches!(describe_emoji("plain text"), Cow::Borrowed(_)));
        assert!(matches!(describe_emoji("déjà vu"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_phrases_are_joined() {
        let lexicon = Lexicon::financial().unwrap();
        assert_eq!(lexicon.prepare("GME to the moon"), "GME to-the-moon");
        assert_eq!(lexicon.prepare("real Diamond  Hands here"), "real Diamond-Hands here");
        assert_eq!(lexicon.prepare("classic rug-pull."), "classic rug-pull.");
        assert!(lexicon.prepare("💎🙌").contains("gem-stone-raising-hands"));
        assert_eq!(lexicon.prepare("moonshot"), "moonshot");
        assert_eq!(lexicon.get("to-the-moon"), Some(3.0));
    }

    #[test]
    fn test_longest_phrase_first() {
        let lexicon = Lexicon::financial().unwrap();
        let phrases = lexicon.phrases();
        assert_eq!(phrases[0], "gem-stone-raising-hands");
        assert!(phrases.contains(&"rug-pull"));
    }

    #[test]
    fn test_malformed_tsv() {
        let err = Lexicon::from_tsv("moon 3.0\n").unwrap_err();
        assert!(matches!(err, SentimentError::InvalidLexicon(_)));

        let err = Lexicon::from_tsv("# header\nmoon\thigh\n").unwrap_err();
        match err {
            SentimentError::InvalidLexicon(msg) => assert!(msg.starts_with("line 2")),
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(Lexicon::from_tsv("to the moon\t3.0\n").is_err());
    }
}
