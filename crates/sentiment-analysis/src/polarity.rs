//! Statistical polarity/subjectivity estimator.
//!
//! Averages the polarity and subjectivity of every assessed word, after
//! scaling by a preceding intensifier and flipping (at half strength) words
//! directly after a negation. Independent of the compound lexicon.

use sentiment_core::{PolarityEstimate, PolarityEstimator, SentimentError};
use std::collections::HashMap;
use std::sync::Arc;

const SUBJECTIVITY_LEXICON: &str = include_str!("../data/subjectivity.tsv");

/// Polarity multiplier for a negated word
const NEGATION_FACTOR: f64 = -0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordEntry {
    pub polarity: f64,
    pub subjectivity: f64,
    /// 1.0 for ordinary words; anything else marks an intensifier
    pub intensity: f64,
}

impl WordEntry {
    pub fn is_modifier(&self) -> bool {
        (self.intensity - 1.0).abs() > f64::EPSILON
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubjectivityLexicon {
    words: HashMap<String, WordEntry>,
}

impl SubjectivityLexicon {
    /// The bundled English subjectivity lexicon.
    pub fn bundled() -> Result<Self, SentimentError> {
        Self::from_tsv(SUBJECTIVITY_LEXICON)
    }

    /// Parse `term<TAB>polarity<TAB>subjectivity<TAB>intensity` lines.
    pub fn from_tsv(data: &str) -> Result<Self, SentimentError> {
        let mut words = HashMap::new();
        for (line_no, line) in data.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let [term, polarity, subjectivity, intensity] = fields[..] else {
                return Err(SentimentError::InvalidLexicon(format!(
                    "line {}: expected 4 fields, got {}",
                    line_no + 1,
                    fields.len()
                )));
            };
            let parse = |field: &str| -> Result<f64, SentimentError> {
                field.parse().map_err(|_| {
                    SentimentError::InvalidLexicon(format!("line {}: `{}` is not a number", line_no + 1, field))
                })
            };
            words.insert(
                term.to_lowercase(),
                WordEntry {
                    polarity: parse(polarity)?,
                    subjectivity: parse(subjectivity)?,
                    intensity: parse(intensity)?,
                },
            );
        }
        Ok(Self { words })
    }

    pub fn get(&self, word: &str) -> Option<&WordEntry> {
        self.words.get(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Word-level estimator over a subjectivity lexicon.
pub struct PatternPolarityEstimator {
    lexicon: Arc<SubjectivityLexicon>,
    max_chars: usize,
}

impl PatternPolarityEstimator {
    pub fn new(lexicon: Arc<SubjectivityLexicon>, max_chars: usize) -> Self {
        Self { lexicon, max_chars }
    }

    fn words(text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase().replace('’', "'"))
            .collect()
    }

    fn is_negation(word: &str) -> bool {
        matches!(word, "not" | "no" | "never") || word.ends_with("n't")
    }
}

impl PolarityEstimator for PatternPolarityEstimator {
    fn name(&self) -> &'static str {
        "pattern-polarity"
    }

    fn estimate(&self, text: &str) -> Result<PolarityEstimate, SentimentError> {
        if text.contains('\0') {
            return Err(SentimentError::Estimator("text contains NUL bytes".to_string()));
        }
        let length = text.chars().count();
        if length > self.max_chars {
            return Err(SentimentError::Estimator(format!(
                "text of {} chars exceeds limit of {}",
                length, self.max_chars
            )));
        }

        let words = Self::words(text);
        let mut assessments: Vec<(f64, f64)> = Vec::new();
        let mut intensity = 1.0;

        for (i, word) in words.iter().enumerate() {
            let Some(entry) = self.lexicon.get(word) else {
                intensity = 1.0;
                continue;
            };
            if entry.is_modifier() {
                intensity *= entry.intensity;
                continue;
            }

            let mut polarity = entry.polarity * intensity;
            let subjectivity = (entry.subjectivity * intensity).min(1.0);

            let previous_is_modifier = i >= 1
                && self.lexicon.get(&words[i - 1]).is_some_and(WordEntry::is_modifier);
            let negated = (i >= 1 && Self::is_negation(&words[i - 1]))
                || (i >= 2 && previous_is_modifier && Self::is_negation(&words[i - 2]));
            if negated {
                polarity *= NEGATION_FACTOR;
            }

            assessments.push((polarity, subjectivity));
            intensity = 1.0;
        }

        if assessments.is_empty() {
            return Ok(PolarityEstimate::NONE);
        }

        let n = assessments.len() as f64;
        let polarity = assessments.iter().map(|(p, _)| p).sum::<f64>() / n;
        let subjectivity = assessments.iter().map(|(_, s)| s).sum::<f64>() / n;

        Ok(PolarityEstimate {
            polarity: polarity.clamp(-1.0, 1.0),
            subjectivity: subjectivity.clamp(0.0, 1.0),
        })
    }
}
