// Nearest-pattern spelling correction over the rule vocabulary.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use singlish_core::{Correction, CorrectionResult};
use tracing::{debug, trace};

use super::distance::levenshtein_chars;
use crate::config::EngineOptions;
use crate::rules::RuleTable;

/// A vocabulary entry close to a queried word.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub word: String,
    /// `1 - distance / max_len`, in `[0, 1]`.
    pub score: f64,
    pub distance: usize,
}

/// Vocabulary entries grouped by character length.
struct LengthIndex {
    by_len: BTreeMap<usize, Vec<(usize, Vec<char>)>>,
}

impl LengthIndex {
    fn build(vocabulary: &[String]) -> Self {
        let mut by_len: BTreeMap<usize, Vec<(usize, Vec<char>)>> = BTreeMap::new();
        for (i, word) in vocabulary.iter().enumerate() {
            let chars: Vec<char> = word.chars().collect();
            by_len.entry(chars.len()).or_default().push((i, chars));
        }
        Self { by_len }
    }

    /// Entries whose length lies within `window` of `len`.
    fn window(&self, len: usize, window: usize) -> impl Iterator<Item = &(usize, Vec<char>)> {
        self.by_len
            .range(len.saturating_sub(window)..=len + window)
            .flat_map(|(_, entries)| entries.iter())
    }

    fn all(&self) -> impl Iterator<Item = &(usize, Vec<char>)> {
        self.by_len.values().flat_map(|entries| entries.iter())
    }
}

/// Levenshtein nearest-neighbour matcher over rule patterns.
///
/// The length index is built on first use and shared afterwards; concurrent
/// first calls build it exactly once.
pub struct FuzzyCorrector {
    /// Sorted, deduplicated, no whitespace-only entries.
    vocabulary: Vec<String>,
    index: OnceLock<LengthIndex>,
    similarity_floor: f64,
    min_word_len: usize,
    length_window: usize,
}

impl std::fmt::Debug for FuzzyCorrector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyCorrector")
            .field("vocabulary", &self.vocabulary.len())
            .field("indexed", &self.index.get().is_some())
            .field("similarity_floor", &self.similarity_floor)
            .field("min_word_len", &self.min_word_len)
            .field("length_window", &self.length_window)
            .finish()
    }
}

/// Better match first: higher score, then smaller distance, then
/// lexicographically smaller word.
fn rank(a: &FuzzyMatch, b: &FuzzyMatch) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.distance.cmp(&b.distance))
        .then_with(|| a.word.cmp(&b.word))
}

impl FuzzyCorrector {
    /// Build a corrector with default options.
    pub fn new<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary: Vec<String> = vocabulary
            .into_iter()
            .map(Into::into)
            .filter(|w| !w.trim().is_empty())
            .collect();
        vocabulary.sort();
        vocabulary.dedup();
        let defaults = EngineOptions::default();
        Self {
            vocabulary,
            index: OnceLock::new(),
            similarity_floor: defaults.similarity_floor,
            min_word_len: defaults.min_correction_len,
            length_window: defaults.length_window,
        }
    }

    /// Corrector over the patterns of `table`.
    pub fn from_table(table: &RuleTable, options: &EngineOptions) -> Self {
        Self::new(table.patterns()).with_options(options)
    }

    pub fn with_options(mut self, options: &EngineOptions) -> Self {
        self.similarity_floor = options.similarity_floor;
        self.min_word_len = options.min_correction_len;
        self.length_window = options.length_window;
        self
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    fn index(&self) -> &LengthIndex {
        self.index.get_or_init(|| {
            debug!(words = self.vocabulary.len(), "building fuzzy vocabulary index");
            LengthIndex::build(&self.vocabulary)
        })
    }

    /// Distance and similarity of `word` to each candidate.
    fn scored<'a>(
        &'a self,
        word: &'a [char],
        candidates: impl Iterator<Item = &'a (usize, Vec<char>)> + 'a,
    ) -> impl Iterator<Item = FuzzyMatch> + 'a {
        candidates.map(move |(i, chars)| {
            let distance = levenshtein_chars(word, chars);
            let max_len = word.len().max(chars.len()).max(1);
            FuzzyMatch {
                word: self.vocabulary[*i].clone(),
                score: 1.0 - distance as f64 / max_len as f64,
                distance,
            }
        })
    }

    /// Closest vocabulary entry to `word` that clears the similarity floor.
    ///
    /// Words shorter than the minimum length are never matched. Candidates
    /// come from entries within the length window, or from the whole
    /// vocabulary when the window is empty.
    pub fn nearest(&self, word: &str) -> Option<FuzzyMatch> {
        let chars: Vec<char> = word.chars().collect();
        if chars.len() < self.min_word_len {
            return None;
        }
        let index = self.index();
        let in_window = index.window(chars.len(), self.length_window).next().is_some();
        let best = if in_window {
            self.scored(&chars, index.window(chars.len(), self.length_window))
                .filter(|m| m.score >= self.similarity_floor)
                .min_by(rank)
        } else {
            self.scored(&chars, index.all())
                .filter(|m| m.score >= self.similarity_floor)
                .min_by(rank)
        };
        trace!(word, found = ?best.as_ref().map(|m| &m.word), "nearest pattern");
        best
    }

    /// Up to `limit` entries within the length window and at most
    /// `max_distance` edits of `word`, closest first.
    ///
    /// There is no whole-vocabulary fallback and no minimum word length.
    pub fn suggestions(&self, word: &str, max_distance: usize, limit: usize) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        let mut matches: Vec<FuzzyMatch> = self
            .scored(&chars, self.index().window(chars.len(), self.length_window))
            .filter(|m| m.distance <= max_distance)
            .collect();
        matches.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.word.cmp(&b.word)));
        matches.into_iter().take(limit).map(|m| m.word).collect()
    }

    /// Correction for a single token, if one applies.
    pub fn correct_word(&self, word: &str) -> Option<Correction> {
        let m = self.nearest(word)?;
        (m.word != word).then(|| Correction {
            original: word.to_string(),
            corrected: m.word,
            confidence: m.score,
        })
    }

    /// Correct each whitespace-delimited token of `text`.
    ///
    /// The result joins tokens with single spaces.
    pub fn correct(&self, text: &str) -> CorrectionResult {
        let mut corrections = Vec::new();
        let words: Vec<String> = text
            .split_whitespace()
            .map(|token| match self.correct_word(token) {
                Some(c) => {
                    let corrected = c.corrected.clone();
                    corrections.push(c);
                    corrected
                }
                None => token.to_string(),
            })
            .collect();
        if !corrections.is_empty() {
            debug!(corrections = corrections.len(), "applied spelling corrections");
        }
        CorrectionResult {
            corrected_text: words.join(" "),
            corrections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrector() -> FuzzyCorrector {
        FuzzyCorrector::new([
            "mama", "gedara", "yanawa", "kiyawanawa", "bath", "iskole", "bonawa", " ", "ma",
        ])
    }

    #[test]
    fn corrects_missing_letter() {
        let result = corrector().correct("mama gedra yanawa");
        assert_eq!(result.corrected_text, "mama gedara yanawa");
        assert_eq!(result.corrections.len(), 1);
        let c = &result.corrections[0];
        assert_eq!(c.original, "gedra");
        assert_eq!(c.corrected, "gedara");
        assert!(c.confidence >= 0.65);
    }

    #[test]
    fn short_words_are_left_alone() {
        assert_eq!(corrector().nearest("mo"), None);
        let result = corrector().correct("mo");
        assert!(!result.is_changed());
        assert_eq!(result.corrected_text, "mo");
    }

    #[test]
    fn known_word_is_not_a_correction() {
        let m = corrector().nearest("bath").unwrap();
        assert_eq!(m.word, "bath");
        assert_eq!(m.score, 1.0);
        assert!(corrector().correct_word("bath").is_none());
    }

    #[test]
    fn below_floor_is_a_miss() {
        assert_eq!(corrector().nearest("zzzzzz"), None);
    }

    #[test]
    fn whitespace_is_normalized() {
        let result = corrector().correct("  mama   yanawa ");
        assert_eq!(result.corrected_text, "mama yanawa");
    }

    #[test]
    fn ties_break_lexicographically() {
        let c = FuzzyCorrector::new(["abcx", "abcy"]);
        // Both are one substitution away from "abcz".
        assert_eq!(c.nearest("abcz").unwrap().word, "abcx");
    }

    #[test]
    fn falls_back_to_whole_vocabulary() {
        let c = FuzzyCorrector::new(["abcdefghij"]).with_options(&EngineOptions {
            similarity_floor: 0.0,
            ..EngineOptions::default()
        });
        // No entry of length 1..=5, so the whole vocabulary is searched.
        assert_eq!(c.nearest("abc").unwrap().word, "abcdefghij");
    }

    #[test]
    fn suggestions_are_bounded_and_sorted() {
        let c = FuzzyCorrector::new(["bat", "bath", "both", "bathe", "cat"]);
        assert_eq!(c.suggestions("baht", 2, 3), vec!["bat", "bath", "bathe"]);
        assert!(c.suggestions("qqqqqq", 2, 3).is_empty());
    }

    #[test]
    fn whitespace_patterns_are_not_vocabulary() {
        assert!(!corrector().vocabulary().iter().any(|w| w == " "));
    }
}
