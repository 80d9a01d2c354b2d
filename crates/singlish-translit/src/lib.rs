//! Singlish to Sinhala transliteration engine.
//!
//! A [`RuleTable`](rules::RuleTable) loaded from a JSON rule source is
//! compiled once into a weighted transducer. The
//! [`TransductionEngine`](engine::TransductionEngine) answers best and
//! n-best queries against it; the OOV detector, fuzzy corrector and
//! alignment extractor are read-only analyses over the same table and
//! automaton. [`TranslitHandle`](handle::TranslitHandle) owns all of them
//! and exposes the caller-facing API.
//!
//! # Modules
//!
//! - [`rules`] -- Rule source parsing and the validated rule table
//! - [`engine`] -- Composition-based best and n-best transduction
//! - [`oov`] -- Per-token coverage analysis
//! - [`fuzzy`] -- Levenshtein nearest-neighbour spelling correction
//! - [`alignment`] -- Greedy longest-match segment alignment
//! - [`analysis`] -- Rule conflict, ambiguity and usage diagnostics
//! - [`preprocess`] -- Text normalization and punctuation restoration
//! - [`config`] -- Engine options
//! - [`handle`] -- Top-level handle

pub mod alignment;
pub mod analysis;
pub mod config;
pub mod engine;
pub mod fuzzy;
pub mod handle;
pub mod oov;
pub mod preprocess;
pub mod rules;

pub use config::EngineOptions;
pub use engine::TransductionEngine;
pub use handle::{EngineError, TranslitHandle};
pub use rules::RuleTable;

/// Per-call failure: the input has no decomposition into rule patterns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "cannot transliterate {input:?}{}: add a covering rule to the rule source or enable OOV handling",
    .unknown_char.map(|c| format!(" (no rule contains {c:?})")).unwrap_or_default()
)]
pub struct TransductionFailure {
    /// The text that could not be decomposed.
    pub input: String,
    /// The first character of `input` that appears in no rule at all, if any.
    pub unknown_char: Option<char>,
}

impl TransductionFailure {
    pub fn new(input: impl Into<String>, unknown_char: Option<char>) -> Self {
        Self {
            input: input.into(),
            unknown_char,
        }
    }
}
