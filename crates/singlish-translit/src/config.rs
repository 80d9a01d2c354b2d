// Engine options: defaults, TOML loading, validation.

use serde::Deserialize;
use singlish_fst::MAX_SEARCH_ITERATIONS;

/// Tunable engine parameters.
///
/// Every field has a default, so a TOML document only needs the keys it
/// overrides:
///
/// ```toml
/// similarity_floor = 0.7
/// nbest = 3
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Minimum similarity for a fuzzy correction to be applied.
    pub similarity_floor: f64,
    /// Words shorter than this (in characters) are never corrected.
    pub min_correction_len: usize,
    /// Candidate patterns must be within this many characters of the word.
    pub length_window: usize,
    /// Maximum suggestions reported per OOV word.
    pub oov_suggestions: usize,
    /// Maximum edit distance of an OOV suggestion.
    pub oov_max_distance: usize,
    /// Longest prefix (in characters) the alignment scan tries.
    pub alignment_lookahead: usize,
    /// Default number of hypotheses for n-best queries.
    pub nbest: usize,
    /// Queue pops allowed per n-best search.
    pub search_iteration_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            similarity_floor: 0.65,
            min_correction_len: 3,
            length_window: 2,
            oov_suggestions: 3,
            oov_max_distance: 2,
            alignment_lookahead: 20,
            nbest: 5,
            search_iteration_limit: MAX_SEARCH_ITERATIONS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("similarity_floor must lie in [0, 1], got {0}")]
    SimilarityFloor(f64),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl EngineOptions {
    /// Parse options from TOML and validate them.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let options: Self =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_floor) {
            return Err(ConfigError::SimilarityFloor(self.similarity_floor));
        }
        let non_zero = [
            ("alignment_lookahead", self.alignment_lookahead),
            ("nbest", self.nbest),
            ("search_iteration_limit", self.search_iteration_limit),
        ];
        for (name, value) in non_zero {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }
        Ok(())
    }
}
