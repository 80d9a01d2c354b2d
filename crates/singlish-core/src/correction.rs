// Fuzzy spelling correction results.

use serde::Serialize;

/// One applied token correction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correction {
    pub original: String,
    pub corrected: String,
    /// Similarity score of the replacement, in `[0, 1]`.
    pub confidence: f64,
}

/// Output of a correction pass over whitespace-delimited text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionResult {
    /// The text with corrections applied, tokens joined by single spaces.
    pub corrected_text: String,
    pub corrections: Vec<Correction>,
}

impl CorrectionResult {
    /// Whether any token was changed.
    pub fn is_changed(&self) -> bool {
        !self.corrections.is_empty()
    }
}
