// Ranked transliteration hypotheses and confidence scoring.

use serde::Serialize;

/// One distinct output produced by path search over a lattice.
///
/// `cost` is the total path weight (one unit per applied rule).
/// `confidence` is filled in by [`normalize_confidences`] and is relative to
/// the other hypotheses in the same list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hypothesis {
    pub output: String,
    pub cost: f64,
    pub confidence: f64,
}

impl Hypothesis {
    /// Create a hypothesis with its raw (unnormalized) confidence.
    pub fn new(output: impl Into<String>, cost: f64) -> Self {
        Self {
            output: output.into(),
            cost,
            confidence: raw_confidence(cost),
        }
    }
}

/// Unnormalized confidence for a path cost: `1 / (1 + cost)`.
pub fn raw_confidence(cost: f64) -> f64 {
    1.0 / (1.0 + cost.max(0.0))
}

/// Rescale confidences so the best hypothesis reports exactly 1.0.
///
/// Every score is divided by the maximum score in the list. An empty list is
/// left untouched.
pub fn normalize_confidences(hypotheses: &mut [Hypothesis]) {
    let max = hypotheses
        .iter()
        .map(|h| raw_confidence(h.cost))
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return;
    }
    for h in hypotheses.iter_mut() {
        h.confidence = raw_confidence(h.cost) / max;
    }
}
