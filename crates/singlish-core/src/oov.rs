// Out-of-vocabulary coverage report.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Per-query coverage analysis of an input text.
///
/// `coverage` is the share of non-space characters that belong to tokens the
/// engine could transliterate. It always lies in `[0, 1]`; input without any
/// non-space characters is vacuously fully covered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OovReport {
    pub has_oov: bool,
    pub coverage: f64,
    /// Tokens with no decomposition into rules, in input order.
    pub oov_words: Vec<String>,
    /// Characters of OOV tokens that no rule pattern contains as a whole.
    pub oov_chars: BTreeSet<char>,
    /// Up to a few known patterns close to each OOV token.
    pub suggestions: BTreeMap<String, Vec<String>>,
    pub total_words: usize,
    pub transliterable_words: usize,
}

impl OovReport {
    /// Report for input that contains no tokens at all.
    pub fn empty() -> Self {
        Self {
            has_oov: false,
            coverage: 1.0,
            oov_words: Vec::new(),
            oov_chars: BTreeSet::new(),
            suggestions: BTreeMap::new(),
            total_words: 0,
            transliterable_words: 0,
        }
    }
}

/// Coverage ratio clamped to `[0, 1]`; `1.0` when `total` is zero.
pub fn coverage_ratio(covered: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (covered as f64 / total as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacuous_coverage() {
        assert_eq!(coverage_ratio(0, 0), 1.0);
    }

    #[test]
    fn partial_coverage() {
        assert!((coverage_ratio(10, 13) - 10.0 / 13.0).abs() < 1e-12);
    }

    #[test]
    fn empty_report_has_no_oov() {
        let r = OovReport::empty();
        assert!(!r.has_oov);
        assert_eq!(r.coverage, 1.0);
    }

    #[test]
    fn report_serializes_chars_in_order() {
        let mut r = OovReport::empty();
        r.oov_chars.insert('z');
        r.oov_chars.insert('x');
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["oov_chars"], serde_json::json!(["x", "z"]));
    }
}
