// Out-of-vocabulary detection: per-token coverage analysis.

use singlish_core::OovReport;
use singlish_core::character::count_non_space;
use singlish_core::oov::coverage_ratio;
use tracing::debug;

use crate::config::EngineOptions;
use crate::engine::TransductionEngine;
use crate::fuzzy::FuzzyCorrector;
use crate::rules::RuleTable;

/// Coverage analysis over borrowed engine components.
///
/// Cheap to construct; the handle builds one per call.
pub struct OovDetector<'a> {
    engine: &'a TransductionEngine,
    table: &'a RuleTable,
    corrector: &'a FuzzyCorrector,
    max_suggestions: usize,
    max_distance: usize,
}

impl<'a> OovDetector<'a> {
    pub fn new(
        engine: &'a TransductionEngine,
        table: &'a RuleTable,
        corrector: &'a FuzzyCorrector,
        options: &EngineOptions,
    ) -> Self {
        Self {
            engine,
            table,
            corrector,
            max_suggestions: options.oov_suggestions,
            max_distance: options.oov_max_distance,
        }
    }

    /// Analyse `text` token by token.
    ///
    /// A token is covered when it transliterates on its own. Characters of
    /// uncovered tokens that are not themselves a pattern are collected in
    /// `oov_chars`; uncovered tokens with nearby patterns get suggestions.
    pub fn detect(&self, text: &str) -> OovReport {
        let total_chars = count_non_space(text);
        let mut report = OovReport::empty();
        let mut covered_chars = 0;
        let mut buf = [0u8; 4];

        for token in text.split_whitespace() {
            report.total_words += 1;
            if self.engine.accepts(token) {
                report.transliterable_words += 1;
                covered_chars += token.chars().count();
                continue;
            }

            for c in token.chars() {
                if !self.table.contains_pattern(c.encode_utf8(&mut buf)) {
                    report.oov_chars.insert(c);
                }
            }
            if !report.suggestions.contains_key(token) {
                let similar =
                    self.corrector
                        .suggestions(token, self.max_distance, self.max_suggestions);
                if !similar.is_empty() {
                    report.suggestions.insert(token.to_string(), similar);
                }
            }
            report.oov_words.push(token.to_string());
        }

        report.has_oov = !report.oov_words.is_empty();
        report.coverage = coverage_ratio(covered_chars, total_chars);
        debug!(
            words = report.total_words,
            oov = report.oov_words.len(),
            coverage = report.coverage,
            "oov analysis"
        );
        report
    }
}
