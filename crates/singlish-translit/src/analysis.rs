// Rule table diagnostics: prefix conflicts, per-word ambiguity, rule usage.

use std::collections::BTreeMap;

use serde::Serialize;
use singlish_core::{Hypothesis, Rule};

use crate::TransductionFailure;
use crate::alignment::align;
use crate::engine::TransductionEngine;
use crate::rules::{RuleTable, SPACE};

/// A pattern together with every other pattern that is a strict prefix of
/// it, longest first. The pattern itself leads the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleConflict {
    pub pattern: String,
    pub competitors: Vec<Rule>,
}

/// Patterns that compete with their own prefixes, in table priority order.
pub fn rule_conflicts(table: &RuleTable) -> Vec<RuleConflict> {
    let mut conflicts = Vec::new();
    for rule in table.rules() {
        if rule.pattern == SPACE {
            continue;
        }
        let mut competitors: Vec<Rule> = rule
            .pattern
            .char_indices()
            .skip(1)
            .filter_map(|(end, _)| {
                let prefix = &rule.pattern[..end];
                table.get(prefix).map(|out| Rule::new(prefix, out))
            })
            .collect();
        if competitors.is_empty() {
            continue;
        }
        competitors.reverse();
        competitors.insert(0, rule.clone());
        conflicts.push(RuleConflict {
            pattern: rule.pattern.clone(),
            competitors,
        });
    }
    conflicts
}

/// Shannon entropy (bits) of scores normalised to a distribution.
///
/// Fewer than two positive scores carry no uncertainty and yield 0.
pub fn entropy(scores: &[f64]) -> f64 {
    let positive: Vec<f64> = scores.iter().copied().filter(|&s| s > 0.0).collect();
    if positive.len() < 2 {
        return 0.0;
    }
    let total: f64 = positive.iter().sum();
    positive
        .iter()
        .map(|&s| {
            let p = s / total;
            -p * p.log2()
        })
        .sum()
}

/// Ranked alternatives for one word and how spread out they are.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordAmbiguity {
    pub word: String,
    pub is_ambiguous: bool,
    pub hypotheses: Vec<Hypothesis>,
    /// Entropy of the normalised confidences, in bits.
    pub entropy: f64,
}

pub fn word_ambiguity(
    engine: &TransductionEngine,
    word: &str,
    n: usize,
) -> Result<WordAmbiguity, TransductionFailure> {
    let hypotheses = engine.transduce(word, n.max(2))?;
    let scores: Vec<f64> = hypotheses.iter().map(|h| h.confidence).collect();
    Ok(WordAmbiguity {
        word: word.to_string(),
        is_ambiguous: hypotheses.len() > 1,
        entropy: entropy(&scores),
        hypotheses,
    })
}

/// Ambiguity summary over many lines of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusAmbiguity {
    pub total_words: usize,
    pub ambiguous_words: usize,
    /// Words with no decomposition at all.
    pub failed_words: usize,
    pub ambiguity_rate: f64,
    /// Ambiguous words with the highest entropy, highest first.
    pub most_ambiguous: Vec<WordAmbiguity>,
}

pub fn corpus_ambiguity<'a>(
    engine: &TransductionEngine,
    lines: impl IntoIterator<Item = &'a str>,
    n: usize,
    top: usize,
) -> CorpusAmbiguity {
    let mut total_words = 0;
    let mut failed_words = 0;
    let mut ambiguous = Vec::new();
    for word in lines.into_iter().flat_map(str::split_whitespace) {
        total_words += 1;
        match word_ambiguity(engine, word, n) {
            Ok(a) if a.is_ambiguous => ambiguous.push(a),
            Ok(_) => {}
            Err(_) => failed_words += 1,
        }
    }
    let ambiguous_words = ambiguous.len();
    ambiguous.sort_by(|a, b| b.entropy.total_cmp(&a.entropy).then_with(|| a.word.cmp(&b.word)));
    ambiguous.truncate(top);
    CorpusAmbiguity {
        total_words,
        ambiguous_words,
        failed_words,
        ambiguity_rate: if total_words == 0 {
            0.0
        } else {
            ambiguous_words as f64 / total_words as f64
        },
        most_ambiguous: ambiguous,
    }
}

/// How often each rule fires in the alignment view of a corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleUsage {
    /// Firing count per used pattern.
    pub counts: BTreeMap<String, usize>,
    /// Patterns that never fired, sorted.
    pub unused: Vec<String>,
    /// Characters no rule covered, with their frequency.
    pub uncovered: BTreeMap<char, usize>,
}

impl RuleUsage {
    /// The `k` most frequently used patterns, ties in pattern order.
    pub fn most_used(&self, k: usize) -> Vec<(&str, usize)> {
        let mut used: Vec<(&str, usize)> =
            self.counts.iter().map(|(p, &c)| (p.as_str(), c)).collect();
        used.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        used.truncate(k);
        used
    }
}

pub fn rule_usage<'a>(
    table: &RuleTable,
    lines: impl IntoIterator<Item = &'a str>,
    lookahead: usize,
) -> RuleUsage {
    let mut usage = RuleUsage::default();
    for line in lines {
        for segment in align(table, line, lookahead) {
            if table.get(&segment.input) == Some(segment.output.as_str()) {
                *usage.counts.entry(segment.input).or_default() += 1;
            } else if let Some(c) = segment.input.chars().next() {
                *usage.uncovered.entry(c).or_default() += 1;
            }
        }
    }
    usage.unused = table
        .patterns()
        .filter(|p| !usage.counts.contains_key(*p))
        .map(str::to_string)
        .collect();
    usage.unused.sort();
    usage
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RuleTable {
        RuleTable::from_json_str(r#"{"th": "T", "t": "t", "h": "h", "ka": "K", "k": "k", "a": "A", "x": "X"}"#)
            .unwrap()
    }

    #[test]
    fn conflicts_list_prefixes_longest_first() {
        let conflicts = rule_conflicts(&table());
        let th = conflicts.iter().find(|c| c.pattern == "th").unwrap();
        assert_eq!(th.competitors, vec![Rule::new("th", "T"), Rule::new("t", "t")]);
        assert!(conflicts.iter().any(|c| c.pattern == "ka"));
        assert!(!conflicts.iter().any(|c| c.pattern == "x"));
    }

    #[test]
    fn entropy_values() {
        assert_eq!(entropy(&[]), 0.0);
        assert_eq!(entropy(&[1.0]), 0.0);
        assert!((entropy(&[1.0, 1.0]) - 1.0).abs() < 1e-12);
        assert!(entropy(&[1.0, 0.5, 0.25]) > 0.0);
    }

    #[test]
    fn ambiguity_of_word() {
        let t = table();
        let engine = TransductionEngine::compile(&t).unwrap();
        let a = word_ambiguity(&engine, "th", 5).unwrap();
        assert!(a.is_ambiguous);
        assert_eq!(a.hypotheses[0].output, "T");
        assert!(a.entropy > 0.0);

        let x = word_ambiguity(&engine, "x", 5).unwrap();
        assert!(!x.is_ambiguous);
        assert_eq!(x.entropy, 0.0);
    }

    #[test]
    fn corpus_summary() {
        let engine = TransductionEngine::compile(&table()).unwrap();
        let summary = corpus_ambiguity(&engine, ["th x", "ka qq"], 5, 10);
        assert_eq!(summary.total_words, 4);
        assert_eq!(summary.ambiguous_words, 2);
        assert_eq!(summary.failed_words, 1);
        assert_eq!(summary.ambiguity_rate, 0.5);
    }

    #[test]
    fn usage_counts_and_gaps() {
        let usage = rule_usage(&table(), ["tha ka", "q"], 20);
        assert_eq!(usage.counts["th"], 1);
        assert_eq!(usage.counts["ka"], 1);
        assert_eq!(usage.counts["a"], 1);
        assert_eq!(usage.counts[" "], 1);
        assert_eq!(usage.uncovered[&'q'], 1);
        assert!(usage.unused.contains(&"x".to_string()));
        assert_eq!(usage.most_used(1), vec![(" ", 1)]);
    }
}
