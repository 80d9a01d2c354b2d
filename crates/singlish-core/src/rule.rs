// Rewrite rules: (pattern, replacement) pairs and their priority order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A single string-rewrite rule.
///
/// `pattern` is the romanized input sequence, `replacement` the target-script
/// output. Patterns are unique within a rule table and never empty once the
/// table has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub pattern: String,
    pub replacement: String,
}

impl Rule {
    /// Create a new rule.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// Pattern length in characters (not bytes).
    pub fn pattern_len(&self) -> usize {
        self.pattern.chars().count()
    }
}

/// Priority order for rule tables: longer patterns first, ties broken
/// lexicographically so the order is total and reproducible.
///
/// This order is for human-authored tables and diagnostics only. Runtime
/// selection between competing decompositions is decided by path cost.
pub fn priority_order(a: &Rule, b: &Rule) -> Ordering {
    b.pattern_len()
        .cmp(&a.pattern_len())
        .then_with(|| a.pattern.cmp(&b.pattern))
}

/// Sort rules into [`priority_order`].
pub fn sort_by_priority(rules: &mut [Rule]) {
    rules.sort_by(priority_order);
}
