// Rule table: JSON rule source loading, validation and lookup.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use singlish_core::Rule;
use singlish_core::rule::sort_by_priority;

/// Pattern of the whitespace identity rule every table carries.
pub const SPACE: &str = " ";

/// Error type for rule source loading.
#[derive(Debug, thiserror::Error)]
pub enum RuleSourceError {
    #[error("malformed rule source: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rule source defines no rules")]
    Empty,
    #[error("rule source contains an empty pattern")]
    EmptyPattern,
    #[error("pattern {0:?} is defined more than once")]
    DuplicatePattern(String),
}

/// Rules in document order, read from a JSON object.
///
/// A JSON object with a repeated key is rejected instead of keeping the last
/// value.
struct RuleSource(Vec<Rule>);

impl<'de> serde::Deserialize<'de> for RuleSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RuleSourceVisitor;

        impl<'de> Visitor<'de> for RuleSourceVisitor {
            type Value = RuleSource;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object mapping patterns to replacements")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RuleSource, A::Error> {
                let mut seen = HashSet::new();
                let mut rules = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((pattern, replacement)) = map.next_entry::<String, String>()? {
                    if !seen.insert(pattern.clone()) {
                        return Err(de::Error::custom(format!(
                            "pattern {pattern:?} is defined more than once"
                        )));
                    }
                    rules.push(Rule::new(pattern, replacement));
                }
                Ok(RuleSource(rules))
            }
        }

        deserializer.deserialize_map(RuleSourceVisitor)
    }
}

/// Validated, immutable rule table.
///
/// Rules are held in priority order (longest pattern first). The table
/// always contains the identity rule for a single space unless the source
/// maps the space to something else.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    by_pattern: HashMap<String, usize>,
    max_pattern_len: usize,
    /// The space rule was added here rather than read from the source.
    synthesized_space: bool,
}

impl RuleTable {
    /// Build a table from rules in any order.
    pub fn new(mut rules: Vec<Rule>) -> Result<Self, RuleSourceError> {
        if rules.is_empty() {
            return Err(RuleSourceError::Empty);
        }
        let synthesized_space = !rules.iter().any(|r| r.pattern == SPACE);
        if synthesized_space {
            rules.push(Rule::new(SPACE, SPACE));
        }
        sort_by_priority(&mut rules);

        let mut by_pattern = HashMap::with_capacity(rules.len());
        let mut max_pattern_len = 0;
        for (i, rule) in rules.iter().enumerate() {
            if rule.pattern.is_empty() {
                return Err(RuleSourceError::EmptyPattern);
            }
            if by_pattern.insert(rule.pattern.clone(), i).is_some() {
                return Err(RuleSourceError::DuplicatePattern(rule.pattern.clone()));
            }
            max_pattern_len = max_pattern_len.max(rule.pattern_len());
        }

        Ok(Self {
            rules,
            by_pattern,
            max_pattern_len,
            synthesized_space,
        })
    }

    /// Parse a JSON rule source: an object mapping pattern to replacement.
    pub fn from_json_str(json: &str) -> Result<Self, RuleSourceError> {
        let RuleSource(rules) = serde_json::from_str(json)?;
        Self::new(rules)
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Replacement for an exact pattern.
    pub fn get(&self, pattern: &str) -> Option<&str> {
        self.by_pattern
            .get(pattern)
            .map(|&i| self.rules[i].replacement.as_str())
    }

    pub fn contains_pattern(&self, pattern: &str) -> bool {
        self.by_pattern.contains_key(pattern)
    }

    /// Length in characters of the longest pattern.
    pub fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }

    /// All patterns, in priority order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().map(|r| r.pattern.as_str())
    }

    /// Characters that occur in at least one pattern.
    pub fn pattern_chars(&self) -> BTreeSet<char> {
        self.rules.iter().flat_map(|r| r.pattern.chars()).collect()
    }

    /// A copy of this table without the rule for `pattern`.
    ///
    /// Returns `None` if the pattern is absent or removing it would leave the
    /// table empty.
    pub fn without(&self, pattern: &str) -> Option<Self> {
        if !self.contains_pattern(pattern) || pattern == SPACE {
            return None;
        }
        let rules: Vec<Rule> = self
            .rules
            .iter()
            .filter(|r| r.pattern != pattern)
            .filter(|r| !(self.synthesized_space && r.pattern == SPACE))
            .cloned()
            .collect();
        Self::new(rules).ok()
    }

    /// Whether the space rule was added by [`new`](Self::new) rather than
    /// read from the rule source.
    pub fn has_synthesized_space(&self) -> bool {
        self.synthesized_space
    }

    /// Serialize as a JSON object, one rule per line, in priority order.
    ///
    /// A space rule the source did not define is left out, so writing the
    /// table back never adds rules to the source.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let mut out = String::from("{\n");
        let written = self
            .rules
            .iter()
            .filter(|r| !(self.synthesized_space && r.pattern == SPACE));
        for (i, rule) in written.enumerate() {
            if i > 0 {
                out.push_str(",\n");
            }
            out.push_str("  ");
            out.push_str(&serde_json::to_string(&rule.pattern)?);
            out.push_str(": ");
            out.push_str(&serde_json::to_string(&rule.replacement)?);
        }
        out.push_str("\n}\n");
        Ok(out)
    }
}
