// Rule table compilation: pair-trie mapping transducer plus Kleene closure.

use std::collections::{BTreeMap, BTreeSet};

use hashbrown::HashSet;
use singlish_core::Rule;
use tracing::{debug, debug_span};

use crate::symbols::SymbolTable;
use crate::transition::Transition;
use crate::{EPSILON, Fst, StateId, Transducer};

/// Cost of one rule application.
pub const RULE_WEIGHT: u16 = 1;

/// Error type for rule compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("rule set is empty")]
    EmptyRuleSet,
    #[error("rule {index} has an empty pattern")]
    EmptyPattern { index: usize },
    #[error("pattern {0:?} is defined more than once")]
    DuplicatePattern(String),
    #[error("rule {index} contains a NUL character")]
    NulCharacter { index: usize },
    #[error("rules use {count} distinct characters, more than the symbol table can hold")]
    TooManySymbols { count: usize },
}

/// Align pattern and replacement symbol-by-symbol, padding the shorter side
/// with epsilon at the end.
fn align_pair(pattern: &[u32], replacement: &[u32]) -> Vec<(u32, u32)> {
    let len = pattern.len().max(replacement.len());
    (0..len)
        .map(|i| {
            (
                pattern.get(i).copied().unwrap_or(EPSILON),
                replacement.get(i).copied().unwrap_or(EPSILON),
            )
        })
        .collect()
}

#[derive(Default)]
struct TrieNode {
    children: BTreeMap<(u32, u32), StateId>,
    rule_end: bool,
}

/// Compile rules into the closure of their union.
///
/// Each rule becomes a chain of `pattern[i]:replacement[i]` arcs from the
/// start state. Chains sharing a prefix of symbol pairs share states. Every
/// chain end returns to the start state through an `ε:ε` arc of weight
/// [`RULE_WEIGHT`], and the start state is final with weight zero. A path
/// through the result therefore costs exactly the number of rules applied,
/// and the empty string is accepted with output `""`.
///
/// Patterns are non-empty, so every cycle consumes input.
pub fn compile(rules: &[Rule]) -> Result<Transducer, CompileError> {
    let _span = debug_span!("compile_rules", rules = rules.len()).entered();
    if rules.is_empty() {
        return Err(CompileError::EmptyRuleSet);
    }

    let mut seen = HashSet::with_capacity(rules.len());
    let mut chars = BTreeSet::new();
    for (index, rule) in rules.iter().enumerate() {
        if rule.pattern.is_empty() {
            return Err(CompileError::EmptyPattern { index });
        }
        if rule.pattern.contains('\0') || rule.replacement.contains('\0') {
            return Err(CompileError::NulCharacter { index });
        }
        if !seen.insert(rule.pattern.as_str()) {
            return Err(CompileError::DuplicatePattern(rule.pattern.clone()));
        }
        chars.extend(rule.pattern.chars());
        chars.extend(rule.replacement.chars());
    }

    let symbols = SymbolTable::from_chars(&chars).ok_or(CompileError::TooManySymbols {
        count: chars.len(),
    })?;
    let to_symbols = |s: &str| -> Vec<u32> {
        s.chars()
            .filter_map(|c| symbols.symbol_for(c))
            .collect()
    };

    let mut trie = vec![TrieNode::default()];
    for rule in rules {
        let pairs = align_pair(&to_symbols(&rule.pattern), &to_symbols(&rule.replacement));
        let mut state = 0usize;
        for pair in pairs {
            let next_id = trie.len() as StateId;
            let next = *trie[state].children.entry(pair).or_insert(next_id);
            if next == next_id {
                trie.push(TrieNode::default());
            }
            state = next as usize;
        }
        trie[state].rule_end = true;
    }

    let mut finals = vec![None; trie.len()];
    finals[0] = Some(0);
    let arcs = trie
        .into_iter()
        .map(|node| {
            let mut arcs: Vec<Transition> = node
                .children
                .into_iter()
                .map(|((sym_in, sym_out), target)| Transition::new(sym_in, sym_out, target, 0))
                .collect();
            if node.rule_end {
                arcs.push(Transition::new(EPSILON, EPSILON, 0, RULE_WEIGHT));
            }
            arcs
        })
        .collect::<Vec<_>>();

    let fst = Transducer::from_parts(symbols, arcs, finals, 0);
    debug!(
        rules = rules.len(),
        states = fst.num_states(),
        transitions = fst.num_transitions(),
        symbols = fst.symbols().len(),
        "compiled rule transducer"
    );
    Ok(fst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(pairs: &[(&str, &str)]) -> Vec<Rule> {
        pairs.iter().map(|&(p, r)| Rule::new(p, r)).collect()
    }

    #[test]
    fn reject_empty_rule_set() {
        assert_eq!(compile(&[]).unwrap_err(), CompileError::EmptyRuleSet);
    }

    #[test]
    fn reject_empty_pattern() {
        let err = compile(&rules(&[("a", "x"), ("", "y")])).unwrap_err();
        assert_eq!(err, CompileError::EmptyPattern { index: 1 });
    }

    #[test]
    fn reject_duplicate_pattern() {
        let err = compile(&rules(&[("a", "x"), ("a", "y")])).unwrap_err();
        assert_eq!(err, CompileError::DuplicatePattern("a".to_string()));
    }

    #[test]
    fn reject_nul() {
        let err = compile(&rules(&[("a\0", "x")])).unwrap_err();
        assert_eq!(err, CompileError::NulCharacter { index: 0 });
    }

    #[test]
    fn align_pads_shorter_side() {
        assert_eq!(align_pair(&[1, 2, 3], &[4]), vec![(1, 4), (2, 0), (3, 0)]);
        assert_eq!(align_pair(&[1], &[4, 5]), vec![(1, 4), (0, 5)]);
    }

    #[test]
    fn start_is_final_with_zero_weight() {
        let fst = compile(&rules(&[("a", "x")])).unwrap();
        assert_eq!(fst.start(), 0);
        assert_eq!(fst.final_weight(0), Some(0));
    }

    #[test]
    fn single_rule_shape() {
        let fst = compile(&rules(&[("ab", "x")])).unwrap();
        // start -a:x-> s1 -b:ε-> s2 -ε:ε/1-> start
        assert_eq!(fst.num_states(), 3);
        let a = fst.symbols().symbol_for('a').unwrap();
        let b = fst.symbols().symbol_for('b').unwrap();
        let x = fst.symbols().symbol_for('x').unwrap();
        assert_eq!(fst.arcs(0), &[Transition::new(a, x, 1, 0)]);
        assert_eq!(fst.arcs(1), &[Transition::new(b, EPSILON, 2, 0)]);
        assert_eq!(fst.arcs(2), &[Transition::new(EPSILON, EPSILON, 0, RULE_WEIGHT)]);
    }

    #[test]
    fn shared_prefixes_share_states() {
        let fst = compile(&rules(&[("ka", "k"), ("kaa", "kA")])).unwrap();
        // Both rules start with the pair k:k.
        assert_eq!(fst.arcs(0).len(), 1);
    }

    #[test]
    fn only_start_is_final() {
        let fst = compile(&rules(&[("a", "x"), ("bc", "y"), ("bcd", "z")])).unwrap();
        for s in 1..fst.num_states() as u32 {
            assert_eq!(fst.final_weight(s), None);
        }
    }

    #[test]
    fn no_epsilon_input_cycles_from_start() {
        let fst = compile(&rules(&[("a", "xyz"), ("b", "")])).unwrap();
        for t in fst.arcs(0) {
            assert_ne!(t.sym_in, EPSILON);
        }
    }

    #[test]
    fn artifact_round_trip_of_compiled_rules() {
        let fst = compile(&rules(&[("mama", "\u{0DB8}\u{0DB8}"), ("ma", "\u{0DB8}")])).unwrap();
        let loaded = Transducer::from_bytes(&fst.to_bytes()).unwrap();
        assert_eq!(loaded, fst);
    }
}
