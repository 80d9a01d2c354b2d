// Property tests for transliteration, n-best search and OOV coverage.

use proptest::prelude::*;
use proptest::sample::Index;
use singlish_translit::{EngineOptions, RuleTable, TranslitHandle};

const RULES: &str = r#"{
    "mama": "මම",
    "gedara": "ගෙදර",
    "yanawa": "යනවා",
    "ma": "ම",
    "ga": "ග",
    "ya": "ය",
    "na": "න",
    "wa": "ව",
    "m": "ම්",
    "g": "ග්",
    "d": "ද්",
    "r": "ර්",
    "y": "ය්",
    "n": "න්",
    "w": "ව්",
    "a": "අ",
    "e": "එ"
}"#;

fn handle_for(table: &RuleTable) -> TranslitHandle {
    TranslitHandle::from_rules_json(&table.to_json_string().unwrap(), EngineOptions::default())
        .unwrap()
}

fn handle() -> TranslitHandle {
    TranslitHandle::from_rules_json(RULES, EngineOptions::default()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn transliteration_is_deterministic(input in "[adegmnrwy ]{0,16}") {
        let h = handle();
        let first = h.transliterate(&input, true, false).unwrap();
        let second = h.transliterate(&input, true, false).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn nbest_outputs_are_distinct_and_ranked(input in "[adegmnrwy]{1,10}", n in 1usize..8) {
        let h = handle();
        let hs = h.transliterate_nbest(&input, n).unwrap();
        prop_assert!(!hs.is_empty());
        prop_assert!(hs.len() <= n);
        prop_assert_eq!(hs[0].confidence, 1.0);
        prop_assert_eq!(&hs[0].output, &h.transliterate(&input, false, false).unwrap());
        for pair in hs.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
        }
        let mut outputs: Vec<&str> = hs.iter().map(|h| h.output.as_str()).collect();
        outputs.sort_unstable();
        outputs.dedup();
        prop_assert_eq!(outputs.len(), hs.len());
    }

    #[test]
    fn covered_words_round_trip(words in prop::collection::vec(
        prop::sample::select(vec!["mama", "gedara", "yanawa", "ma", "na", "e"]), 0..6)
    ) {
        let h = handle();
        let input = words.join(" ");
        let expected: Vec<&str> = words
            .iter()
            .map(|w| h.table().get(w).unwrap())
            .collect();
        prop_assert_eq!(h.transliterate(&input, false, false).unwrap(), expected.join(" "));
    }

    #[test]
    fn removing_a_rule_never_raises_coverage(
        corpus in "[adegmnrwyxz ]{0,24}",
        victim in any::<Index>(),
    ) {
        let full = RuleTable::from_json_str(RULES).unwrap();
        let removable: Vec<&str> = full.patterns().filter(|p| *p != " ").collect();
        let pattern = removable[victim.index(removable.len())];
        let reduced = full.without(pattern).unwrap();

        let before = handle_for(&full).detect_oov(&corpus).coverage;
        let after = handle_for(&reduced).detect_oov(&corpus).coverage;
        prop_assert!(after <= before, "removing {:?}: {} > {}", pattern, after, before);
    }
}
