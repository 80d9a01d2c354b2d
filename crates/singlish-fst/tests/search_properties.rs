// Property tests for composition and path search over compiled rules.

use proptest::prelude::*;
use singlish_core::Rule;
use singlish_fst::acceptor::LinearAcceptor;
use singlish_fst::compose::compose;
use singlish_fst::paths::{n_shortest_paths, shortest_path};
use singlish_fst::{Transducer, compile};

fn rules() -> Transducer {
    let rules = [("a", "1"), ("b", "2"), ("ab", "3"), ("ba", "4"), ("aab", "5"), ("bb", "")];
    let rules: Vec<Rule> = rules.iter().map(|&(p, r)| Rule::new(p, r)).collect();
    compile(&rules).unwrap()
}

proptest! {
    #[test]
    fn single_char_rules_make_every_input_decomposable(input in "[ab]{0,12}") {
        let fst = rules();
        let acc = LinearAcceptor::new(fst.symbols(), &input).unwrap();
        let lattice = compose(&acc, &fst);
        let best = shortest_path(&lattice).unwrap();
        prop_assert!(best.cost as usize <= input.chars().count());
    }

    #[test]
    fn nbest_is_sorted_distinct_and_led_by_best(input in "[ab]{1,10}", n in 1usize..8) {
        let fst = rules();
        let acc = LinearAcceptor::new(fst.symbols(), &input).unwrap();
        let lattice = compose(&acc, &fst);
        let best = shortest_path(&lattice).unwrap();
        let nbest = n_shortest_paths(&lattice, n, 100_000);

        prop_assert!(!nbest.paths.is_empty());
        prop_assert!(nbest.paths.len() <= n);
        prop_assert_eq!(&nbest.paths[0], &best);
        for pair in nbest.paths.windows(2) {
            prop_assert!(pair[0].cost <= pair[1].cost);
        }
        let mut outputs: Vec<&Vec<u32>> = nbest.paths.iter().map(|p| &p.output).collect();
        outputs.sort();
        outputs.dedup();
        prop_assert_eq!(outputs.len(), nbest.paths.len());
    }

    #[test]
    fn artifact_reload_preserves_search(input in "[ab]{0,8}") {
        let fst = rules();
        let reloaded = Transducer::from_bytes(&fst.to_bytes()).unwrap();
        let a = LinearAcceptor::new(fst.symbols(), &input).unwrap();
        let b = LinearAcceptor::new(reloaded.symbols(), &input).unwrap();
        prop_assert_eq!(
            shortest_path(&compose(&a, &fst)),
            shortest_path(&compose(&b, &reloaded))
        );
    }
}
