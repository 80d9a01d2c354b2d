// Shortest path and n-shortest distinct paths over a lattice.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use hashbrown::HashSet;
use tracing::{debug, debug_span, warn};

use crate::compose::Lattice;
use crate::{EPSILON, StateId};

/// An accepted path: total cost and its output symbols with epsilon removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub cost: u32,
    pub output: Vec<u32>,
}

/// Result of an n-best search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NBest {
    /// Distinct outputs in non-decreasing cost order.
    pub paths: Vec<Path>,
    /// The search stopped at the iteration limit before it finished.
    pub truncated: bool,
}

/// Cost of the cheapest completion from each state, or `None` when no final
/// state is reachable. Computed by Dijkstra over reversed arcs, seeded with
/// the final weights.
pub fn distances_to_final(lattice: &Lattice) -> Vec<Option<u32>> {
    let n = lattice.num_states();
    let mut reverse: Vec<Vec<(StateId, u32)>> = vec![Vec::new(); n];
    for s in 0..n as StateId {
        for arc in lattice.arcs(s) {
            reverse[arc.target as usize].push((s, arc.weight));
        }
    }

    let mut dist: Vec<Option<u32>> = (0..n as StateId)
        .map(|s| lattice.final_weight(s))
        .collect();
    let mut heap: BinaryHeap<Reverse<(u32, StateId)>> = dist
        .iter()
        .enumerate()
        .filter_map(|(s, d)| d.map(|d| Reverse((d, s as StateId))))
        .collect();

    while let Some(Reverse((d, s))) = heap.pop() {
        if dist[s as usize].is_some_and(|best| d > best) {
            continue;
        }
        for &(p, w) in &reverse[s as usize] {
            let candidate = d + w;
            if dist[p as usize].is_none_or(|best| candidate < best) {
                dist[p as usize] = Some(candidate);
                heap.push(Reverse((candidate, p)));
            }
        }
    }
    dist
}

/// The single lowest-cost path, or `None` for an empty lattice.
///
/// At each state the walk stops if the final weight attains the optimum,
/// and otherwise takes the first arc (in arc order) that does. The lattice
/// is acyclic, so the walk terminates.
pub fn shortest_path(lattice: &Lattice) -> Option<Path> {
    if lattice.is_empty() {
        return None;
    }
    let h = distances_to_final(lattice);
    let cost = h[lattice.start() as usize]?;

    let mut output = Vec::new();
    let mut state = lattice.start();
    loop {
        let here = h[state as usize]?;
        if lattice.final_weight(state) == Some(here) {
            break;
        }
        let arc = lattice
            .arcs(state)
            .iter()
            .find(|a| h[a.target as usize].is_some_and(|t| a.weight + t == here))?;
        if arc.sym_out != EPSILON {
            output.push(arc.sym_out);
        }
        state = arc.target;
    }
    Some(Path { cost, output })
}

/// Partial path in the search arena.
struct PathNode {
    state: StateId,
    parent: Option<usize>,
    sym_out: u32,
    complete: bool,
}

fn collect_output(arena: &[PathNode], mut idx: usize) -> Vec<u32> {
    let mut out = Vec::new();
    loop {
        let node = &arena[idx];
        if node.sym_out != EPSILON {
            out.push(node.sym_out);
        }
        match node.parent {
            Some(p) => idx = p,
            None => break,
        }
    }
    out.reverse();
    out
}

/// Up to `n` lowest-cost paths with pairwise distinct outputs.
///
/// Partial paths are expanded best-first by reduced cost: taking arc `e`
/// from `u` adds `w(e) + h(target) - h(u)`, stopping at `u` adds
/// `final(u) - h(u)`, where `h` is [`distances_to_final`]. A complete path's
/// total is `h(start)` plus its reduced cost, so complete paths come off the
/// queue in cost order. Among equal keys the most recently pushed entry wins
/// and children are pushed in reverse arc order, which makes the first
/// result identical to [`shortest_path`].
///
/// Paths whose output repeats an earlier one are skipped. The search stops
/// after `n` distinct outputs, when the queue empties, or after
/// `max_iterations` pops.
pub fn n_shortest_paths(lattice: &Lattice, n: usize, max_iterations: usize) -> NBest {
    let _span = debug_span!("n_shortest_paths", n, states = lattice.num_states()).entered();
    let mut result = NBest::default();
    if n == 0 || lattice.is_empty() {
        return result;
    }
    let h = distances_to_final(lattice);
    let Some(base) = h[lattice.start() as usize] else {
        return result;
    };

    let mut arena = vec![PathNode {
        state: lattice.start(),
        parent: None,
        sym_out: EPSILON,
        complete: false,
    }];
    let mut seq: u64 = 0;
    let mut heap: BinaryHeap<(Reverse<u32>, u64, usize)> = BinaryHeap::new();
    heap.push((Reverse(0), seq, 0));
    let mut seen: HashSet<Vec<u32>> = HashSet::new();
    let mut iterations = 0usize;

    while let Some((Reverse(reduced), _, idx)) = heap.pop() {
        iterations += 1;
        if iterations > max_iterations {
            warn!(
                limit = max_iterations,
                found = result.paths.len(),
                "n-best search hit iteration limit"
            );
            result.truncated = true;
            break;
        }

        if arena[idx].complete {
            let output = collect_output(&arena, idx);
            if seen.insert(output.clone()) {
                result.paths.push(Path {
                    cost: base + reduced,
                    output,
                });
                if result.paths.len() == n {
                    break;
                }
            }
            continue;
        }

        let state = arena[idx].state;
        let here = h[state as usize].unwrap_or(u32::MAX);
        for arc in lattice.arcs(state).iter().rev() {
            let Some(target_h) = h[arc.target as usize] else {
                continue;
            };
            let delta = arc.weight + target_h - here;
            arena.push(PathNode {
                state: arc.target,
                parent: Some(idx),
                sym_out: arc.sym_out,
                complete: false,
            });
            seq += 1;
            heap.push((Reverse(reduced + delta), seq, arena.len() - 1));
        }
        if let Some(fw) = lattice.final_weight(state) {
            arena.push(PathNode {
                state,
                parent: Some(idx),
                sym_out: EPSILON,
                complete: true,
            });
            seq += 1;
            heap.push((Reverse(reduced + fw - here), seq, arena.len() - 1));
        }
    }

    debug!(
        requested = n,
        found = result.paths.len(),
        iterations,
        "n-best search finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acceptor::LinearAcceptor;
    use crate::compose::compose;
    use crate::{Transducer, compile};
    use singlish_core::Rule;

    fn fst(rules: &[(&str, &str)]) -> Transducer {
        let rules: Vec<Rule> = rules.iter().map(|&(p, r)| Rule::new(p, r)).collect();
        compile(&rules).unwrap()
    }

    fn lattice(fst: &Transducer, input: &str) -> Lattice {
        let acc = LinearAcceptor::new(fst.symbols(), input).unwrap();
        compose(&acc, fst)
    }

    fn render(fst: &Transducer, path: &Path) -> String {
        fst.symbols().render(&path.output)
    }

    const MAMA_RULES: &[(&str, &str)] = &[("mama", "M"), ("ma", "m"), ("m", "n"), ("a", "")];

    #[test]
    fn shortest_prefers_fewer_rules() {
        let t = fst(MAMA_RULES);
        let best = shortest_path(&lattice(&t, "mama")).unwrap();
        assert_eq!(best.cost, 1);
        assert_eq!(render(&t, &best), "M");
    }

    #[test]
    fn shortest_of_empty_input_is_empty_output() {
        let t = fst(MAMA_RULES);
        let best = shortest_path(&lattice(&t, "")).unwrap();
        assert_eq!(best.cost, 0);
        assert!(best.output.is_empty());
    }

    #[test]
    fn shortest_of_empty_lattice_is_none() {
        assert_eq!(shortest_path(&Lattice::default()), None);
    }

    #[test]
    fn nbest_in_cost_order_and_distinct() {
        let t = fst(MAMA_RULES);
        let nbest = n_shortest_paths(&lattice(&t, "mama"), 10, 10_000);
        assert!(!nbest.truncated);
        let costs: Vec<u32> = nbest.paths.iter().map(|p| p.cost).collect();
        assert!(costs.is_sorted());
        let outputs: Vec<String> = nbest.paths.iter().map(|p| render(&t, p)).collect();
        let unique: std::collections::BTreeSet<&String> = outputs.iter().collect();
        assert_eq!(unique.len(), outputs.len());
        // M (1), mm (2), m+n+"" and n+""+m (3), n+""+n+"" (4)
        assert_eq!(outputs[0], "M");
        assert_eq!(outputs[1], "mm");
        assert_eq!(costs, vec![1, 2, 3, 3, 4]);
        assert!(outputs.contains(&"mn".to_string()));
        assert!(outputs.contains(&"nm".to_string()));
        assert_eq!(outputs[4], "nn");
    }

    #[test]
    fn nbest_first_matches_shortest() {
        let t = fst(&[("a", "x"), ("aa", "y")]);
        let l = lattice(&t, "aaa");
        let best = shortest_path(&l).unwrap();
        let nbest = n_shortest_paths(&l, 3, 10_000);
        assert_eq!(nbest.paths[0], best);

        let t = fst(&[("ab", "P"), ("a", "q"), ("b", "r"), ("abab", "S")]);
        let l = lattice(&t, "ababab");
        let best = shortest_path(&l).unwrap();
        let nbest = n_shortest_paths(&l, 4, 10_000);
        assert_eq!(nbest.paths[0], best);
        assert_eq!(best.cost, 2);
    }

    #[test]
    fn nbest_dedups_equal_outputs() {
        // "ab" splits as a+b or ab; both emit "x".
        let t = fst(&[("ab", "x"), ("a", "x"), ("b", "")]);
        let nbest = n_shortest_paths(&lattice(&t, "ab"), 5, 10_000);
        assert_eq!(nbest.paths.len(), 1);
        assert_eq!(nbest.paths[0].cost, 1);
    }

    #[test]
    fn nbest_exhausts_without_truncation() {
        let t = fst(&[("a", "x")]);
        let nbest = n_shortest_paths(&lattice(&t, "aaaa"), 5, 10_000);
        assert_eq!(nbest.paths.len(), 1);
        assert!(!nbest.truncated);
    }

    #[test]
    fn nbest_respects_iteration_limit() {
        let t = fst(MAMA_RULES);
        let nbest = n_shortest_paths(&lattice(&t, "mamamamamama"), 1000, 3);
        assert!(nbest.truncated);
        assert!(nbest.paths.len() < 1000);
    }

    #[test]
    fn nbest_zero_requested() {
        let t = fst(MAMA_RULES);
        assert!(n_shortest_paths(&lattice(&t, "mama"), 0, 10).paths.is_empty());
    }

    #[test]
    fn distances_on_chain() {
        let t = fst(&[("a", "x")]);
        let l = lattice(&t, "aa");
        let h = distances_to_final(&l);
        assert_eq!(h[0], Some(2));
        assert_eq!(h[l.num_states() - 1], Some(0));
    }
}
