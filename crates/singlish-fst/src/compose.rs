// Composition of two transducers into a trimmed, acyclic lattice.

use std::collections::VecDeque;

use hashbrown::HashMap;
use tracing::{debug_span, trace};

use crate::{EPSILON, Fst, StateId};

/// Arc of a composed lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeArc {
    pub sym_in: u32,
    pub sym_out: u32,
    pub target: StateId,
    pub weight: u32,
}

#[derive(Debug, Clone, Default)]
struct LatticeState {
    arcs: Vec<LatticeArc>,
    final_weight: Option<u32>,
}

/// Result of composing an input acceptor with the rule transducer.
///
/// Every state is reachable from the start and can reach a final state. An
/// empty lattice (no states) means the input has no decomposition. State 0
/// is the start state of a non-empty lattice.
#[derive(Debug, Clone, Default)]
pub struct Lattice {
    states: Vec<LatticeState>,
}

impl Lattice {
    /// Whether the lattice accepts nothing.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn start(&self) -> StateId {
        0
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.states.iter().map(|s| s.arcs.len()).sum()
    }

    pub fn arcs(&self, state: StateId) -> &[LatticeArc] {
        self.states
            .get(state as usize)
            .map(|s| s.arcs.as_slice())
            .unwrap_or(&[])
    }

    pub fn final_weight(&self, state: StateId) -> Option<u32> {
        self.states.get(state as usize)?.final_weight
    }

    /// Keep only states that can reach a final state, renumbering the rest
    /// in their original order. The start state must be state 0.
    fn trim(self) -> Self {
        let n = self.states.len();
        let mut reverse: Vec<Vec<StateId>> = vec![Vec::new(); n];
        for (s, state) in self.states.iter().enumerate() {
            for arc in &state.arcs {
                reverse[arc.target as usize].push(s as StateId);
            }
        }

        let mut coaccessible = vec![false; n];
        let mut stack: Vec<StateId> = Vec::new();
        for (s, state) in self.states.iter().enumerate() {
            if state.final_weight.is_some() {
                coaccessible[s] = true;
                stack.push(s as StateId);
            }
        }
        while let Some(s) = stack.pop() {
            for &p in &reverse[s as usize] {
                if !coaccessible[p as usize] {
                    coaccessible[p as usize] = true;
                    stack.push(p);
                }
            }
        }

        if n == 0 || !coaccessible[0] {
            return Self::default();
        }

        let mut new_id = vec![StateId::MAX; n];
        let mut next = 0;
        for (s, &keep) in coaccessible.iter().enumerate() {
            if keep {
                new_id[s] = next;
                next += 1;
            }
        }

        let states = self
            .states
            .into_iter()
            .zip(coaccessible)
            .filter(|(_, keep)| *keep)
            .map(|(state, _)| LatticeState {
                arcs: state
                    .arcs
                    .into_iter()
                    .filter(|a| new_id[a.target as usize] != StateId::MAX)
                    .map(|a| LatticeArc {
                        target: new_id[a.target as usize],
                        ..a
                    })
                    .collect(),
                final_weight: state.final_weight,
            })
            .collect();
        Self { states }
    }
}

/// Compose `left` with `right`, keeping only useful states.
///
/// `left` must have no epsilon output labels; this holds for
/// [`LinearAcceptor`](crate::acceptor::LinearAcceptor). Under that
/// condition an epsilon-input arc of `right` advances `right` alone, and
/// every other arc of `right` must match the output of a `left` arc, so each
/// path of the result corresponds to exactly one pair of paths.
///
/// Arc weights and final weights add. States are discovered breadth-first
/// from `(left.start(), right.start())`.
pub fn compose<L: Fst, R: Fst>(left: &L, right: &R) -> Lattice {
    let _span = debug_span!("compose", left_states = left.num_states()).entered();
    let mut ids: HashMap<(StateId, StateId), StateId> = HashMap::new();
    let mut pairs: Vec<(StateId, StateId)> = Vec::new();
    let mut states: Vec<LatticeState> = Vec::new();
    let mut queue = VecDeque::new();

    let mut intern = |pair: (StateId, StateId),
                      pairs: &mut Vec<(StateId, StateId)>,
                      queue: &mut VecDeque<StateId>|
     -> StateId {
        *ids.entry(pair).or_insert_with(|| {
            let id = pairs.len() as StateId;
            pairs.push(pair);
            queue.push_back(id);
            id
        })
    };

    intern((left.start(), right.start()), &mut pairs, &mut queue);

    while let Some(id) = queue.pop_front() {
        let (l, r) = pairs[id as usize];
        let mut state = LatticeState {
            arcs: Vec::new(),
            final_weight: match (left.final_weight(l), right.final_weight(r)) {
                (Some(a), Some(b)) => Some(a + b),
                _ => None,
            },
        };

        for rt in right.arcs_with_input(r, EPSILON) {
            let target = intern((l, rt.target_state), &mut pairs, &mut queue);
            state.arcs.push(LatticeArc {
                sym_in: EPSILON,
                sym_out: rt.sym_out,
                target,
                weight: rt.weight as u32,
            });
        }

        for lt in left.arcs(l) {
            debug_assert_ne!(lt.sym_out, EPSILON);
            for rt in right.arcs_with_input(r, lt.sym_out) {
                let target = intern((lt.target_state, rt.target_state), &mut pairs, &mut queue);
                state.arcs.push(LatticeArc {
                    sym_in: lt.sym_in,
                    sym_out: rt.sym_out,
                    target,
                    weight: lt.weight as u32 + rt.weight as u32,
                });
            }
        }

        states.push(state);
    }

    let untrimmed = states.len();
    let lattice = Lattice { states }.trim();
    trace!(
        states = untrimmed,
        kept = lattice.num_states(),
        arcs = lattice.num_arcs(),
        "composed lattice"
    );
    lattice
}
