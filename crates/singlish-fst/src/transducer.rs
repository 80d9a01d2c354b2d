// Compiled transducer: state/transition tables and artifact encoding.

use bytemuck::Zeroable;

use crate::format::{self, HEADER_SIZE};
use crate::symbols::{self, SymbolTable};
use crate::transition::{STATE_FINAL, StateEntry, TableHeader, Transition};
use crate::{EPSILON, Fst, FstError, StateId};

/// Immutable weighted transducer.
///
/// States own contiguous runs of the transition table. Arcs within a run are
/// sorted by `(sym_in, sym_out, target_state)`.
///
/// Artifacts are stored little-endian. Byte-swapped artifacts are rejected by
/// the header check rather than converted.
#[derive(Clone, PartialEq, Eq)]
pub struct Transducer {
    symbols: SymbolTable,
    states: Vec<StateEntry>,
    transitions: Vec<Transition>,
    start: StateId,
}

impl std::fmt::Debug for Transducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transducer")
            .field("state_count", &self.states.len())
            .field("transition_count", &self.transitions.len())
            .field("symbol_count", &self.symbols.len())
            .finish()
    }
}

impl Transducer {
    /// Assemble a transducer from per-state arc lists.
    ///
    /// `finals[i]` is the final weight of state `i`, if any. Arcs are sorted
    /// into canonical order here.
    pub(crate) fn from_parts(
        symbols: SymbolTable,
        arcs: Vec<Vec<Transition>>,
        finals: Vec<Option<u32>>,
        start: StateId,
    ) -> Self {
        debug_assert_eq!(arcs.len(), finals.len());
        let mut states = Vec::with_capacity(arcs.len());
        let mut transitions = Vec::with_capacity(arcs.iter().map(Vec::len).sum());
        for (mut state_arcs, final_weight) in arcs.into_iter().zip(finals) {
            state_arcs.sort_by_key(Transition::sort_key);
            states.push(StateEntry {
                first_transition: transitions.len() as u32,
                transition_count: state_arcs.len() as u32,
                final_weight: final_weight.unwrap_or(0),
                flags: if final_weight.is_some() { STATE_FINAL } else { 0 },
            });
            transitions.extend(state_arcs);
        }
        Self {
            symbols,
            states,
            transitions,
            start,
        }
    }

    /// Load a transducer from artifact bytes produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(data: &[u8]) -> Result<Self, FstError> {
        format::parse_header(data)?;
        let (symbols, sym_end) = symbols::parse_symbol_table(data, HEADER_SIZE)?;

        let table_offset = format::align_offset(sym_end);
        let header_end = table_offset + size_of::<TableHeader>();
        if header_end > data.len() {
            return Err(FstError::TooShort {
                expected: header_end,
                actual: data.len(),
            });
        }
        let header: TableHeader = bytemuck::pod_read_unaligned(&data[table_offset..header_end]);

        let state_count = header.state_count as usize;
        let transition_count = header.transition_count as usize;
        let states_end = header_end + state_count * size_of::<StateEntry>();
        let transitions_end = states_end + transition_count * size_of::<Transition>();
        if transitions_end > data.len() {
            return Err(FstError::TooShort {
                expected: transitions_end,
                actual: data.len(),
            });
        }
        if transitions_end != data.len() {
            return Err(FstError::CorruptTable(format!(
                "{} trailing bytes after transition table",
                data.len() - transitions_end
            )));
        }

        // Copy into aligned Vecs
        let mut states = vec![StateEntry::zeroed(); state_count];
        bytemuck::cast_slice_mut::<StateEntry, u8>(&mut states)
            .copy_from_slice(&data[header_end..states_end]);
        let mut transitions = vec![Transition::zeroed(); transition_count];
        bytemuck::cast_slice_mut::<Transition, u8>(&mut transitions)
            .copy_from_slice(&data[states_end..transitions_end]);

        let fst = Self {
            symbols,
            states,
            transitions,
            start: header.start_state,
        };
        fst.validate()?;
        Ok(fst)
    }

    /// Check the structural invariants a loaded table must satisfy before
    /// any traversal indexes into it.
    fn validate(&self) -> Result<(), FstError> {
        let state_count = self.states.len();
        if state_count == 0 {
            return Err(FstError::CorruptTable("no states".to_string()));
        }
        if self.start as usize >= state_count {
            return Err(FstError::CorruptTable(format!(
                "start state {} out of range",
                self.start
            )));
        }
        let symbol_count = self.symbols.len() as u32;
        let mut expected_first = 0usize;
        for (i, state) in self.states.iter().enumerate() {
            let range = state.range();
            if range.start != expected_first || range.end > self.transitions.len() {
                return Err(FstError::CorruptTable(format!(
                    "state {i} has invalid transition range"
                )));
            }
            expected_first = range.end;
            let arcs = &self.transitions[range];
            for t in arcs {
                if t.target_state as usize >= state_count {
                    return Err(FstError::CorruptTable(format!(
                        "state {i} has transition to missing state {}",
                        t.target_state
                    )));
                }
                if t.sym_in >= symbol_count || t.sym_out >= symbol_count {
                    return Err(FstError::CorruptTable(format!(
                        "state {i} has transition with unknown symbol"
                    )));
                }
            }
            if !arcs.is_sorted_by_key(Transition::sort_key) {
                return Err(FstError::CorruptTable(format!(
                    "state {i} has unsorted transitions"
                )));
            }
        }
        if expected_first != self.transitions.len() {
            return Err(FstError::CorruptTable(
                "transitions not owned by any state".to_string(),
            ));
        }
        self.check_epsilon_cycles()
    }

    /// Reject cycles made only of ε-input arcs: every cycle of a compiled
    /// transducer consumes input, and path search relies on it.
    fn check_epsilon_cycles(&self) -> Result<(), FstError> {
        const UNSEEN: u8 = 0;
        const ON_STACK: u8 = 1;
        const DONE: u8 = 2;

        let mut mark = vec![UNSEEN; self.states.len()];
        // (state, index of the next arc to follow)
        let mut stack: Vec<(usize, usize)> = Vec::new();
        for root in 0..self.states.len() {
            if mark[root] != UNSEEN {
                continue;
            }
            mark[root] = ON_STACK;
            stack.push((root, 0));
            while let Some(&(state, next)) = stack.last() {
                let arcs = &self.transitions[self.states[state].range()];
                // Sorted arcs put the ε-input ones first.
                match arcs.get(next).filter(|t| t.sym_in == EPSILON) {
                    Some(t) => {
                        let top = stack.len() - 1;
                        stack[top].1 += 1;
                        let target = t.target_state as usize;
                        match mark[target] {
                            ON_STACK => {
                                return Err(FstError::CorruptTable(format!(
                                    "state {target} lies on a cycle of epsilon-input transitions"
                                )));
                            }
                            UNSEEN => {
                                mark[target] = ON_STACK;
                                stack.push((target, 0));
                            }
                            _ => {}
                        }
                    }
                    None => {
                        mark[state] = DONE;
                        stack.pop();
                    }
                }
            }
        }
        Ok(())
    }

    /// Serialize to the artifact format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            HEADER_SIZE
                + 64
                + self.symbols.len() * 4
                + (self.states.len() + self.transitions.len()) * 16,
        );
        format::write_header(&mut buf);
        self.symbols.write_to(&mut buf);
        buf.resize(format::align_offset(buf.len()), 0);

        let header = TableHeader {
            state_count: self.states.len() as u32,
            transition_count: self.transitions.len() as u32,
            start_state: self.start,
            _reserved: 0,
        };
        buf.extend_from_slice(bytemuck::bytes_of(&header));
        buf.extend_from_slice(bytemuck::cast_slice(&self.states));
        buf.extend_from_slice(bytemuck::cast_slice(&self.transitions));
        buf
    }

    /// Access the symbol table.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Total number of transitions.
    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }
}

impl Fst for Transducer {
    fn start(&self) -> StateId {
        self.start
    }

    fn num_states(&self) -> usize {
        self.states.len()
    }

    fn final_weight(&self, state: StateId) -> Option<u32> {
        let entry = self.states.get(state as usize)?;
        entry.is_final().then_some(entry.final_weight)
    }

    fn arcs(&self, state: StateId) -> &[Transition] {
        match self.states.get(state as usize) {
            Some(entry) => &self.transitions[entry.range()],
            None => &[],
        }
    }
}
