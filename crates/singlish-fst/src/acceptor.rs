// Linear acceptor over the symbols of one input string.

use crate::symbols::SymbolTable;
use crate::transition::Transition;
use crate::{Fst, StateId};

/// Chain automaton accepting exactly one symbol sequence.
///
/// State `i` has a single arc consuming the `i`-th symbol; state `n` is final
/// with weight zero.
#[derive(Debug, Clone)]
pub struct LinearAcceptor {
    arcs: Vec<Transition>,
}

impl LinearAcceptor {
    /// Build the acceptor for `input`.
    ///
    /// Fails with the first character that has no symbol in `symbols`: such a
    /// character cannot be consumed by any rule, so no composition could
    /// succeed.
    pub fn new(symbols: &SymbolTable, input: &str) -> Result<Self, char> {
        let arcs = input
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let sym = symbols.symbol_for(c).ok_or(c)?;
                Ok(Transition::new(sym, sym, i as u32 + 1, 0))
            })
            .collect::<Result<Vec<_>, char>>()?;
        Ok(Self { arcs })
    }

    /// Number of symbols in the accepted sequence.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

impl Fst for LinearAcceptor {
    fn start(&self) -> StateId {
        0
    }

    fn num_states(&self) -> usize {
        self.arcs.len() + 1
    }

    fn final_weight(&self, state: StateId) -> Option<u32> {
        (state as usize == self.arcs.len()).then_some(0)
    }

    fn arcs(&self, state: StateId) -> &[Transition] {
        let i = state as usize;
        self.arcs.get(i..i + 1).unwrap_or(&[])
    }
}
