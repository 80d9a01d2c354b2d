//! Weighted finite state transducer engine for rule-based transliteration.
//!
//! An ordered table of string-rewrite rules is compiled once into an
//! immutable transducer. Each query composes a linear acceptor of the input
//! with that transducer and searches the resulting lattice for the cheapest
//! paths. Every rule application costs one unit, so decompositions that use
//! fewer, longer rules win without any explicit longest-match logic.
//!
//! # Architecture
//!
//! - [`format`] -- Binary artifact header parsing and validation
//! - [`transition`] -- Plain-old-data state and transition records
//! - [`symbols`] -- Symbol table (char-to-index and index-to-string mapping)
//! - [`transducer`] -- The compiled transducer and its artifact encoding
//! - [`compiler`] -- Rule table to transducer compilation (mapping + closure)
//! - [`acceptor`] -- Linear acceptor for a single input string
//! - [`compose`] -- Composition into a trimmed lattice
//! - [`paths`] -- Shortest path and n-shortest distinct paths

pub mod acceptor;
pub mod compiler;
pub mod compose;
pub mod format;
pub mod paths;
pub mod symbols;
pub mod transducer;
pub mod transition;

pub use compiler::{CompileError, compile};
pub use transducer::Transducer;

use transition::Transition;

/// Index of a state within a transducer or lattice.
pub type StateId = u32;

/// Symbol index reserved for epsilon (the empty string).
pub const EPSILON: u32 = 0;

/// Default safety limit on the number of queue pops during n-best search.
pub const MAX_SEARCH_ITERATIONS: usize = 100_000;

/// Error type for artifact parsing and loading.
#[derive(Debug, thiserror::Error)]
pub enum FstError {
    #[error("invalid magic number in transducer header")]
    InvalidMagic,
    #[error("unsupported transducer format version {found} (expected {expected})")]
    UnsupportedVersion { expected: u16, found: u16 },
    #[error("file too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("invalid symbol table: {0}")]
    InvalidSymbolTable(String),
    #[error("corrupt transducer table: {0}")]
    CorruptTable(String),
}

/// Read-only view of a weighted transducer.
///
/// Implementations keep each state's arcs sorted by input symbol so that
/// [`arcs_with_input`](Fst::arcs_with_input) can binary search them.
pub trait Fst {
    /// The initial state.
    fn start(&self) -> StateId;

    /// Number of states.
    fn num_states(&self) -> usize;

    /// Final weight of `state`, or `None` if it is not accepting.
    fn final_weight(&self, state: StateId) -> Option<u32>;

    /// All outgoing arcs of `state`, sorted by input symbol.
    fn arcs(&self, state: StateId) -> &[Transition];

    /// Outgoing arcs of `state` whose input symbol is `sym_in`.
    fn arcs_with_input(&self, state: StateId, sym_in: u32) -> &[Transition] {
        let arcs = self.arcs(state);
        let lo = arcs.partition_point(|t| t.sym_in < sym_in);
        let hi = lo + arcs[lo..].partition_point(|t| t.sym_in == sym_in);
        &arcs[lo..hi]
    }
}
