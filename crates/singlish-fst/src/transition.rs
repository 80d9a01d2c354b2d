// State and transition records for the compiled transducer tables.

use bytemuck::{Pod, Zeroable};

/// Weighted transition (16 bytes).
///
/// - `sym_in` (u32): input symbol index, `0` for epsilon
/// - `sym_out` (u32): output symbol index, `0` for epsilon
/// - `target_state` (u32): target state index
/// - `weight` (u16): transition cost
/// - `_reserved` (u16): padding, written as zero
///
/// Within a state, transitions are sorted by `(sym_in, sym_out, target_state)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Transition {
    pub sym_in: u32,
    pub sym_out: u32,
    pub target_state: u32,
    pub weight: u16,
    pub _reserved: u16,
}

impl Transition {
    pub fn new(sym_in: u32, sym_out: u32, target_state: u32, weight: u16) -> Self {
        Self {
            sym_in,
            sym_out,
            target_state,
            weight,
            _reserved: 0,
        }
    }

    #[inline]
    pub fn sort_key(&self) -> (u32, u32, u32) {
        (self.sym_in, self.sym_out, self.target_state)
    }
}

/// Flag bit marking an accepting state.
pub const STATE_FINAL: u32 = 0x1;

/// Per-state entry (16 bytes): a contiguous run in the transition table
/// plus the final weight.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct StateEntry {
    pub first_transition: u32,
    pub transition_count: u32,
    pub final_weight: u32,
    pub flags: u32,
}

impl StateEntry {
    #[inline]
    pub fn is_final(&self) -> bool {
        self.flags & STATE_FINAL != 0
    }

    /// Range of this state's transitions in the transition table.
    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        let first = self.first_transition as usize;
        first..first + self.transition_count as usize
    }
}

/// Table header (16 bytes) preceding the state table.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct TableHeader {
    pub state_count: u32,
    pub transition_count: u32,
    pub start_state: u32,
    pub _reserved: u32,
}

const _: () = assert!(size_of::<Transition>() == 16);
const _: () = assert!(size_of::<StateEntry>() == 16);
const _: () = assert!(size_of::<TableHeader>() == 16);
