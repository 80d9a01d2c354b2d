//! Shared value types for the Singlish transliteration engine.
//!
//! Nothing in this crate runs a transducer. It holds the records that flow
//! between the automaton crate, the engine crate and its callers:
//!
//! - [`rule`] -- rewrite rules and their priority order
//! - [`hypothesis`] -- ranked transliteration outputs and confidence scoring
//! - [`oov`] -- out-of-vocabulary coverage reports
//! - [`correction`] -- fuzzy spelling corrections
//! - [`alignment`] -- input/output segment correspondence
//! - [`character`] -- character classification used by tokenization

pub mod alignment;
pub mod character;
pub mod correction;
pub mod hypothesis;
pub mod oov;
pub mod rule;

pub use alignment::AlignedSegment;
pub use correction::{Correction, CorrectionResult};
pub use hypothesis::Hypothesis;
pub use oov::OovReport;
pub use rule::Rule;
