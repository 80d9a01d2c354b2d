//! Approximate string matching against the rule vocabulary.
//!
//! - [`distance`] -- Levenshtein distance and normalized similarity
//! - [`corrector`] -- Nearest-pattern lookup and token-level correction

pub mod corrector;
pub mod distance;

pub use corrector::FuzzyCorrector;
pub use distance::{levenshtein, similarity};
