// Input/output segment correspondence.

use serde::Serialize;

/// A segment of input paired with the output it maps to.
///
/// Characters with no covering rule appear as single-character segments
/// whose output equals the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignedSegment {
    pub input: String,
    pub output: String,
}

impl AlignedSegment {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Pass-through segment for a character with no covering rule.
    pub fn passthrough(c: char) -> Self {
        let s = c.to_string();
        Self {
            input: s.clone(),
            output: s,
        }
    }
}

impl From<(&str, &str)> for AlignedSegment {
    fn from((input, output): (&str, &str)) -> Self {
        Self::new(input, output)
    }
}
