// Greedy longest-match alignment of input segments to rule outputs.

use singlish_core::AlignedSegment;

use crate::rules::RuleTable;

/// Alignment over a borrowed rule table with a fixed lookahead.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentExtractor<'a> {
    table: &'a RuleTable,
    lookahead: usize,
}

impl<'a> AlignmentExtractor<'a> {
    pub fn new(table: &'a RuleTable, lookahead: usize) -> Self {
        Self { table, lookahead }
    }

    pub fn align(&self, text: &str) -> Vec<AlignedSegment> {
        align(self.table, text, self.lookahead)
    }
}

/// Segment `text` by repeatedly taking the longest prefix (up to
/// `lookahead` characters) that is exactly a rule pattern.
///
/// A character that starts no pattern becomes a pass-through segment whose
/// output equals its input. The scan is independent of the transducer's
/// chosen path: when several decompositions have equal cost the two views
/// can disagree, and this one is meant for diagnostics only.
pub fn align(table: &RuleTable, text: &str, lookahead: usize) -> Vec<AlignedSegment> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let max_len = lookahead.min(table.max_pattern_len()).max(1);
    let mut segments = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let start = chars[i].0;
        let longest = max_len.min(chars.len() - i);
        let matched = (1..=longest).rev().find_map(|len| {
            let end = chars.get(i + len).map_or(text.len(), |&(b, _)| b);
            let segment = &text[start..end];
            table.get(segment).map(|out| (len, segment, out))
        });

        match matched {
            Some((len, segment, out)) => {
                segments.push(AlignedSegment::new(segment, out));
                i += len;
            }
            None => {
                segments.push(AlignedSegment::passthrough(chars[i].1));
                i += 1;
            }
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RuleTable {
        RuleTable::from_json_str(
            r#"{"mama": "මම", "gedara": "ගෙදර", "ma": "ම", "m": "ම්", "a": "අ"}"#,
        )
        .unwrap()
    }

    fn pairs(segments: &[AlignedSegment]) -> Vec<(&str, &str)> {
        segments
            .iter()
            .map(|s| (s.input.as_str(), s.output.as_str()))
            .collect()
    }

    #[test]
    fn whole_words_and_spaces() {
        let segs = align(&table(), "mama gedara", 20);
        assert_eq!(
            pairs(&segs),
            vec![
                ("mama", "\u{0DB8}\u{0DB8}"),
                (" ", " "),
                ("gedara", "\u{0D9C}\u{0DD9}\u{0DAF}\u{0DBB}"),
            ]
        );
    }

    #[test]
    fn longest_prefix_then_shorter() {
        let segs = align(&table(), "mamam", 20);
        assert_eq!(
            pairs(&segs),
            vec![("mama", "\u{0DB8}\u{0DB8}"), ("m", "\u{0DB8}\u{0DCA}")]
        );
    }

    #[test]
    fn unmatched_chars_pass_through() {
        let segs = align(&table(), "mxa", 20);
        assert_eq!(
            pairs(&segs),
            vec![("m", "\u{0DB8}\u{0DCA}"), ("x", "x"), ("a", "\u{0D85}")]
        );
    }

    #[test]
    fn lookahead_limits_match_length() {
        let segs = align(&table(), "mama", 2);
        assert_eq!(pairs(&segs), vec![("ma", "\u{0DB8}"), ("ma", "\u{0DB8}")]);
    }

    #[test]
    fn non_ascii_input() {
        let segs = align(&table(), "\u{00E9}ma", 20);
        assert_eq!(pairs(&segs), vec![("\u{00E9}", "\u{00E9}"), ("ma", "\u{0DB8}")]);
    }

    #[test]
    fn extractor_uses_its_lookahead() {
        let t = table();
        let extractor = AlignmentExtractor::new(&t, 2);
        assert_eq!(extractor.align("mama"), align(&t, "mama", 2));
    }

    #[test]
    fn empty_input() {
        assert!(align(&table(), "", 20).is_empty());
    }
}
