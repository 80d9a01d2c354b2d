// Text normalization before transduction and restoration afterwards.
//
// Raw user text is folded to ASCII, case-folded and split on whitespace. Runs of punctuation
// and digits at either edge of a token are detached and recorded against the
// index of the word they were stuck to; tokens made only of such characters
// are recorded as standalone. The clean text is the remaining words joined
// by single spaces, which is exactly the token structure the engine
// preserves, so restoration can work by token index.

use deunicode::{deunicode_char, deunicode_with_tofu};
use serde::Serialize;
use singlish_core::character::{CharType, fold_case, get_char_type};

/// Where a detached run sat relative to its word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Attachment {
    /// Directly before the word, e.g. `(` in `(mama`.
    Leading,
    /// Directly after the word, e.g. `.` in `yanawa.`.
    Trailing,
    /// A token of its own, placed before the word at `token`.
    Standalone,
}

/// A punctuation or number run removed from the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detached {
    /// Index of the clean token this run belongs to. For standalone runs
    /// this may equal the token count, meaning after the last word.
    pub token: usize,
    pub attachment: Attachment,
    pub text: String,
}

/// Everything `restore` needs to rebuild the surface form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextMetadata {
    pub original_text: String,
    /// Non-ASCII characters were replaced by their ASCII transliteration.
    pub ascii_converted: bool,
    /// In raw-text order.
    pub detached: Vec<Detached>,
    pub warnings: Vec<String>,
}

fn is_detachable(c: char) -> bool {
    matches!(get_char_type(c), CharType::Punctuation | CharType::Digit)
}

/// A raw character that ASCII folding cannot turn into input material.
fn is_unsupported(c: char) -> bool {
    if get_char_type(c) != CharType::Unknown {
        return false;
    }
    match deunicode_char(c) {
        Some(ascii) => ascii
            .chars()
            .any(|f| f == c || get_char_type(f) == CharType::Unknown),
        None => true,
    }
}

/// Clean `raw` for transduction.
///
/// Non-ASCII characters are first replaced by their closest ASCII spelling
/// (`á` becomes `a`); characters with no spelling are dropped and reported.
/// Characters inside a word (between its first and last letter) are kept
/// even when they are punctuation or digits; they surface later as
/// out-of-vocabulary material.
pub fn normalize(raw: &str) -> (String, TextMetadata) {
    let ascii = deunicode_with_tofu(raw, "");
    let ascii_converted = ascii != raw;
    let folded = fold_case(&ascii);
    let mut words: Vec<&str> = Vec::new();
    let mut detached = Vec::new();

    for token in folded.split_whitespace() {
        let Some(first) = token.find(|c: char| !is_detachable(c)) else {
            detached.push(Detached {
                token: words.len(),
                attachment: Attachment::Standalone,
                text: token.to_string(),
            });
            continue;
        };
        let last = token
            .char_indices()
            .rev()
            .find(|&(_, c)| !is_detachable(c))
            .map_or(token.len(), |(i, c)| i + c.len_utf8());

        let index = words.len();
        if first > 0 {
            detached.push(Detached {
                token: index,
                attachment: Attachment::Leading,
                text: token[..first].to_string(),
            });
        }
        if last < token.len() {
            detached.push(Detached {
                token: index,
                attachment: Attachment::Trailing,
                text: token[last..].to_string(),
            });
        }
        words.push(&token[first..last]);
    }

    let mut unsupported: Vec<char> = Vec::new();
    for c in raw.chars() {
        if is_unsupported(c) && !unsupported.contains(&c) {
            unsupported.push(c);
        }
    }
    let mut warnings = Vec::new();
    if ascii_converted {
        warnings.push("Unicode characters detected and converted to ASCII".to_string());
    }
    if !unsupported.is_empty() {
        let list: Vec<String> = unsupported.iter().map(|c| format!("{c:?}")).collect();
        warnings.push(format!("unsupported characters: {}", list.join(", ")));
    }

    let metadata = TextMetadata {
        original_text: raw.to_string(),
        ascii_converted,
        detached,
        warnings,
    };
    (words.join(" "), metadata)
}

/// Re-attach the runs recorded in `metadata` to `text`.
///
/// `text` must keep the token structure of the clean text (words separated
/// by single spaces). Runs recorded against a token index the text no
/// longer has are appended at the end.
pub fn restore(text: &str, metadata: &TextMetadata) -> String {
    let words: Vec<&str> = text.split(' ').filter(|w| !w.is_empty()).collect();
    let mut pieces: Vec<String> = Vec::with_capacity(words.len() + metadata.detached.len());

    for index in 0..=words.len() {
        let at = |kind: Attachment| {
            metadata
                .detached
                .iter()
                .filter(move |d| d.attachment == kind && d.token == index)
                .map(|d| d.text.as_str())
        };
        pieces.extend(at(Attachment::Standalone).map(str::to_string));
        if let Some(word) = words.get(index) {
            let mut piece: String = at(Attachment::Leading).collect();
            piece.push_str(word);
            piece.extend(at(Attachment::Trailing));
            pieces.push(piece);
        }
    }
    pieces.extend(
        metadata
            .detached
            .iter()
            .filter(|d| {
                d.token > words.len()
                    || (d.token == words.len() && d.attachment != Attachment::Standalone)
            })
            .map(|d| d.text.clone()),
    );
    pieces.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_collapses_whitespace() {
        let (clean, meta) = normalize("  Mama\tGEDARA   yanawa \n");
        assert_eq!(clean, "mama gedara yanawa");
        assert!(meta.detached.is_empty());
        assert!(meta.warnings.is_empty());
        assert_eq!(meta.original_text, "  Mama\tGEDARA   yanawa \n");
    }

    #[test]
    fn detaches_edge_punctuation() {
        let (clean, meta) = normalize("(mama) yanawa.");
        assert_eq!(clean, "mama yanawa");
        assert_eq!(
            meta.detached,
            vec![
                Detached { token: 0, attachment: Attachment::Leading, text: "(".into() },
                Detached { token: 0, attachment: Attachment::Trailing, text: ")".into() },
                Detached { token: 1, attachment: Attachment::Trailing, text: ".".into() },
            ]
        );
    }

    #[test]
    fn standalone_numbers() {
        let (clean, meta) = normalize("eyala 5 potha kiyawanawa!");
        assert_eq!(clean, "eyala potha kiyawanawa");
        assert_eq!(meta.detached[0].token, 1);
        assert_eq!(meta.detached[0].attachment, Attachment::Standalone);
        assert_eq!(meta.detached[0].text, "5");
    }

    #[test]
    fn inner_characters_stay_in_word() {
        let (clean, meta) = normalize("don't");
        assert_eq!(clean, "don't");
        assert!(meta.detached.is_empty());
    }

    #[test]
    fn accented_letters_fold_to_ascii() {
        let (clean, meta) = normalize("Mamá gedara yanawa");
        assert_eq!(clean, "mama gedara yanawa");
        assert!(meta.ascii_converted);
        assert_eq!(
            meta.warnings,
            vec!["Unicode characters detected and converted to ASCII"]
        );
        assert_eq!(meta.original_text, "Mamá gedara yanawa");
    }

    #[test]
    fn curly_quotes_fold_and_detach() {
        let (clean, meta) = normalize("\u{201C}mama\u{201D}");
        assert_eq!(clean, "mama");
        assert!(meta.ascii_converted);
        assert_eq!(restore("X", &meta), "\"X\"");
    }

    #[test]
    fn ascii_input_is_not_converted() {
        let (_, meta) = normalize("Mama GEDARA");
        assert!(!meta.ascii_converted);
    }

    #[test]
    fn control_characters_are_unsupported() {
        let (clean, meta) = normalize("ma\u{7}ma");
        assert_eq!(clean, "ma\u{7}ma");
        assert!(!meta.ascii_converted);
        assert_eq!(meta.warnings.len(), 1);
        assert!(meta.warnings[0].starts_with("unsupported characters"));
    }

    #[test]
    fn restore_reattaches_by_token() {
        let raw = "OYA 2 bath, kanawa?";
        let (clean, meta) = normalize(raw);
        assert_eq!(clean, "oya bath kanawa");
        assert_eq!(restore("A B C", &meta), "A 2 B, C?");
    }

    #[test]
    fn restore_trailing_standalone() {
        let (clean, meta) = normalize("mama !!");
        assert_eq!(clean, "mama");
        assert_eq!(restore("X", &meta), "X !!");
    }

    #[test]
    fn only_punctuation() {
        let (clean, meta) = normalize("... 42");
        assert_eq!(clean, "");
        assert_eq!(restore("", &meta), "... 42");
    }

    #[test]
    fn restore_with_fewer_tokens_appends() {
        let (_, meta) = normalize("a b c.");
        assert_eq!(restore("A", &meta), "A .");
    }

    #[test]
    fn restore_without_metadata_is_identity() {
        assert_eq!(restore("x y", &TextMetadata::default()), "x y");
    }
}
