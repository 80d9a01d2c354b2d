// Character classification for romanized input.

// ---------------------------------------------------------------------------
// Character type classification
// ---------------------------------------------------------------------------

/// Character type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharType {
    /// Any character outside the classes below, including letters of
    /// scripts other than Latin.
    Unknown,
    /// ASCII letter, the romanized input alphabet.
    Letter,
    Digit,
    Whitespace,
    Punctuation,
}

/// Returns the character type for a given character.
///
/// Only ASCII letters count as [`CharType::Letter`]: romanized input is
/// ASCII after case folding, and anything else is surfaced to the caller
/// rather than silently accepted.
pub fn get_char_type(c: char) -> CharType {
    if c.is_ascii_alphabetic() {
        return CharType::Letter;
    }
    if c.is_ascii_digit() {
        return CharType::Digit;
    }
    if is_whitespace(c) {
        return CharType::Whitespace;
    }
    if is_punctuation(c) {
        return CharType::Punctuation;
    }
    CharType::Unknown
}

/// Check whether a character is punctuation that the preprocessor detaches
/// from words before transliteration.
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{2018}' // LEFT SINGLE QUOTATION MARK
                | '\u{2019}' // RIGHT SINGLE QUOTATION MARK
                | '\u{201C}' // LEFT DOUBLE QUOTATION MARK
                | '\u{201D}' // RIGHT DOUBLE QUOTATION MARK
                | '\u{2013}' // EN DASH
                | '\u{2014}' // EM DASH
                | '\u{2026}' // HORIZONTAL ELLIPSIS
        )
}

/// Check whether a character is whitespace.
pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// Convert a character to its simple lowercase equivalent.
///
/// Characters with multi-character lowercase expansions keep only the first
/// character, so folding never changes the character count of a string.
pub fn simple_lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Lowercase a string one character at a time (see [`simple_lower`]).
pub fn fold_case(s: &str) -> String {
    s.chars().map(simple_lower).collect()
}

/// Number of non-whitespace characters in `s`.
pub fn count_non_space(s: &str) -> usize {
    s.chars().filter(|&c| !is_whitespace(c)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_type_letters() {
        assert_eq!(get_char_type('A'), CharType::Letter);
        assert_eq!(get_char_type('z'), CharType::Letter);
    }

    #[test]
    fn char_type_non_latin_is_unknown() {
        assert_eq!(get_char_type('\u{0DB8}'), CharType::Unknown); // SINHALA MA
        assert_eq!(get_char_type('\u{00E9}'), CharType::Unknown);
    }

    #[test]
    fn char_type_digits_whitespace_punct() {
        assert_eq!(get_char_type('7'), CharType::Digit);
        assert_eq!(get_char_type(' '), CharType::Whitespace);
        assert_eq!(get_char_type('\t'), CharType::Whitespace);
        assert_eq!(get_char_type('!'), CharType::Punctuation);
        assert_eq!(get_char_type('\u{2026}'), CharType::Punctuation);
    }

    #[test]
    fn fold_case_keeps_length() {
        assert_eq!(fold_case("MaMa"), "mama");
        assert_eq!(fold_case("\u{0130}x").chars().count(), 2);
    }

    #[test]
    fn count_non_space_ignores_all_whitespace() {
        assert_eq!(count_non_space("mama  xyz\tyanawa"), 13);
        assert_eq!(count_non_space("   "), 0);
    }
}
