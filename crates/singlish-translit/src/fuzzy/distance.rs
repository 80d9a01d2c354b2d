// Levenshtein edit distance with a rolling two-row table.

/// Edit distance over character slices.
///
/// Insertion, deletion and substitution each cost one. Runs in
/// `O(a.len() * b.len())` time and keeps one row of the shorter input.
pub fn levenshtein_chars(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let n = short.len();
    if n == 0 {
        return long.len();
    }

    let mut prev_row: Vec<usize> = (0..=n).collect();
    let mut curr_row = vec![0; n + 1];

    for (i, &lc) in long.iter().enumerate() {
        curr_row[0] = i + 1;
        for j in 1..=n {
            let cost = usize::from(lc != short[j - 1]);
            curr_row[j] = (prev_row[j] + 1) // deletion
                .min(curr_row[j - 1] + 1) // insertion
                .min(prev_row[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[n]
}

/// Edit distance between two strings, counted in characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    levenshtein_chars(&a, &b)
}

/// Similarity in `[0, 1]`: `1 - distance / max(len(a), len(b))`.
///
/// Two empty strings are identical and score 1.0.
pub fn similarity_chars(a: &[char], b: &[char]) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_chars(a, b) as f64 / max_len as f64
}

/// Similarity of two strings (see [`similarity_chars`]).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    similarity_chars(&a, &b)
}
