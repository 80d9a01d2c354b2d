// Symbol table: char-to-index and index-to-string mapping.

use std::collections::BTreeSet;

use crate::{EPSILON, FstError};
use hashbrown::HashMap;

/// Symbol table of a compiled transducer.
///
/// Index 0 is epsilon (the empty string). Every other symbol is exactly one
/// character, and symbols are stored in ascending character order, so the
/// table is a deterministic function of the character set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    /// Maps symbol index to its string representation.
    pub symbol_strings: Vec<String>,
    /// Maps a character to its symbol index.
    pub char_to_symbol: HashMap<char, u32>,
}

impl SymbolTable {
    /// Build a table from a set of characters.
    ///
    /// Returns `None` when the set does not fit a 16-bit symbol count.
    pub fn from_chars(chars: &BTreeSet<char>) -> Option<Self> {
        if chars.len() + 1 > u16::MAX as usize {
            return None;
        }
        let mut symbol_strings = Vec::with_capacity(chars.len() + 1);
        let mut char_to_symbol = HashMap::with_capacity(chars.len());
        symbol_strings.push(String::new());
        for (i, &c) in chars.iter().enumerate() {
            symbol_strings.push(c.to_string());
            char_to_symbol.insert(c, i as u32 + 1);
        }
        Some(Self {
            symbol_strings,
            char_to_symbol,
        })
    }

    /// Number of symbols including epsilon.
    pub fn len(&self) -> usize {
        self.symbol_strings.len()
    }

    /// Whether the table holds only epsilon.
    pub fn is_empty(&self) -> bool {
        self.symbol_strings.len() <= 1
    }

    /// Symbol index for `c`, if `c` occurs in any rule.
    #[inline]
    pub fn symbol_for(&self, c: char) -> Option<u32> {
        self.char_to_symbol.get(&c).copied()
    }

    /// String for a symbol index. Epsilon and unknown indices yield `""`.
    #[inline]
    pub fn symbol_str(&self, sym: u32) -> &str {
        self.symbol_strings
            .get(sym as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Concatenate the strings of `syms`, skipping epsilon.
    pub fn render(&self, syms: &[u32]) -> String {
        let mut out = String::with_capacity(syms.len() * 3);
        for &s in syms {
            if s != EPSILON {
                out.push_str(self.symbol_str(s));
            }
        }
        out
    }

    /// Serialize as a u16 count followed by NUL-terminated UTF-8 strings.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&(self.symbol_strings.len() as u16).to_le_bytes());
        for s in &self.symbol_strings {
            buf.extend_from_slice(s.as_bytes());
            buf.push(0);
        }
    }
}

/// Parse the symbol table from artifact data starting at `offset`.
///
/// Returns the parsed table and the byte offset immediately after it (before
/// padding). The caller aligns this offset to the table boundary.
pub fn parse_symbol_table(data: &[u8], offset: usize) -> Result<(SymbolTable, usize), FstError> {
    if offset + 2 > data.len() {
        return Err(FstError::TooShort {
            expected: offset + 2,
            actual: data.len(),
        });
    }

    let symbol_count = u16::from_le_bytes([data[offset], data[offset + 1]]);
    if symbol_count == 0 {
        return Err(FstError::InvalidSymbolTable(
            "missing epsilon symbol".to_string(),
        ));
    }
    let mut pos = offset + 2;

    let mut symbol_strings = Vec::with_capacity(symbol_count as usize);
    let mut char_to_symbol = HashMap::with_capacity(symbol_count as usize);

    for i in 0..symbol_count {
        let str_start = pos;
        while pos < data.len() && data[pos] != 0 {
            pos += 1;
        }
        if pos >= data.len() {
            return Err(FstError::InvalidSymbolTable(
                "unterminated symbol string".to_string(),
            ));
        }
        let symbol_bytes = &data[str_start..pos];
        pos += 1; // skip NUL

        if i == 0 {
            if !symbol_bytes.is_empty() {
                return Err(FstError::InvalidSymbolTable(
                    "symbol 0 must be epsilon".to_string(),
                ));
            }
            symbol_strings.push(String::new());
            continue;
        }

        let symbol_str = std::str::from_utf8(symbol_bytes).map_err(|_| {
            FstError::InvalidSymbolTable(format!("invalid UTF-8 in symbol {i}"))
        })?;
        let mut chars = symbol_str.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return Err(FstError::InvalidSymbolTable(format!(
                "symbol {i} is not a single character"
            )));
        };
        if char_to_symbol.insert(ch, i as u32).is_some() {
            return Err(FstError::InvalidSymbolTable(format!(
                "duplicate symbol {ch:?}"
            )));
        }
        symbol_strings.push(symbol_str.to_string());
    }

    Ok((
        SymbolTable {
            symbol_strings,
            char_to_symbol,
        },
        pos,
    ))
}
