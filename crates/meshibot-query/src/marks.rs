// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The delimiter marks that open criteria segments in free text.

/// A single delimiter mark and its space-handling rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    /// The delimiter character.
    pub symbol: char,
    /// When false the segment is truncated at the first space; when true
    /// spaces are retained and only a line break ends the segment.
    pub preserve_spaces: bool,
}

/// The four marks in criteria field order: date, place, price, freeword.
/// Only the freeword segment keeps internal spaces (multi-keyword search).
pub const QUERY_MARKS: [Mark; 4] = [
    Mark {
        symbol: '/',
        preserve_spaces: false,
    },
    Mark {
        symbol: '+',
        preserve_spaces: false,
    },
    Mark {
        symbol: '¥',
        preserve_spaces: false,
    },
    Mark {
        symbol: '=',
        preserve_spaces: true,
    },
];

/// True iff any mark character occurs anywhere in the text. Messages
/// without a mark are not criteria updates and are ignored upstream.
pub fn has_any_mark(text: &str, marks: &[Mark]) -> bool {
    text.chars().any(|c| marks.iter().any(|m| m.symbol == c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_any_mark() {
        assert!(has_any_mark("+新橋", &QUERY_MARKS));
        assert!(has_any_mark("焼肉=", &QUERY_MARKS));
        assert!(has_any_mark("¥3000で頼む", &QUERY_MARKS));
    }

    #[test]
    fn plain_text_has_no_mark() {
        assert!(!has_any_mark("こんにちは", &QUERY_MARKS));
        assert!(!has_any_mark("", &QUERY_MARKS));
    }
}
