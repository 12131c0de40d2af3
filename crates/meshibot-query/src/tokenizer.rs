// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order-independent mark-delimited segment extraction.
//!
//! Marks may appear in any order in the message; the output is always
//! aligned to the declared mark order. Implemented as an explicit
//! index-sort-and-walk rather than sequential scanning so that
//! `¥2500/20230831+新橋=海鮮 個室` parses the same as the marks written
//! in declaration order.

use meshibot_core::types::{CriteriaPatch, FieldUpdate};

use crate::marks::{Mark, QUERY_MARKS};

/// Split canonical text into a patch over the four criteria fields.
pub fn split_criteria(text: &str) -> CriteriaPatch {
    let slots = tokenize(text, &QUERY_MARKS);
    let [date, place, price, freeword] = slots;
    CriteriaPatch {
        date,
        place,
        price,
        freeword,
    }
}

/// Core tokenizer over an arbitrary four-mark table. Output slots are
/// aligned to the mark table's order, not the order marks occur in text.
pub fn tokenize(text: &str, marks: &[Mark; 4]) -> [FieldUpdate; 4] {
    let chars: Vec<char> = text.chars().collect();

    // First occurrence of each mark (char index), absent marks as -1 so
    // they sort to the front and present marks stay contiguous at the end.
    let mut positions: Vec<(isize, bool)> = marks
        .iter()
        .map(|mark| {
            let index = chars
                .iter()
                .position(|&c| c == mark.symbol)
                .map_or(-1, |i| i as isize);
            (index, mark.preserve_spaces)
        })
        .collect();
    positions.sort_unstable();

    // Walk the sorted positions; each present mark's segment runs from
    // just after its index to just before the next sorted index (or end
    // of text for the last one).
    let mut segments: Vec<FieldUpdate> = Vec::with_capacity(positions.len());
    for (order, &(index, preserve_spaces)) in positions.iter().enumerate() {
        if index < 0 {
            segments.push(FieldUpdate::Keep);
            continue;
        }
        let start = index as usize + 1;
        let end = positions
            .get(order + 1)
            .map_or(chars.len(), |&(next, _)| next as usize);
        let raw: String = chars[start..end].iter().collect();
        segments.push(extract_segment(&raw, preserve_spaces));
    }

    // Re-project each segment onto the declared mark order via the mark
    // character recovered at its occurrence index.
    let mut slots: [FieldUpdate; 4] = Default::default();
    for (order, &(index, _)) in positions.iter().enumerate() {
        if index < 0 {
            continue;
        }
        let symbol = chars[index as usize];
        if let Some(slot) = marks.iter().position(|m| m.symbol == symbol) {
            slots[slot] = segments[order].clone();
        }
    }
    slots
}

/// Trim a raw segment to its effective content. Without `preserve_spaces`
/// the segment ends at the first space or line break; with it, only at a
/// line break. An empty result means the user asked to clear the field.
fn extract_segment(raw: &str, preserve_spaces: bool) -> FieldUpdate {
    let cut = if preserve_spaces {
        raw.split(['\n']).next().unwrap_or("")
    } else {
        raw.split([' ', '\n']).next().unwrap_or("")
    };
    if cut.trim().is_empty() {
        FieldUpdate::Clear
    } else {
        FieldUpdate::Set(cut.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marks::has_any_mark;

    fn set(s: &str) -> FieldUpdate {
        FieldUpdate::Set(s.to_string())
    }

    #[test]
    fn no_marks_yields_all_keep() {
        let text = "今日は暑いですね";
        assert!(!has_any_mark(text, &QUERY_MARKS));
        let patch = split_criteria(text);
        assert!(patch.is_noop());
    }

    #[test]
    fn adjacent_marks_all_clear() {
        let marks = [
            Mark { symbol: '#', preserve_spaces: false },
            Mark { symbol: '@', preserve_spaces: false },
            Mark { symbol: '¥', preserve_spaces: false },
            Mark { symbol: '*', preserve_spaces: true },
        ];
        let slots = tokenize("#@¥*", &marks);
        assert_eq!(
            slots,
            [
                FieldUpdate::Clear,
                FieldUpdate::Clear,
                FieldUpdate::Clear,
                FieldUpdate::Clear
            ]
        );
    }

    #[test]
    fn output_is_independent_of_mark_order_in_text() {
        // Price mark first in the text, date second, place third,
        // freeword last -- output must still align to field order.
        let patch = split_criteria("¥2500/20230831+新橋=海鮮 個室");
        assert_eq!(patch.date, set("20230831"));
        assert_eq!(patch.place, set("新橋"));
        assert_eq!(patch.price, set("2500"));
        assert_eq!(patch.freeword, set("海鮮 個室"));
    }

    #[test]
    fn absent_marks_keep_previous_value() {
        let patch = split_criteria("+新橋");
        assert_eq!(patch.date, FieldUpdate::Keep);
        assert_eq!(patch.place, set("新橋"));
        assert_eq!(patch.price, FieldUpdate::Keep);
        assert_eq!(patch.freeword, FieldUpdate::Keep);
    }

    #[test]
    fn mark_with_only_space_clears() {
        // "+ " -- place mark followed by a space and the next mark.
        let patch = split_criteria("+ ¥3000");
        assert_eq!(patch.place, FieldUpdate::Clear);
        assert_eq!(patch.price, set("3000"));
    }

    #[test]
    fn space_truncates_non_preserving_segments() {
        let patch = split_criteria("+新橋 有楽町");
        assert_eq!(patch.place, set("新橋"));
    }

    #[test]
    fn freeword_keeps_internal_spaces() {
        let patch = split_criteria("=ワイン ステーキ");
        assert_eq!(patch.freeword, set("ワイン ステーキ"));
    }

    #[test]
    fn line_break_truncates_even_preserving_segments() {
        let patch = split_criteria("=海鮮 個室\nおまけ");
        assert_eq!(patch.freeword, set("海鮮 個室"));
    }

    #[test]
    fn trailing_mark_at_end_of_text_clears() {
        let patch = split_criteria("+新橋/");
        assert_eq!(patch.place, set("新橋"));
        assert_eq!(patch.date, FieldUpdate::Clear);
    }
}
