// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical half-width folding of inbound text.

use unicode_normalization::UnicodeNormalization;

/// The currency-symbol family that NFKC does not fold onto the price
/// mark. Mapped to `¥` before generic folding.
const YEN_FAMILY: [char; 3] = ['＼', '\\', '￥'];

/// Fold a raw message into canonical form: line breaks removed, the yen
/// family mapped to `¥`, then NFKC compatibility folding (full-width
/// ASCII and digits to half-width, ideographic space to space).
///
/// Total over any input and idempotent.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .map(|c| if YEN_FAMILY.contains(&c) { '¥' } else { c })
        .nfkc()
        .collect()
}
