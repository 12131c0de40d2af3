// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget bracket table for the directory's fixed price bands.
//!
//! The directory only accepts searches over predefined price bands, so a
//! literal yen amount is widened to a `(lower, upper)` pair: the upper
//! bound is the tightest band ceiling above the amount, and the lower
//! bound reaches `grade_range` bands further down for slack.

use meshibot_core::MeshibotError;

const BRACKET_CEILINGS: [u32; 12] = [
    500, 1000, 1500, 2000, 3000, 4000, 5000, 7000, 10000, 15000, 20000, 30000,
];
const BRACKET_FLOORS: [u32; 12] = [
    1, 501, 1001, 1501, 2001, 3001, 4001, 5001, 7001, 10001, 15001, 20001,
];

/// Widen a literal price to `(lower, upper)` bracket bounds.
///
/// Fails with a user-facing validation message when the input is not a
/// number or falls outside the bracket table.
pub fn budget_bounds(price: &str, grade_range: usize) -> Result<(u32, u32), MeshibotError> {
    let value: u32 = price.trim().parse().map_err(|_| {
        MeshibotError::Validation(format!("予算は半角数字で指定してください: {price}"))
    })?;

    if value < BRACKET_FLOORS[0] {
        return Err(MeshibotError::Validation(format!(
            "{}円以上の金額を指定してください",
            BRACKET_FLOORS[0]
        )));
    }
    if value >= BRACKET_CEILINGS[BRACKET_CEILINGS.len() - 1] {
        return Err(MeshibotError::Validation(format!(
            "{}円以下の金額を指定してください",
            BRACKET_CEILINGS[BRACKET_CEILINGS.len() - 1]
        )));
    }

    // Tightest ceiling strictly above the amount. The range checks above
    // guarantee both lookups succeed.
    let upper = BRACKET_CEILINGS
        .iter()
        .copied()
        .find(|&ceiling| ceiling > value)
        .ok_or_else(|| MeshibotError::Internal("bracket table exhausted".into()))?;

    // Highest floor at or below the amount, then step grade_range bands
    // down (clamped at the bottom of the table).
    let floor_index = BRACKET_FLOORS
        .iter()
        .rposition(|&floor| floor <= value)
        .ok_or_else(|| MeshibotError::Internal("bracket table exhausted".into()))?;
    let lower = BRACKET_FLOORS[floor_index.saturating_sub(grade_range)];

    Ok((lower, upper))
}
