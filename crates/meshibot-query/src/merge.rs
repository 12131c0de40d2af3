// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Three-way merge of tokenizer output against previous criteria.

use meshibot_core::types::{Criteria, CriteriaPatch, FieldUpdate};

/// Merge a patch into the previous criteria. Pure function: `Keep` leaves
/// the previous value, `Clear` unsets the field, `Set` replaces it.
pub fn merge(previous: &Criteria, patch: &CriteriaPatch) -> Criteria {
    Criteria {
        date: apply(&previous.date, &patch.date),
        place: apply(&previous.place, &patch.place),
        price: apply(&previous.price, &patch.price),
        freeword: apply(&previous.freeword, &patch.freeword),
    }
}

fn apply(previous: &Option<String>, update: &FieldUpdate) -> Option<String> {
    match update {
        FieldUpdate::Keep => previous.clone(),
        FieldUpdate::Clear => None,
        FieldUpdate::Set(value) => Some(value.clone()),
    }
}
