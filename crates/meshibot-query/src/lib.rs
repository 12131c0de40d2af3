// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-text criteria parsing engine.
//!
//! Users describe search criteria with single-character marks anywhere in
//! a message (`/date +place ¥price =freeword`). This crate folds the text
//! into canonical half-width form, extracts one segment per mark
//! independent of the order marks appear, and merges the result against
//! the previous criteria. All functions here are total and perform no I/O.

pub mod budget;
pub mod marks;
pub mod merge;
pub mod normalize;
pub mod tokenizer;

pub use budget::budget_bounds;
pub use marks::{has_any_mark, Mark, QUERY_MARKS};
pub use merge::merge;
pub use normalize::normalize;
pub use tokenizer::split_criteria;
