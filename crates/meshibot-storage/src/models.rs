// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types returned by the query modules.

use meshibot_core::{ShopId, UserId};

/// One queued result-feed entry.
///
/// `key` is the autoincrement rowid; delivery order follows it, so entries
/// pop in the order the search produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub key: i64,
    pub user_id: UserId,
    pub shop_id: ShopId,
}
