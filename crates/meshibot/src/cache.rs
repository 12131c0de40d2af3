// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache-or-fetch resolution of shop details.

use std::collections::HashSet;

use meshibot_core::{MeshibotError, ShopId, ShopRecord};
use meshibot_directory::DirectoryClient;
use meshibot_storage::{queries::shops, Database};
use tracing::warn;

/// Resolve details for a batch of shop ids.
///
/// Cached records come first so ids already in the store never wait on
/// network calls; misses are fetched from the directory and upserted. A
/// failed fetch drops that one id from the batch with a warning rather
/// than failing the whole batch. Storage failures still propagate.
pub async fn resolve_many(
    db: &Database,
    client: &DirectoryClient,
    shop_ids: &[ShopId],
) -> Result<Vec<ShopRecord>, MeshibotError> {
    let mut records = shops::get_many(db, shop_ids).await?;
    let registered: HashSet<String> = records
        .iter()
        .map(|r| r.id.as_str().to_string())
        .collect();

    for shop_id in shop_ids {
        if registered.contains(shop_id.as_str()) {
            continue;
        }
        match client.fetch_detail(shop_id).await {
            Ok(record) => {
                shops::upsert(db, &record).await?;
                records.push(record);
            }
            Err(e) => {
                warn!(shop_id = %shop_id, error = %e, "dropping shop from batch");
            }
        }
    }

    Ok(records)
}
