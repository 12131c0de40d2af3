// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user result feed queue.
//!
//! A search replaces the user's queue wholesale; delivery then pops batches
//! in insertion order. Popping does not delete -- the caller commits the
//! batch explicitly once the reply has been handed to the sink, so a crash
//! between pop and send redelivers instead of dropping results.

use meshibot_core::{MeshibotError, ShopId, UserId};
use rusqlite::params;

use crate::database::Database;
use crate::models::FeedEntry;

/// Replace the user's queue with a fresh result set.
///
/// Atomic: the old queue is cleared and the new ids inserted in one
/// transaction, so a concurrent pop sees either the old queue or the new
/// one. Duplicate ids within `shop_ids` collapse to the first occurrence.
pub async fn replace(
    db: &Database,
    user_id: &UserId,
    shop_ids: &[ShopId],
) -> Result<(), MeshibotError> {
    let user_id = user_id.as_str().to_string();
    let shop_ids: Vec<String> = shop_ids.iter().map(|s| s.as_str().to_string()).collect();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM feed_queue WHERE user_id = ?1", params![user_id])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT OR IGNORE INTO feed_queue (user_id, shop_id) VALUES (?1, ?2)",
                )?;
                for shop_id in &shop_ids {
                    stmt.execute(params![user_id, shop_id])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Peek at the next `limit` entries in insertion order without removing them.
pub async fn pop_batch(
    db: &Database,
    user_id: &UserId,
    limit: usize,
) -> Result<Vec<FeedEntry>, MeshibotError> {
    let key = user_id.as_str().to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, shop_id FROM feed_queue
                 WHERE user_id = ?1
                 ORDER BY id ASC
                 LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![key, limit as i64], |row| {
                Ok(FeedEntry {
                    key: row.get(0)?,
                    user_id: UserId(row.get(1)?),
                    shop_id: ShopId(row.get(2)?),
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Commit a delivered batch by deleting its entries.
pub async fn delete_keys(db: &Database, keys: &[i64]) -> Result<(), MeshibotError> {
    let keys = keys.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare("DELETE FROM feed_queue WHERE id = ?1")?;
                for key in &keys {
                    stmt.execute(params![key])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Drop the user's entire queue.
pub async fn delete_all(db: &Database, user_id: &UserId) -> Result<(), MeshibotError> {
    let user_id = user_id.as_str().to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM feed_queue WHERE user_id = ?1", params![user_id])?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Whether any undelivered entries remain for the user.
pub async fn has_any(db: &Database, user_id: &UserId) -> Result<bool, MeshibotError> {
    let user_id = user_id.as_str().to_string();
    db.connection()
        .call(move |conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM feed_queue WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
