// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable shop-detail cache.

use meshibot_core::{MeshibotError, ShopId, ShopRecord};
use rusqlite::params;

use crate::database::Database;

fn record_from_row(row: &rusqlite::Row<'_>) -> Result<ShopRecord, rusqlite::Error> {
    Ok(ShopRecord {
        id: ShopId(row.get(0)?),
        name: row.get(1)?,
        image_url: row.get(2)?,
        access: row.get(3)?,
        affiliate_url: row.get(4)?,
        review_score: row.get(5)?,
        review_quantity: row.get(6)?,
    })
}

/// Look up a single cached record.
pub async fn get(db: &Database, shop_id: &ShopId) -> Result<Option<ShopRecord>, MeshibotError> {
    let key = shop_id.as_str().to_string();
    db.connection()
        .call(move |conn| {
            let row = conn.query_row(
                "SELECT id, name, image_url, access, affiliate_url,
                        review_score, review_quantity
                 FROM shops WHERE id = ?1",
                params![key],
                record_from_row,
            );
            match row {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Look up every cached record among `shop_ids`, preserving input order.
/// Missing ids are simply absent from the result.
pub async fn get_many(
    db: &Database,
    shop_ids: &[ShopId],
) -> Result<Vec<ShopRecord>, MeshibotError> {
    let keys: Vec<String> = shop_ids.iter().map(|s| s.as_str().to_string()).collect();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, image_url, access, affiliate_url,
                        review_score, review_quantity
                 FROM shops WHERE id = ?1",
            )?;
            let mut records = Vec::new();
            for key in &keys {
                match stmt.query_row(params![key], record_from_row) {
                    Ok(record) => records.push(record),
                    Err(rusqlite::Error::QueryReturnedNoRows) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(records)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or refresh a cached record.
pub async fn upsert(db: &Database, record: &ShopRecord) -> Result<(), MeshibotError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO shops (id, name, image_url, access, affiliate_url,
                                    review_score, review_quantity)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT (id) DO UPDATE SET
                     name = excluded.name,
                     image_url = excluded.image_url,
                     access = excluded.access,
                     affiliate_url = excluded.affiliate_url,
                     review_score = excluded.review_score,
                     review_quantity = excluded.review_quantity",
                params![
                    record.id.as_str(),
                    record.name,
                    record.image_url,
                    record.access,
                    record.affiliate_url,
                    record.review_score,
                    record.review_quantity
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
