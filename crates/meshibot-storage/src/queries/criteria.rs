// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user search criteria. Exactly one row per registered user.

use meshibot_core::{Criteria, MeshibotError, UserId};
use rusqlite::params;

use crate::database::Database;

/// Load the user's current criteria.
///
/// A missing row is a loud `NotFound`, never a silent empty default: criteria
/// rows are created at registration, so absence means the user skipped it.
pub async fn get(db: &Database, user_id: &UserId) -> Result<Criteria, MeshibotError> {
    let key = user_id.as_str().to_string();
    let result = db
        .connection()
        .call(move |conn| {
            let row = conn.query_row(
                "SELECT date, place, price, freeword FROM criteria WHERE user_id = ?1",
                params![key],
                |row| {
                    Ok(Criteria {
                        date: row.get(0)?,
                        place: row.get(1)?,
                        price: row.get(2)?,
                        freeword: row.get(3)?,
                    })
                },
            );
            match row {
                Ok(criteria) => Ok(Some(criteria)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    result.ok_or_else(|| MeshibotError::NotFound {
        entity: "criteria",
        key: user_id.as_str().to_string(),
    })
}

/// Overwrite the user's criteria with the merged state.
pub async fn set(
    db: &Database,
    user_id: &UserId,
    criteria: &Criteria,
) -> Result<(), MeshibotError> {
    let key = user_id.as_str().to_string();
    let criteria = criteria.clone();
    let changed = db
        .connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE criteria SET date = ?2, place = ?3, price = ?4, freeword = ?5
                 WHERE user_id = ?1",
                params![
                    key,
                    criteria.date,
                    criteria.place,
                    criteria.price,
                    criteria.freeword
                ],
            )?;
            Ok(n)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    if changed == 0 {
        return Err(MeshibotError::NotFound {
            entity: "criteria",
            key: user_id.as_str().to_string(),
        });
    }
    Ok(())
}
