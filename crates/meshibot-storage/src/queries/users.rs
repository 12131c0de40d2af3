// SPDX-FileCopyrightText: 2026 Meshibot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User registration.

use meshibot_core::{MeshibotError, UserId};
use rusqlite::params;

use crate::database::Database;

/// Register a user if unknown, together with an empty criteria row.
///
/// Idempotent: both inserts are OR IGNORE, so repeated events from the same
/// sender are harmless. Returns `true` when the user was newly created,
/// which the caller uses to decide whether to send the onboarding tutorial.
pub async fn ensure(db: &Database, user_id: &UserId) -> Result<bool, MeshibotError> {
    let user_id = user_id.as_str().to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let created = tx.execute(
                "INSERT OR IGNORE INTO users (id) VALUES (?1)",
                params![user_id],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO criteria (user_id) VALUES (?1)",
                params![user_id],
            )?;
            tx.commit()?;
            Ok(created > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Whether the user is already registered.
pub async fn exists(db: &Database, user_id: &UserId) -> Result<bool, MeshibotError> {
    let user_id = user_id.as_str().to_string();
    db.connection()
        .call(move |conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE id = ?1",
                params![user_id],
                |row| row.get(0),
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
