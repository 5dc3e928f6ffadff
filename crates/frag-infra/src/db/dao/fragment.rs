use anyhow::{Context, Result};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::db::models::FragmentRow;
use crate::db::schema::fragments;

/// Insert or replace a fragment row (upsert by primary key).
pub fn upsert_fragment(conn: &mut SqliteConnection, row: &FragmentRow) -> Result<()> {
    diesel::replace_into(fragments::table)
        .values(row)
        .execute(conn)
        .context("Failed to upsert fragment record")?;
    Ok(())
}

/// Fetch one fragment row by id.
pub fn get_fragment_by_id(conn: &mut SqliteConnection, id: &str) -> Result<Option<FragmentRow>> {
    let row = fragments::table
        .find(id)
        .select(FragmentRow::as_select())
        .first(conn)
        .optional()
        .context("Failed to get fragment record by id")?;
    Ok(row)
}

/// All rows for one owner. Ordered by creation time, which matches
/// insertion order because updates never re-create rows; id breaks ties
/// between same-millisecond creations so the order stays deterministic.
pub fn list_fragments_by_owner(
    conn: &mut SqliteConnection,
    owner_key_hex: &str,
) -> Result<Vec<FragmentRow>> {
    let rows = fragments::table
        .filter(fragments::owner_key.eq(owner_key_hex))
        .order(fragments::created_at.asc())
        .then_order_by(fragments::id.asc())
        .select(FragmentRow::as_select())
        .load(conn)
        .context("Failed to list fragment records by owner")?;
    Ok(rows)
}

/// Delete one fragment row by id, returning the removed row if it
/// existed.
pub fn delete_fragment_by_id(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<FragmentRow>> {
    let existing = get_fragment_by_id(conn, id)?;
    if existing.is_some() {
        diesel::delete(fragments::table.find(id))
            .execute(conn)
            .context("Failed to delete fragment record")?;
    }
    Ok(existing)
}
