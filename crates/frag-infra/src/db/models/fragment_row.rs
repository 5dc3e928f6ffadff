use anyhow::{Context, Result};
use chrono::DateTime;
use diesel::prelude::*;

use frag_core::{FragmentId, FragmentRecord, OwnerKey};

/// Row shape of the `fragments` table. Timestamps are millisecond epoch
/// values; the owner key is persisted in its canonical hex form.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::db::schema::fragments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FragmentRow {
    pub id: String,
    pub owner_key: String,
    pub content_type: String,
    pub size: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl FragmentRow {
    pub fn from_record(record: &FragmentRecord) -> Self {
        Self {
            id: record.id.as_str().to_string(),
            owner_key: record.owner_key.to_hex(),
            content_type: record.content_type.clone(),
            size: record.size as i64,
            created_at: record.created.timestamp_millis(),
            updated_at: record.updated.timestamp_millis(),
        }
    }

    pub fn into_record(self) -> Result<FragmentRecord> {
        let owner_key =
            OwnerKey::from_hex(&self.owner_key).context("malformed owner_key column")?;
        let created = DateTime::from_timestamp_millis(self.created_at)
            .context("created_at out of range")?;
        let updated = DateTime::from_timestamp_millis(self.updated_at)
            .context("updated_at out of range")?;

        Ok(FragmentRecord {
            id: FragmentId::from_string(self.id),
            owner_key,
            created,
            updated,
            content_type: self.content_type,
            size: self.size as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn record_round_trips_through_the_row_shape() {
        // timestamp_millis truncates sub-millisecond precision, so start
        // from a millisecond-aligned instant
        let now = DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap();
        let record = FragmentRecord::new(
            FragmentId::from("frag-1"),
            OwnerKey::derive("user1@example.com"),
            "text/markdown",
            11,
            now,
        );

        let back = FragmentRow::from_record(&record).into_record().unwrap();
        assert_eq!(back, record);
    }
}
