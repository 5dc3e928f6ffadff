use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fragment::{BlobKey, OwnerKey};
use crate::ids::FragmentId;

/// Metadata describing one stored fragment.
///
/// Paired one-to-one with a blob at the same `(owner_key, id)` key;
/// `size` always equals that blob's byte length. `id`, `owner_key` and
/// `content_type` are immutable once the record exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentRecord {
    pub id: FragmentId,
    pub owner_key: OwnerKey,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub content_type: String,
    pub size: u64,
}

impl FragmentRecord {
    /// Build a fresh record; `created` and `updated` both start at `now`.
    pub fn new(
        id: FragmentId,
        owner_key: OwnerKey,
        content_type: impl Into<String>,
        size: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_key,
            created: now,
            updated: now,
            content_type: content_type.into(),
            size,
        }
    }

    /// The blob addressing key paired with this record.
    pub fn blob_key(&self) -> BlobKey {
        BlobKey::new(self.owner_key.clone(), self.id.clone())
    }

    /// Refresh the mutable fields after a content mutation.
    pub fn touch(&mut self, size: u64, now: DateTime<Utc>) {
        self.size = size;
        self.updated = now;
    }

    /// Constant-time ownership check against a derived key.
    pub fn is_owned_by(&self, owner_key: &OwnerKey) -> bool {
        self.owner_key == *owner_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_at(now: DateTime<Utc>) -> FragmentRecord {
        FragmentRecord::new(
            FragmentId::from("frag-1"),
            OwnerKey::derive("user1@example.com"),
            "text/plain",
            11,
            now,
        )
    }

    #[test]
    fn created_and_updated_start_equal() {
        let record = record_at(Utc::now());
        assert_eq!(record.created, record.updated);
        assert_eq!(record.size, 11);
    }

    #[test]
    fn touch_refreshes_size_and_updated_only() {
        let now = Utc::now();
        let mut record = record_at(now);
        let later = now + chrono::Duration::seconds(5);

        record.touch(42, later);

        assert_eq!(record.size, 42);
        assert_eq!(record.updated, later);
        assert_eq!(record.created, now);
        assert_eq!(record.content_type, "text/plain");
    }

    #[test]
    fn ownership_check_uses_derived_key() {
        let record = record_at(Utc::now());
        assert!(record.is_owned_by(&OwnerKey::derive("user1@example.com")));
        assert!(!record.is_owned_by(&OwnerKey::derive("user2@example.com")));
    }
}
