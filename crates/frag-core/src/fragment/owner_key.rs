//! Owner key derivation and comparison.
//!
//! Every fragment is partitioned by a one-way digest of the raw caller
//! identity. The raw identity never leaves the derivation boundary: it is
//! not stored, not logged, and never compared against anything directly.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OwnerKeyError {
    #[error("owner key must be a 64-character hex digest")]
    InvalidDigest,
}

/// One-way digest of a raw caller identity (SHA-256).
///
/// Deterministic: the same raw identity always yields the same key, and
/// two distinct identities never collide in practice. Comparison is
/// constant-time; two keys are only ever compared against each other,
/// never against a raw identity.
#[derive(Clone)]
pub struct OwnerKey([u8; 32]);

impl OwnerKey {
    /// Derive the owner key for a raw caller identity.
    pub fn derive(raw_identity: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(raw_identity.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Parse a key previously rendered with [`OwnerKey::to_hex`].
    ///
    /// Used by adapters that persist the key as a string column.
    pub fn from_hex(s: &str) -> Result<Self, OwnerKeyError> {
        let bytes = hex::decode(s).map_err(|_| OwnerKeyError::InvalidDigest)?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|_| OwnerKeyError::InvalidDigest)?;
        Ok(Self(digest))
    }

    /// Lowercase hex rendering, the canonical string form of the key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Truncated hex prefix, safe for log context.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl PartialEq for OwnerKey {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.0[..].ct_eq(&other.0[..]))
    }
}

impl Eq for OwnerKey {}

impl std::fmt::Debug for OwnerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OwnerKey({}..)", self.short_hex())
    }
}

impl Serialize for OwnerKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for OwnerKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let a = OwnerKey::derive("user1@example.com");
        let b = OwnerKey::derive("user1@example.com");
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), b.to_hex());
    }

    #[test]
    fn distinct_identities_yield_distinct_keys() {
        let a = OwnerKey::derive("user1@example.com");
        let b = OwnerKey::derive("user2@example.com");
        assert_ne!(a, b);
    }

    #[test]
    fn hex_round_trip() {
        let key = OwnerKey::derive("user1@example.com");
        let parsed = OwnerKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(OwnerKey::from_hex("not-hex").is_err());
        assert!(OwnerKey::from_hex("abcd").is_err());
    }

    #[test]
    fn debug_never_shows_full_digest() {
        let key = OwnerKey::derive("user1@example.com");
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains(&key.to_hex()));
        assert!(!rendered.contains("user1@example.com"));
    }
}
