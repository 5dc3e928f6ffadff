use crate::fragment::OwnerKey;
use crate::ids::FragmentId;

/// Composite addressing key for blob storage.
///
/// Canonical string form is `<owner_hex>/<id>`; every blob adapter maps
/// this onto its own addressing scheme (filesystem path, map key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobKey {
    pub owner_key: OwnerKey,
    pub id: FragmentId,
}

impl BlobKey {
    pub fn new(owner_key: OwnerKey, id: FragmentId) -> Self {
        Self { owner_key, id }
    }

    /// Canonical `<owner_hex>/<id>` form.
    pub fn storage_key(&self) -> String {
        format!("{}/{}", self.owner_key.to_hex(), self.id)
    }
}

impl std::fmt::Display for BlobKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}
