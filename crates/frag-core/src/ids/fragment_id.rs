use serde::{Deserialize, Serialize};

use super::impl_id;

/// Opaque unique identifier of a fragment.
///
/// System-generated ids are UUID v4; callers may pin their own id on
/// creation. Immutable once a record exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FragmentId(String);

impl_id!(FragmentId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(FragmentId::new(), FragmentId::new());
    }

    #[test]
    fn pinned_id_round_trips() {
        let id = FragmentId::from("my-pinned-id");
        assert_eq!(id.as_str(), "my-pinned-id");
        assert_eq!(id.to_string(), "my-pinned-id");
    }
}
