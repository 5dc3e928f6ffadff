mod blob_key;
mod owner_key;
mod record;

pub use blob_key::BlobKey;
pub use owner_key::{OwnerKey, OwnerKeyError};
pub use record::FragmentRecord;
