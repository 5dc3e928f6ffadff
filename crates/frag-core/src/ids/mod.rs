mod fragment_id;
mod id_macro;

pub use fragment_id::FragmentId;

pub(crate) use id_macro::impl_id;
