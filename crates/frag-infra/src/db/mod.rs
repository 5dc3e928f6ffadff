//! SQLite-backed metadata store (Diesel ORM, r2d2 pool, embedded
//! migrations).

pub mod dao;
pub mod metadata_store;
pub mod models;
pub mod pool;
pub mod schema;

pub use metadata_store::DieselMetadataStore;
pub use pool::{init_db_pool, DbPool};
