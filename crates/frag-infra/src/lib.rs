//! # frag-infra
//!
//! Infrastructure adapters for the fragment store: in-memory and
//! filesystem blob stores, in-memory and SQLite metadata stores, the
//! system clock, and storage configuration.

pub mod config;
pub mod db;
pub mod fs;
pub mod memory;
pub mod time;

pub use time::SystemClock;
