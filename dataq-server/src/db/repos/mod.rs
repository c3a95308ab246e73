//! Repository implementations for database access

pub mod data;

pub use data::{DataRepo, DbError, Record, DEFAULT_THRESHOLD};
