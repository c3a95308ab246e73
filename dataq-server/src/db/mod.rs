//! Database layer - connection pool and repositories
//!
//! - One pool per process, opened at startup
//! - Read-only access; every query binds its inputs as parameters

pub mod pool;
pub mod repos;

pub use pool::{connect, ConnectError, PoolSettings};
pub use repos::*;
