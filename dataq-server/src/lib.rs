//! dataq-server: threshold query over PostgreSQL, served as JSON
//!
//! Startup resolves a [`config::DbConfig`] from the environment, opens one
//! shared pool with [`db::connect`], then serves `GET /api/test1` through
//! [`http::run_server`].

pub mod config;
pub mod db;
pub mod http;

pub use config::DbConfig;
pub use db::{ConnectError, PoolSettings};
pub use http::{run_server, ServerConfig, ServerError};
