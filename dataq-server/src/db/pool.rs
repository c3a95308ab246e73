//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is opened once
//! at startup and shared by every request for the life of the process.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{ConnectOptions, Connection, PgPool};

use crate::config::DbConfig;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default time allowed for the startup connection check.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default time a request waits for a pooled connection (sqlx's own default).
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool sizing, startup and acquire limits
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,

    /// Bounds the single startup connection attempt only.
    pub connect_timeout: Duration,

    /// Bounds how long a request waits to get a connection from the pool,
    /// including the driver's reconnect attempts. Query execution itself has
    /// no deadline.
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

/// Startup connection error. Always fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("invalid connection descriptor: {field}: {reason}")]
    InvalidDescriptor { field: &'static str, reason: String },

    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("failed to connect to database: no response within {0:?}")]
    Timeout(Duration),
}

/// Translate the descriptor into driver connect options.
///
/// # Errors
///
/// Returns [`ConnectError::InvalidDescriptor`] if the port is not a valid
/// port number or the SSL mode is not one the driver understands.
pub fn connect_options(config: &DbConfig) -> Result<PgConnectOptions, ConnectError> {
    let port = config
        .port
        .parse::<u16>()
        .map_err(|e: std::num::ParseIntError| ConnectError::InvalidDescriptor {
            field: "port",
            reason: format!("'{}': {}", config.port, e),
        })?;

    let ssl_mode = config
        .sslmode
        .parse::<PgSslMode>()
        .map_err(|e| ConnectError::InvalidDescriptor {
            field: "sslmode",
            reason: e.to_string(),
        })?;

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.dbname)
        .ssl_mode(ssl_mode))
}

/// Pool options for the shared pool. `connect_timeout` plays no part here.
pub fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
}

/// Open the shared PostgreSQL pool.
///
/// Makes exactly one connection attempt, bounded by `connect_timeout`, so an
/// unreachable host or rejected credentials fail here with the driver's own
/// error rather than on the first request. The pool is created only after
/// that attempt succeeds.
///
/// # Example
///
/// ```ignore
/// let config = DbConfig::resolve(".env");
/// let pool = connect(&config, PoolSettings::default()).await?;
/// ```
pub async fn connect(config: &DbConfig, settings: PoolSettings) -> Result<PgPool, ConnectError> {
    let options = connect_options(config)?;

    tracing::info!(
        dsn = %config.redacted_connection_string(),
        max_connections = settings.max_connections,
        acquire_timeout = ?settings.acquire_timeout,
        "Connecting to database"
    );

    let conn = tokio::time::timeout(settings.connect_timeout, options.connect())
        .await
        .map_err(|_| ConnectError::Timeout(settings.connect_timeout))??;
    conn.close().await?;

    let pool = pool_options(&settings).connect_lazy_with(options);

    tracing::info!("Database connected successfully");
    Ok(pool)
}
