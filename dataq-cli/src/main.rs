//! dataq - serves rows of the `data` table above a threshold as JSON

mod tracing_setup;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use dataq_server::config::{DbConfig, DEFAULT_ENV_FILE};
use dataq_server::db::{self, pool, repos::DEFAULT_THRESHOLD, PoolSettings};
use dataq_server::http::{run_server, ServerConfig, DEFAULT_PORT};

/// Server command-line arguments
#[derive(Parser, Debug)]
#[command(name = "dataq", author, version, about)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Bind address
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Number of Tokio worker threads
    #[arg(short, long, default_value_t = 1, env = "DATAQ_WORKERS")]
    workers: usize,

    /// Maximum connections in the database pool
    #[arg(long, default_value_t = pool::DEFAULT_MAX_CONNECTIONS)]
    max_connections: u32,

    /// Seconds allowed for the one startup connection attempt
    #[arg(long, default_value_t = pool::DEFAULT_CONNECT_TIMEOUT.as_secs())]
    connect_timeout: u64,

    /// Seconds a request waits for a pooled connection before answering 500
    /// (query execution itself is not time-limited)
    #[arg(long, default_value_t = pool::DEFAULT_ACQUIRE_TIMEOUT.as_secs())]
    acquire_timeout: u64,

    /// Return rows whose field2 is greater than this value
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, allow_negative_numbers = true)]
    threshold: i32,

    /// Environment override file (missing file is not an error)
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_setup::init(args.debug)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.workers.max(1))
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    tracing::info!(workers = args.workers.max(1), "Starting dataq");

    let config = DbConfig::resolve(&args.env_file);
    if config.is_insecure() {
        tracing::warn!("DB_SSLMODE is 'disable': database traffic is not encrypted");
    }

    let settings = PoolSettings {
        max_connections: args.max_connections,
        connect_timeout: Duration::from_secs(args.connect_timeout),
        acquire_timeout: Duration::from_secs(args.acquire_timeout),
    };
    let pool = db::connect(&config, settings)
        .await
        .context("Failed to open database pool")?;

    let server_config = ServerConfig {
        bind_addr: SocketAddr::new(args.bind, args.port),
        threshold: args.threshold,
    };

    // Run server (blocks until shutdown)
    run_server(pool, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
