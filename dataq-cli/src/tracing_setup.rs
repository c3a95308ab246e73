//! Console logging for the dataq binary
//!
//! `RUST_LOG` takes precedence when set (e.g. `RUST_LOG=dataq_server=debug`);
//! otherwise the level is `info`, or `debug` with `--debug`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

fn filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}

/// Install the global subscriber. Targets are shown only in debug mode.
pub fn init(debug: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(debug))
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
