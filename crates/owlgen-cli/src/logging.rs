//! Subscriber setup for the CLI

use anyhow::{Result, bail};
use owlgen_core::{LogLevel, OwlgenConfig};
use tracing_subscriber::EnvFilter;

/// Pick the log level: command line, then `[logging] level`.
pub fn resolve_level(flag: Option<&str>, config: &OwlgenConfig) -> Result<LogLevel> {
    match flag {
        Some(value) => match LogLevel::parse(value) {
            Some(level) => Ok(level),
            None => bail!("Invalid log level: {value}"),
        },
        None => match config.log_level() {
            Some(level) => Ok(level),
            None => bail!("Invalid log level in config: {}", config.logging.level),
        },
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `level` when set.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
