use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{anyhow, Context};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global subscriber.
///
/// The terminal UI owns stdout, so logs only go to a file there. Plain mode
/// logs to stderr when no file is configured.
pub fn init(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow!(e))
        }
        None if config.plain => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow!(e)),
        None => Ok(()),
    }
}
