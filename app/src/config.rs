//! Runtime configuration from environment variables and the command line.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_URL: &str = "https://android-kotlin-fun-mars-server.appspot.com/amphibians";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const USAGE: &str = "usage: amphibians [--plain]

environment:
  AMPHIBIANS_URL           endpoint serving the amphibian list
  AMPHIBIANS_TIMEOUT_SECS  request timeout in seconds (default 10)
  AMPHIBIANS_LOG_FILE      append logs to this file
  RUST_LOG                 log filter (default info)";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AMPHIBIANS_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),

    #[error("unknown argument {0:?}\n\n{usage}", usage = USAGE)]
    UnknownArgument(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub url: String,
    pub timeout: Duration,
    pub log_file: Option<PathBuf>,
    /// Print once to stdout instead of running the terminal UI.
    pub plain: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(|key| std::env::var(key).ok(), std::env::args().skip(1))
    }

    /// Build a config from a variable lookup and the arguments after the
    /// program name.
    pub fn load<I>(var: impl Fn(&str) -> Option<String>, args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let url = var("AMPHIBIANS_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_URL.to_string());

        let timeout_secs = match var("AMPHIBIANS_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
        };

        let log_file = var("AMPHIBIANS_LOG_FILE")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let mut plain = false;
        for arg in args {
            match arg.as_str() {
                "--plain" => plain = true,
                _ => return Err(ConfigError::UnknownArgument(arg)),
            }
        }

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
            log_file,
            plain,
        })
    }
}
