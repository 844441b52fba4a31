//! Command line and environment configuration for the proxy binary.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use inspector_logging::{LogDestination, DEFAULT_LOG_FILE};
use inspector_proxy::{FetchSettings, ServerConfig, DEFAULT_RELAY_BASE};
use log::LevelFilter;
use url::Url;

#[derive(Parser, Debug, Clone)]
#[command(name = "scrape-inspector", version, about = "Instrumenting proxy for scrape target inspection")]
pub struct Cli {
    /// Port the proxy listens on.
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Interface to bind.
    #[arg(long, env = "INSPECTOR_BIND", default_value = "127.0.0.1")]
    pub bind: String,

    /// Overall upstream timeout in seconds. Unset waits indefinitely.
    #[arg(long, env = "INSPECTOR_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    #[arg(long, env = "INSPECTOR_CONNECT_TIMEOUT_SECS", default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Largest upstream body accepted, in bytes.
    #[arg(long, env = "INSPECTOR_MAX_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_bytes: u64,

    /// Base URL of the public CORS relay used by `/cors-proxy`.
    #[arg(long, env = "INSPECTOR_RELAY_BASE", default_value = DEFAULT_RELAY_BASE)]
    pub relay_base: String,

    #[arg(long, env = "INSPECTOR_LOG", value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log at debug level.
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,

    #[arg(long, default_value_t = 4)]
    pub worker_threads: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn server_config(&self) -> anyhow::Result<ServerConfig> {
        let relay_base = Url::parse(&self.relay_base)
            .with_context(|| format!("invalid relay base url: {}", self.relay_base))?;
        let fetch = FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            max_bytes: self.max_bytes,
            ..FetchSettings::default()
        };
        Ok(ServerConfig {
            bind: format!("{}:{}", self.bind, self.port),
            fetch,
            relay_base,
            worker_threads: self.worker_threads,
        })
    }
}
