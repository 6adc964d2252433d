//! toxbot configuration
//!
//! Every setting comes from (highest precedence first) a command-line flag,
//! an environment variable, or a built-in default. Environment values that
//! are blank after trimming count as unset.
//!
//! | Variable | Default |
//! |---|---|
//! | `TOX_DATA_DIR` | `/data` |
//! | `TOX_SAVEDATA` | `<data dir>/bot.tox` |
//! | `TOX_NAME` | `go-tox-bot` |
//! | `TOX_STATUS` | `echo bot` |
//! | `TOX_BOOTSTRAP_NODES` | built-in pair |
//! | `SOCKS5_PROXY` | unset |
//! | `TOX_LOG_LEVEL` | `info` |

use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use toxbot::tox::bot::{
    BotConfig, DEFAULT_NAME, DEFAULT_SAVE_INTERVAL, DEFAULT_STATUS, MIN_SAVE_INTERVAL,
};
use toxbot::tox::{parse_proxy, resolve_bootstrap_nodes, BootstrapNode, ProxyConfig};
use tracing::warn;

pub const ENV_DATA_DIR: &str = "TOX_DATA_DIR";
pub const ENV_SAVEDATA: &str = "TOX_SAVEDATA";
pub const ENV_NAME: &str = "TOX_NAME";
pub const ENV_STATUS: &str = "TOX_STATUS";
pub const ENV_BOOTSTRAP_NODES: &str = "TOX_BOOTSTRAP_NODES";
pub const ENV_SOCKS5_PROXY: &str = "SOCKS5_PROXY";
pub const ENV_LOG_LEVEL: &str = "TOX_LOG_LEVEL";

/// Default data directory
const DEFAULT_DATA_DIR: &str = "/data";

/// Savedata file name inside the data directory
const SAVEDATA_FILE: &str = "bot.tox";

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line overrides shared by `run` and `show-config`
#[derive(Args, Debug, Clone, Default)]
pub struct BotArgs {
    /// Base directory for persisted state [env: TOX_DATA_DIR]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Exact savedata file path [env: TOX_SAVEDATA]
    #[arg(long)]
    pub savedata: Option<PathBuf>,

    /// Displayed name [env: TOX_NAME]
    #[arg(long)]
    pub name: Option<String>,

    /// Displayed status message [env: TOX_STATUS]
    #[arg(long)]
    pub status: Option<String>,

    /// Comma-separated host:port:pubkeyhex list [env: TOX_BOOTSTRAP_NODES]
    #[arg(long)]
    pub bootstrap_nodes: Option<String>,

    /// Seconds between periodic savedata checkpoints
    #[arg(long)]
    pub save_interval_secs: Option<u64>,

    /// Filled from the global `--log-level` flag
    #[arg(skip)]
    pub log_level: Option<String>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to create data directory '{}': {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Resolved bot configuration
///
/// Field order matters for TOML rendering: plain values before tables.
#[derive(Debug, Clone, Serialize)]
pub struct ToxbotConfig {
    pub data_dir: PathBuf,
    pub savedata_path: PathBuf,
    pub name: String,
    pub status_message: String,
    pub save_interval_secs: u64,

    /// SOCKS5 proxy for every engine connection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,

    pub logging: LoggingConfig,

    pub bootstrap_nodes: Vec<BootstrapNode>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    pub level: String,
}

/// Trimmed value, or `None` when missing or blank
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the log level from flag, then environment, then default
pub fn resolve_log_level<F>(flag: Option<&str>, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_blank(flag.map(str::to_string))
        .or_else(|| non_blank(lookup(ENV_LOG_LEVEL)))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

impl ToxbotConfig {
    /// Resolve against the process environment
    pub fn from_env(args: &BotArgs) -> Self {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary variable lookup
    pub fn resolve<F>(args: &BotArgs, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| non_blank(lookup(key));

        let data_dir = args
            .data_dir
            .clone()
            .or_else(|| env(ENV_DATA_DIR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let savedata_path = args
            .savedata
            .clone()
            .or_else(|| env(ENV_SAVEDATA).map(PathBuf::from))
            .unwrap_or_else(|| data_dir.join(SAVEDATA_FILE));

        let name = non_blank(args.name.clone())
            .or_else(|| env(ENV_NAME))
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        let status_message = non_blank(args.status.clone())
            .or_else(|| env(ENV_STATUS))
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());

        let bootstrap_input = non_blank(args.bootstrap_nodes.clone())
            .or_else(|| env(ENV_BOOTSTRAP_NODES));
        let bootstrap_nodes = resolve_bootstrap_nodes(bootstrap_input.as_deref());

        // Never echo the raw value: it may carry a password
        let proxy = env(ENV_SOCKS5_PROXY).and_then(|value| match parse_proxy(&value) {
            Ok(proxy) => Some(proxy),
            Err(e) => {
                warn!("{} ignored: {}", ENV_SOCKS5_PROXY, e);
                None
            }
        });

        let save_interval_secs = args
            .save_interval_secs
            .unwrap_or(DEFAULT_SAVE_INTERVAL.as_secs())
            .max(MIN_SAVE_INTERVAL.as_secs());

        let level = resolve_log_level(args.log_level.as_deref(), &lookup);

        Self {
            data_dir,
            savedata_path,
            name,
            status_message,
            save_interval_secs,
            proxy,
            logging: LoggingConfig { level },
            bootstrap_nodes,
        }
    }

    /// Create the data directory (and parents) if missing
    pub fn ensure_data_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| ConfigError::DataDir {
            path: self.data_dir.clone(),
            source,
        })
    }

    /// Settings handed to the bot
    pub fn bot_config(&self) -> BotConfig {
        BotConfig {
            name: self.name.clone(),
            status_message: self.status_message.clone(),
            savedata_path: self.savedata_path.clone(),
            save_interval: Duration::from_secs(self.save_interval_secs),
            bootstrap_nodes: self.bootstrap_nodes.clone(),
            proxy: self.proxy.clone(),
        }
    }

    /// Render as TOML (proxy password omitted)
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
