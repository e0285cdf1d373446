use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::waiter::DEFAULT_TIMEOUT;

const ENV_PREFIX: &str = "CONDWAIT_";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Timeout budget of every wait in milliseconds.
    pub timeout_ms: u64,
    /// Tracing filter, either a level like `debug` or a full `EnvFilter` directive.
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            log_level: None,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Parser, Serialize, Debug)]
#[command(
    name = "condwait",
    about = "Waits for tool calls on a simulated agent thread",
    long_about = None,
    version
)]
pub struct Cli {
    /// Path to a YAML configuration file.
    #[arg(short = 'c', long, value_name = "PATH")]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    #[arg(short = 't', long, value_name = "MILLISECONDS")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    #[arg(short = 'l', long, value_name = "LEVEL")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Number of tool calls the simulated agent makes.
    #[arg(long, value_name = "COUNT", default_value_t = 2)]
    #[serde(skip)]
    pub tool_calls: usize,

    /// Delay before each event the simulated agent records.
    #[arg(long, value_name = "MILLISECONDS", default_value_t = 50)]
    #[serde(skip)]
    pub delay_ms: u64,

    #[arg(long, value_name = "ID", default_value = "demo-thread")]
    #[serde(skip)]
    pub stream_id: String,
}

/// Merges defaults, the optional YAML file, `CONDWAIT_` environment variables and command line
/// arguments, later sources taking precedence.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

    if let Some(path) = &cli.config {
        if !path.exists() {
            bail!("config file {} does not exist", path.display());
        }
        figment = figment.merge(Yaml::file(path));
    }

    let config = figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(cli))
        .extract()?;

    Ok(config)
}
