//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/rollcall/config.toml)
//! 3. Environment variables (ROLLCALL_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::paginate::PAGE_SIZE;

/// Environment variable prefix
const ENV_PREFIX: &str = "ROLLCALL";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the stored collections
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Rows per page when viewing records
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Log file path (defaults to {data_dir}/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Attendance simulator settings
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

/// Timing and deduplication settings for the attendance simulator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Shortest delay between recognition ticks
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Upper (exclusive) bound of the delay between ticks
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Seed the session's marked set from today's stored records
    #[serde(default)]
    pub skip_already_marked: bool,
}

impl SimulatorConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            skip_already_marked: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            page_size: default_page_size(),
            log_file: None,
            simulator: SimulatorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (ROLLCALL_DATA_DIR, ROLLCALL_PAGE_SIZE, ROLLCALL_LOG_FILE)
    /// 2. Config file (~/.config/rollcall/config.toml or ROLLCALL_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(config_path: Option<&PathBuf>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // ROLLCALL_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // ROLLCALL_PAGE_SIZE (ignored when not a number)
        if let Ok(val) = std::env::var(format!("{}_PAGE_SIZE", ENV_PREFIX)) {
            if let Ok(size) = val.trim().parse() {
                self.page_size = size;
            }
        }

        // ROLLCALL_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    /// Reject settings the store and simulator cannot work with
    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if self.simulator.max_delay_ms < self.simulator.min_delay_ms {
            bail!(
                "simulator.max_delay_ms ({}) must not be below simulator.min_delay_ms ({})",
                self.simulator.max_delay_ms,
                self.simulator.min_delay_ms
            );
        }
        Ok(())
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Set a single key from its textual form
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_dir" => self.data_dir = PathBuf::from(value),
            "page_size" => {
                self.page_size = value
                    .parse()
                    .context("Invalid value for page_size. Use a positive number.")?;
            }
            "log_file" => {
                self.log_file = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "simulator.min_delay_ms" => {
                self.simulator.min_delay_ms = value
                    .parse()
                    .context("Invalid value for simulator.min_delay_ms. Use milliseconds.")?;
            }
            "simulator.max_delay_ms" => {
                self.simulator.max_delay_ms = value
                    .parse()
                    .context("Invalid value for simulator.max_delay_ms. Use milliseconds.")?;
            }
            "simulator.skip_already_marked" => {
                self.simulator.skip_already_marked = value.parse().context(
                    "Invalid value for simulator.skip_already_marked. Use 'true' or 'false'.",
                )?;
            }
            _ => bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, page_size, log_file, simulator.min_delay_ms, \
                 simulator.max_delay_ms, simulator.skip_already_marked",
                key
            ),
        }
        self.validate()
    }

    /// Get the config file path
    ///
    /// Can be overridden with ROLLCALL_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rollcall")
            .join("config.toml")
    }

    /// Get the path logs are written to
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rollcall")
}

fn default_page_size() -> usize {
    PAGE_SIZE
}

fn default_min_delay_ms() -> u64 {
    2000
}

fn default_max_delay_ms() -> u64 {
    5000
}
