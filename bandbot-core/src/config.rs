use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::cache::DEFAULT_TTL_SECS;

pub const DEFAULT_FEED_URL: &str = "https://www.hamqsl.com/solarxml.php";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_COMMAND_PREFIX: &str = "!";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// feed_url = "https://www.hamqsl.com/solarxml.php"
/// cache_ttl_secs = 3600
/// request_timeout_secs = 10
/// command_prefix = "!"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed_url: String,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub command_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            cache_ttl_secs: DEFAULT_TTL_SECS as u64,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
        }
    }
}

impl Config {
    pub fn cache_ttl(&self) -> chrono::Duration {
        // chrono caps durations at i64::MAX milliseconds.
        let secs = self.cache_ttl_secs.min(i64::MAX as u64 / 1000);
        chrono::Duration::seconds(secs as i64)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject values the bot cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.feed_url.starts_with("http://") && !self.feed_url.starts_with("https://") {
            return Err(anyhow!("feed_url must be an http(s) URL, got '{}'", self.feed_url));
        }
        if self.cache_ttl_secs == 0 {
            return Err(anyhow!("cache_ttl_secs must be greater than zero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than zero"));
        }
        if self.command_prefix.chars().count() != 1 || self.command_prefix.trim().is_empty() {
            return Err(anyhow!(
                "command_prefix must be a single non-space character, got '{}'",
                self.command_prefix
            ));
        }
        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "bandbot", "bandbot")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
