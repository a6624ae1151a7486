use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use dashboard_engine::FetchSettings;
use dashboard_logging::{dash_info, LogDestination};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub(crate) enum LogTarget {
    File,
    #[default]
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Contents of `dashboard.ron`. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) base_url: String,
    pub(crate) connect_timeout_secs: u64,
    pub(crate) request_timeout_secs: u64,
    pub(crate) max_bytes: u64,
    pub(crate) state_dir: PathBuf,
    pub(crate) log_destination: LogTarget,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            base_url: fetch.base_url,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_bytes: fetch.max_bytes,
            state_dir: PathBuf::from(".dashboard"),
            log_destination: LogTarget::default(),
        }
    }
}

impl AppConfig {
    pub(crate) fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_bytes,
        }
    }
}

fn validate_config(config: &AppConfig) -> anyhow::Result<()> {
    if config.base_url.trim().is_empty() {
        anyhow::bail!("base_url must not be empty");
    }
    if config.request_timeout_secs == 0 {
        anyhow::bail!("request_timeout_secs must be greater than zero");
    }
    if config.max_bytes == 0 {
        anyhow::bail!("max_bytes must be greater than zero");
    }
    Ok(())
}

/// Reads the config file; a missing file means defaults.
pub(crate) fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            dash_info!("no config at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {}", path.display()))
        }
    };
    let config: AppConfig = ron::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}
