use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_BACKEND_URL, LOGIN_DELAY_MS, MESSAGE_TIMEOUT_SECS, MOCK_LATENCY_MS,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analysis backend configuration
    #[serde(default)]
    pub backend: BackendConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Where analysis requests go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// POST to the remote service
    Remote,
    /// Fabricate results locally
    Mock,
}

/// Analysis backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the analysis service
    pub url: String,
    /// Remote service or local mock
    pub mode: BackendMode,
    /// Request timeout; unset means wait indefinitely
    pub request_timeout_secs: Option<u64>,
    /// Simulated latency of the mock backend
    pub mock_latency_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            mode: BackendMode::Remote,
            request_timeout_secs: None,
            mock_latency_ms: MOCK_LATENCY_MS,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// How long a status message stays visible
    pub message_timeout_secs: u64,
    /// Artificial delay before a login completes
    pub login_delay_ms: u64,
    /// Submit as soon as a file is picked instead of waiting for an explicit submit
    pub auto_submit: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            message_timeout_secs: MESSAGE_TIMEOUT_SECS,
            login_delay_ms: LOGIN_DELAY_MS,
            auto_submit: false,
        }
    }
}

impl UIConfig {
    pub fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.message_timeout_secs)
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    // Get config directories
    let config_dir = get_config_dir()?;
    let global_config = config_dir.join("config.toml");
    let local_config = PathBuf::from(".sitescan/config.toml");

    // Build figment configuration
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    // Add global config if it exists
    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    // Add local config if it exists
    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    extract(figment)
}

/// Load configuration from an explicit file, still honoring env overrides
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let figment = Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path));
    extract(figment)
}

fn extract(figment: Figment) -> Result<Config> {
    // Add environment variables (SITESCAN_ prefix, `__` separates sections)
    figment
        .merge(Env::prefixed("SITESCAN_").split("__"))
        .extract()
        .context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "sitescan") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("sitescan");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_dir = get_config_dir()?;
    let config_file = config_dir.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        tracing::info!("Created default configuration at {}", config_file.display());
    }

    Ok(config_file)
}
