use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::github::client::DEFAULT_API_URL;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Used by `stars` when no username is given on the command line.
    #[serde(default)]
    pub username: String,
    /// Kept as text and validated the same way as interactive input.
    #[serde(default = "default_per_page")]
    pub per_page: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_per_page() -> String {
    "100".to_string()
}
fn default_request_timeout() -> u64 {
    20
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            username: String::new(),
            per_page: default_per_page(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl GithubConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }

        let mut candidates = Vec::new();

        // 1. ~/.config/ghstars/config.toml
        if let Some(home) = std::env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(".config/ghstars/config.toml"));
        }

        // 2. Platform-specific path (macOS: ~/Library/Application Support/ghstars/)
        if let Some(proj_dirs) = ProjectDirs::from("", "", "ghstars") {
            candidates.push(proj_dirs.config_dir().join("config.toml"));
        }

        for config_path in &candidates {
            if config_path.exists() {
                return Self::read(config_path);
            }
        }

        Ok(AppConfig::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")
    }

    pub fn log_dir(&self) -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "ghstars") {
            return proj_dirs.data_dir().join("logs");
        }
        PathBuf::from(".local/share/ghstars/logs")
    }
}
