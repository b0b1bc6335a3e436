// src/config.rs
//! Client settings - resolves the API base URL and the local data directory.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Used when neither the environment nor the config file names a server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub data_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api: ApiSection,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSection {
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl Settings {
    /// Load settings. Base URL resolution order: `NEXUS_API_URL` environment
    /// override, then the config file, then the local default.
    pub fn load() -> Result<Self> {
        let data_dir = Self::resolve_data_dir()?;
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let file = Self::load_config_file(&data_dir)?;

        let base_url = std::env::var("NEXUS_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or(file.api.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_seconds = file.api.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS);

        info!("API base URL: {}", base_url);
        debug!("Data directory: {}", data_dir.display());

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_seconds,
            data_dir,
        })
    }

    fn resolve_data_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("NEXUS_DATA_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let dirs = ProjectDirs::from("", "", "nexus")
            .context("Failed to determine a data directory for this platform")?;
        Ok(dirs.data_dir().to_path_buf())
    }

    fn load_config_file(data_dir: &std::path::Path) -> Result<ConfigFile> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        parse_config(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

fn parse_config(content: &str) -> Result<ConfigFile> {
    toml::from_str(content).context("Failed to parse TOML")
}
