use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub timeout_secs: u64,
    pub proxy: Option<String>,
    pub cookies_file: Option<PathBuf>,
    pub flaresolverr_url: Option<String>,
    pub user_agent: Option<String>,
    /// Directory recordings and thumbnails are written to when no output
    /// path is given.
    pub output_dir: Option<PathBuf>,
    pub ffmpeg_path: PathBuf,
    pub colored: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            proxy: None,
            cookies_file: None,
            flaresolverr_url: None,
            user_agent: None,
            output_dir: None,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            colored: true,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cam4").join("config.toml"))
    }

    fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
        path.map(Path::to_path_buf).or_else(Self::default_path)
    }

    /// Load the configuration, falling back to defaults when no file exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_path(path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = toml::from_str(&content)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let Some(path) = Self::resolve_path(path) else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.show()?)?;
        Ok(())
    }

    pub fn reset(path: Option<&Path>) -> Result<()> {
        Self::default().save(path)
    }

    pub fn show(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Place a default file name inside `output_dir` when one is configured.
    pub fn output_path(&self, file_name: PathBuf) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => file_name,
        }
    }
}
