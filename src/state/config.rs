use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::youtube::API_BASE;

pub const API_KEY_VAR: &str = "YT_API_KEY";
pub const API_BASE_VAR: &str = "YT_API_BASE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub api_base: String,
    pub audio_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: API_BASE.to_string(),
            audio_only: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML from {:?}", path))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content =
            toml::to_string_pretty(&self).with_context(|| "Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(path, content).with_context(|| format!("Failed to write config to {:?}", path))
    }

    /// `config.toml` from the data dir (if any), then environment overrides.
    pub fn resolve(data_dir: &Path) -> anyhow::Result<Self> {
        let path = config_path(data_dir);
        let config = if path.exists() {
            Self::load(&path)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };

        Ok(config.with_overrides(|name| std::env::var(name).ok()))
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_VAR).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(base) = lookup(API_BASE_VAR).filter(|b| !b.trim().is_empty()) {
            self.api_base = base.trim().to_string();
        }
        self
    }
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

pub fn recent_path(data_dir: &Path) -> PathBuf {
    data_dir.join("recent.yaml")
}

pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("ytshuffle.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_base, API_BASE);
        assert!(!config.audio_only);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = config_path(temp.path());

        let config = Config {
            api_key: Some("secret".to_string()),
            api_base: "http://localhost:9000".to_string(),
            audio_only: true,
        };

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = config_path(temp.path());
        fs::write(&path, "audio_only = true\n").unwrap();

        let loaded = Config::load(&path).unwrap();
        assert!(loaded.audio_only);
        assert_eq!(loaded.api_base, API_BASE);
        assert_eq!(loaded.api_key, None);
    }

    #[test]
    fn test_resolve_without_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::resolve(temp.path()).unwrap();
        assert!(!config.api_base.is_empty());
    }

    #[test]
    fn test_env_overrides_file() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::default()
        }
        .with_overrides(|name| match name {
            API_KEY_VAR => Some(" from-env ".to_string()),
            _ => None,
        });

        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.api_base, API_BASE);
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            ..Config::default()
        }
        .with_overrides(|_| Some("   ".to_string()));

        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.api_base, API_BASE);
    }

    #[test]
    fn test_config_paths() {
        let dir = PathBuf::from(".ytshuffle");
        assert_eq!(config_path(&dir), PathBuf::from(".ytshuffle/config.toml"));
        assert_eq!(recent_path(&dir), PathBuf::from(".ytshuffle/recent.yaml"));
        assert_eq!(log_path(&dir), PathBuf::from(".ytshuffle/ytshuffle.log"));
    }
}
