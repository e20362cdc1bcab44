//! Application configuration management.
//!
//! This module handles loading and saving the goqr configuration: which API
//! and repository to list links from, where short links point, where the
//! saved session lives and where output goes.
//!
//! Configuration is stored at `~/.config/goqr/config.json`. Every field can
//! be overridden with a `GOQR_*` environment variable.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::DEFAULT_BASE_URL;
use crate::auth::{FileStore, KeyValueStore, KeyringStore, MemoryStore};
use crate::links::{DEFAULT_LINKS_PATH, DEFAULT_OWNER, DEFAULT_REPO};
use crate::qr::{ACCENT_COLOR, DEFAULT_REDIRECT_BASE};

/// Application name used for config directory paths
const APP_NAME: &str = "goqr";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Where the saved GitHub session is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

impl StorageBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "keyring" | "keychain" => Some(Self::Keyring),
            "memory" | "none" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub owner: String,
    pub repo: String,
    pub links_path: String,
    pub redirect_base: String,
    pub accent_color: String,
    pub storage: StorageBackend,
    pub output_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub last_user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            owner: DEFAULT_OWNER.to_string(),
            repo: DEFAULT_REPO.to_string(),
            links_path: DEFAULT_LINKS_PATH.to_string(),
            redirect_base: DEFAULT_REDIRECT_BASE.to_string(),
            accent_color: ACCENT_COLOR.to_string(),
            storage: StorageBackend::default(),
            output_dir: None,
            log_dir: None,
            last_user: None,
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    ///
    /// An unreadable config file falls back to defaults and the error comes
    /// back alongside for reporting. Overrides apply either way.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        let lookup = |key: &str| std::env::var(key).ok();
        match Self::default_path() {
            Ok(path) => Self::load_or_default(&path, lookup),
            Err(e) => {
                let mut config = Self::default();
                config.apply_overrides(lookup);
                (config, Some(e))
            }
        }
    }

    pub fn load_or_default<F>(path: &Path, lookup: F) -> (Self, Option<anyhow::Error>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let (mut config, error) = match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        };
        config.apply_overrides(lookup);
        (config, error)
    }

    /// Load from `path`, or defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Record `user` as the last login in the file at `path`.
    ///
    /// Only that field is written; the file is re-read first so overrides
    /// in effect for this run never become permanent.
    pub fn remember_user(path: &Path, user: &str) -> Result<()> {
        let mut on_disk = Self::load_from(path)?;
        on_disk.last_user = Some(user.to_string());
        on_disk.save_to(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Override fields from `GOQR_*` variables. `lookup` is the environment.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("GOQR_API_BASE") {
            self.api_base_url = v;
        }
        if let Some(v) = get("GOQR_REPO") {
            // owner/repo
            let (owner, repo) = v.split_once('/').unwrap_or(("", v.as_str()));
            if !owner.is_empty() {
                self.owner = owner.to_string();
            }
            self.repo = repo.to_string();
        }
        if let Some(v) = get("GOQR_LINKS_PATH") {
            self.links_path = v;
        }
        if let Some(v) = get("GOQR_REDIRECT_BASE") {
            self.redirect_base = v;
        }
        if let Some(v) = get("GOQR_ACCENT") {
            self.accent_color = v;
        }
        if let Some(backend) = get("GOQR_STORAGE").as_deref().and_then(StorageBackend::parse) {
            self.storage = backend;
        }
        if let Some(v) = get("GOQR_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get("GOQR_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(v));
        }
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    /// Output directory, defaulting to the current one
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Open the configured storage backend
    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>> {
        let store: Arc<dyn KeyValueStore> = match self.storage {
            StorageBackend::File => Arc::new(FileStore::in_dir(&Self::config_dir()?)),
            StorageBackend::Keyring => Arc::new(KeyringStore::new()),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        };
        debug!(backend = ?self.storage, "Opened credential storage");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://api.github.com");
        assert_eq!(config.owner, "TEDxWarwickTechnical");
        assert_eq!(config.repo, "go");
        assert_eq!(config.links_path, "_links");
        assert_eq!(config.redirect_base, "https://go.tedxw.co/");
        assert_eq!(config.accent_color, "#da291c");
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.output_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.repo, "go");
    }

    #[test]
    fn test_partial_file_and_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"repo": "links", "storage": "keyring"}"#).unwrap();

        let mut config = Config::load_from(&path).unwrap();
        assert_eq!(config.repo, "links");
        assert_eq!(config.owner, "TEDxWarwickTechnical");
        assert_eq!(config.storage, StorageBackend::Keyring);

        config.last_user = Some("octocat".to_string());
        config.save_to(&path).unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.last_user.as_deref(), Some("octocat"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GOQR_API_BASE", "http://localhost:8080"),
            ("GOQR_REPO", "acme/short"),
            ("GOQR_STORAGE", "memory"),
            ("GOQR_OUTPUT_DIR", "/tmp/qr"),
            ("GOQR_LINKS_PATH", "   "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.owner, "acme");
        assert_eq!(config.repo, "short");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/qr"));
        // Blank values are ignored
        assert_eq!(config.links_path, "_links");
    }

    #[test]
    fn test_remember_user_keeps_overrides_off_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"repo": "links"}"#).unwrap();

        let env: HashMap<&str, &str> = [
            ("GOQR_STORAGE", "memory"),
            ("GOQR_API_BASE", "http://localhost:9"),
        ]
        .into_iter()
        .collect();
        let (config, error) =
            Config::load_or_default(&path, |key| env.get(key).map(|v| v.to_string()));
        assert!(error.is_none());
        assert_eq!(config.storage, StorageBackend::Memory);

        Config::remember_user(&path, "octocat").unwrap();

        let on_disk = Config::load_from(&path).unwrap();
        assert_eq!(on_disk.last_user.as_deref(), Some("octocat"));
        assert_eq!(on_disk.repo, "links");
        assert_eq!(on_disk.storage, StorageBackend::File);
        assert_eq!(on_disk.api_base_url, "https://api.github.com");
    }

    #[test]
    fn test_corrupt_file_still_applies_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let (config, error) = Config::load_or_default(&path, |key| match key {
            "GOQR_STORAGE" => Some("memory".to_string()),
            "GOQR_REPO" => Some("acme/short".to_string()),
            _ => None,
        });

        assert!(error.is_some());
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.owner, "acme");
        assert_eq!(config.repo, "short");
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!(StorageBackend::parse("Keychain"), Some(StorageBackend::Keyring));
        assert_eq!(StorageBackend::parse(" file "), Some(StorageBackend::File));
        assert_eq!(StorageBackend::parse("s3"), None);
    }
}
