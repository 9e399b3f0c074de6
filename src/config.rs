use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::date::DEFAULT_DATE_FORMAT;
use crate::nature::Vocabulary;
use crate::pipeline::Pipeline;
use crate::reconstruct::{Reconstructor, DEFAULT_HEADER_MARKERS};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub parsing: ParsingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/normanpd.sqlite")
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Request body limit for `POST /upload`.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// No explicit timeout unless set; the transport default applies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ParsingConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_header_markers")]
    pub header_markers: Vec<String>,
    /// Ordered override of the built-in nature vocabulary.
    #[serde(default)]
    pub natures: Option<Vec<String>>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            header_markers: default_header_markers(),
            natures: None,
        }
    }
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_header_markers() -> Vec<String> {
    DEFAULT_HEADER_MARKERS.iter().map(|m| m.to_string()).collect()
}

impl ParsingConfig {
    pub fn vocabulary(&self) -> Vocabulary {
        match &self.natures {
            Some(natures) => Vocabulary::new(natures.clone()),
            None => Vocabulary::default(),
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(
            Reconstructor::new(self.date_format.clone(), self.header_markers.clone()),
            self.vocabulary(),
        )
    }
}

impl Config {
    /// All-defaults configuration, used when no config file exists.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig::default(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            fetch: FetchConfig::default(),
            parsing: ParsingConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields [`Config::minimal`].
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::minimal())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if config.parsing.date_format.trim().is_empty() {
        anyhow::bail!("parsing.date_format must not be empty");
    }

    if let Some(natures) = &config.parsing.natures {
        if natures.is_empty() {
            anyhow::bail!("parsing.natures must not be empty when given");
        }
        if natures.iter().any(|n| n.trim().is_empty()) {
            anyhow::bail!("parsing.natures must not contain empty phrases");
        }
    }

    if config.storage.max_upload_bytes == 0 {
        anyhow::bail!("storage.max_upload_bytes must be > 0");
    }

    if config.fetch.timeout_secs == Some(0) {
        anyhow::bail!("fetch.timeout_secs must be > 0");
    }

    Ok(())
}
