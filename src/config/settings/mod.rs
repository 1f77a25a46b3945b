
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::embeddings::hashing::DEFAULT_HASH_DIMENSION;
use crate::search::SimilarityMetric;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_SEED_URL: &str = "https://www.kotaksecurities.com/support/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScraperConfig {
    /// Listing page the FAQ sub-pages are discovered from
    pub seed_url: String,
    /// Substring an href must contain to be treated as a FAQ page
    pub link_marker: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub rate_limit_ms: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    /// Minimum word count for a heading to count as a question
    pub min_question_words: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            seed_url: DEFAULT_SEED_URL.to_string(),
            link_marker: "/support/".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 10,
            rate_limit_ms: 250,
            max_retries: 2,
            retry_delay_seconds: 2,
            min_question_words: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    #[default]
    Ollama,
    Hash,
}

impl fmt::Display for EmbeddingProviderKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::Hash => write!(f, "hash"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub batch_size: u32,
    pub embedding_dimension: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::Ollama,
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            model: "all-minilm:l6-v2".to_string(),
            batch_size: 64,
            embedding_dimension: DEFAULT_HASH_DIMENSION,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    pub top_k: usize,
    pub metric: SimilarityMetric,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            metric: SimilarityMetric::Cosine,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub file_name: String,
    /// When unset the cache file is trusted for as long as it exists
    pub ttl_hours: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_name: "faq_cache.csv".to_string(),
            ttl_hours: None,
        }
    }
}

impl SearchConfig {
    /// Result counts accepted from config and the command line
    #[inline]
    pub fn validate_top_k(top_k: usize) -> Result<(), ConfigError> {
        if (1..=50).contains(&top_k) {
            Ok(())
        } else {
            Err(ConfigError::InvalidTopK(top_k))
        }
    }
}

impl CacheConfig {
    #[inline]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_hours.map(|hours| Duration::from_secs(hours.saturating_mul(3600)))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid batch size: {0} (must be between 1 and 1000)")]
    InvalidBatchSize(u32),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid embedding dimension: {0} (must be between 8 and 4096)")]
    InvalidEmbeddingDimension(u32),
    #[error("Invalid link marker: {0:?} (cannot be empty)")]
    InvalidLinkMarker(String),
    #[error("Invalid request timeout: {0} (must be between 1 and 120 seconds)")]
    InvalidTimeout(u64),
    #[error("Invalid retry count: {0} (must be 10 or less)")]
    InvalidRetries(u32),
    #[error("Invalid top_k: {0} (must be between 1 and 50)")]
    InvalidTopK(usize),
    #[error("Invalid cache file name: {0:?} (cannot be empty)")]
    InvalidCacheFileName(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Platform config directory for the application, e.g. `~/.config/faq-search`
    #[inline]
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("faq-search"))
            .ok_or(ConfigError::DirectoryError)
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(Self {
                base_dir: config_dir.as_ref().to_path_buf(),
                ..Self::default()
            });
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = self.get_base_dir();

        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Get the base directory for the application
    #[inline]
    pub fn get_base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scraper.validate()?;
        self.embedding.validate()?;

        SearchConfig::validate_top_k(self.search.top_k)?;

        if self.cache.file_name.trim().is_empty() {
            return Err(ConfigError::InvalidCacheFileName(
                self.cache.file_name.clone(),
            ));
        }

        Ok(())
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.get_base_dir().join(CONFIG_FILE_NAME)
    }

    /// Path of the CSV file holding the last successful scrape
    #[inline]
    pub fn cache_file_path(&self) -> PathBuf {
        self.get_base_dir().join(&self.cache.file_name)
    }

    #[inline]
    pub fn ollama_url(&self) -> Result<Url, ConfigError> {
        self.embedding.ollama_url()
    }
}

impl ScraperConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let seed = Url::parse(&self.seed_url)
            .map_err(|_| ConfigError::InvalidUrl(self.seed_url.clone()))?;
        if seed.scheme() != "http" && seed.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(self.seed_url.clone()));
        }

        if self.link_marker.trim().is_empty() {
            return Err(ConfigError::InvalidLinkMarker(self.link_marker.clone()));
        }

        if !(1..=120).contains(&self.timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(self.timeout_seconds));
        }

        if self.max_retries > 10 {
            return Err(ConfigError::InvalidRetries(self.max_retries));
        }

        Ok(())
    }

    pub fn set_seed_url(&mut self, seed_url: String) -> Result<(), ConfigError> {
        let temp_config = ScraperConfig {
            seed_url: seed_url.clone(),
            ..self.clone()
        };
        temp_config.validate()?;
        self.seed_url = seed_url;
        Ok(())
    }

    pub fn set_link_marker(&mut self, link_marker: String) -> Result<(), ConfigError> {
        if link_marker.trim().is_empty() {
            return Err(ConfigError::InvalidLinkMarker(link_marker));
        }
        self.link_marker = link_marker;
        Ok(())
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidProtocol(self.protocol.clone()));
        }

        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))?;

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        if self.batch_size == 0 || self.batch_size > 1000 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }

        if !(8..=4096).contains(&self.embedding_dimension) {
            return Err(ConfigError::InvalidEmbeddingDimension(
                self.embedding_dimension,
            ));
        }

        Ok(())
    }

    pub fn ollama_url(&self) -> Result<Url, ConfigError> {
        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))
    }

    pub fn set_protocol(&mut self, protocol: String) -> Result<(), ConfigError> {
        if protocol != "http" && protocol != "https" {
            return Err(ConfigError::InvalidProtocol(protocol));
        }
        self.protocol = protocol;
        Ok(())
    }

    pub fn set_host(&mut self, host: String) -> Result<(), ConfigError> {
        let temp_config = EmbeddingConfig {
            host: host.clone(),
            ..self.clone()
        };
        temp_config.validate()?;
        self.host = host;
        Ok(())
    }

    pub fn set_port(&mut self, port: u16) -> Result<(), ConfigError> {
        if port == 0 {
            return Err(ConfigError::InvalidPort(port));
        }
        self.port = port;
        Ok(())
    }

    pub fn set_model(&mut self, model: String) -> Result<(), ConfigError> {
        if model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(model));
        }
        self.model = model;
        Ok(())
    }

    pub fn set_batch_size(&mut self, batch_size: u32) -> Result<(), ConfigError> {
        if batch_size == 0 || batch_size > 1000 {
            return Err(ConfigError::InvalidBatchSize(batch_size));
        }
        self.batch_size = batch_size;
        Ok(())
    }
}
