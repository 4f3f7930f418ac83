//! Configuration file parser for ~/.config/banca/config.toml.
//!
//! The config file names the CMS endpoint, the public site URL, and the
//! topic taxonomy. Topics are configured, not fetched: the set of
//! categories is a deployment decision, fixed per site, and the article
//! `category` fields point at these slugs.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::cms::Topic;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified; `api_url` is the only key `main` insists on before starting.
///
/// Custom Debug impl masks `access_token` to keep the CMS token out of
/// logs and error output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the CMS content API.
    pub api_url: String,

    /// Public URL of the blog, used for navigation targets and the sitemap.
    pub site_url: String,

    /// CMS access token (alternative to the BANCA_ACCESS_TOKEN env var).
    /// The env var takes precedence over the config file.
    pub access_token: Option<String>,

    /// Topic taxonomy: the category chips and menu columns, in display order.
    pub topics: Vec<Topic>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            site_url: "https://blog.example.com".to_string(),
            access_token: None,
            topics: Vec::new(),
        }
    }
}

/// Mask access_token in Debug output to prevent token leakage.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("site_url", &self.site_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("topics", &self.topics)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as a warning (likely typos)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Warn about probable typos before serde silently ignores them
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = ["api_url", "site_url", "access_token", "topics"];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            topics = config.topics.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Structural validation beyond what serde can express.
    ///
    /// Checks that both URLs parse as http(s) endpoints and that topic
    /// slugs are unique — duplicate slugs would make category filtering
    /// ambiguous.
    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::util::validate_endpoint(&self.api_url)
            .map_err(|e| ConfigError::Invalid(format!("api_url: {}", e)))?;
        crate::util::validate_endpoint(&self.site_url)
            .map_err(|e| ConfigError::Invalid(format!("site_url: {}", e)))?;

        let mut seen = std::collections::HashSet::new();
        for topic in &self.topics {
            if topic.slug.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "topic '{}' has an empty slug",
                    topic.title
                )));
            }
            if !seen.insert(topic.slug.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate topic slug '{}'",
                    topic.slug
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
