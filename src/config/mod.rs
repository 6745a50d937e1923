//! Configuration management
//!
//! Configuration is loaded from `schoolsite.yml` and may be overridden by
//! `SCHOOLSITE_*` environment variables. Missing values fall back to defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Hosted backend endpoint and key
    #[serde(default)]
    pub backend: BackendConfig,
    /// Object storage layout for gallery images
    #[serde(default)]
    pub storage: StorageConfig,
    /// Site navigation and public fallbacks
    #[serde(default)]
    pub site: SiteConfig,
}

/// Hosted backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Public (anon) API key
    #[serde(default)]
    pub anon_key: String,
    /// HTTP client timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            anon_key: String::new(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

/// Gallery image storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding gallery images
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// First path segment of every uploaded object
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            path_prefix: default_path_prefix(),
        }
    }
}

fn default_bucket() -> String {
    "gallery-images".to_string()
}

fn default_path_prefix() -> String {
    "gallery".to_string()
}

/// Site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Where unauthenticated admin visits are sent
    #[serde(default = "default_login_page")]
    pub login_page: String,
    /// Where a successful login lands
    #[serde(default = "default_admin_page")]
    pub admin_page: String,
    /// Values shown by the public stats block when the fetch fails
    #[serde(default)]
    pub fallback_stats: FallbackStats,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            login_page: default_login_page(),
            admin_page: default_admin_page(),
            fallback_stats: FallbackStats::default(),
        }
    }
}

fn default_login_page() -> String {
    "login.html".to_string()
}

fn default_admin_page() -> String {
    "admin.html".to_string()
}

/// Hardcoded public stats
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FallbackStats {
    #[serde(default)]
    pub students_enrolled: i64,
    #[serde(default)]
    pub qualified_teachers: i64,
    #[serde(default)]
    pub grade_level_text: String,
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file
    ///
    /// A missing or empty file yields the default configuration.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: format_yaml_error(&e),
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Recognized variables:
    /// - SCHOOLSITE_BACKEND_URL
    /// - SCHOOLSITE_BACKEND_ANON_KEY
    /// - SCHOOLSITE_BACKEND_TIMEOUT_SECONDS
    /// - SCHOOLSITE_STORAGE_BUCKET
    /// - SCHOOLSITE_STORAGE_PATH_PREFIX
    /// - SCHOOLSITE_SITE_LOGIN_PAGE
    /// - SCHOOLSITE_SITE_ADMIN_PAGE
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SCHOOLSITE_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Ok(key) = std::env::var("SCHOOLSITE_BACKEND_ANON_KEY") {
            self.backend.anon_key = key;
        }
        if let Ok(timeout) = std::env::var("SCHOOLSITE_BACKEND_TIMEOUT_SECONDS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                self.backend.timeout_seconds = timeout;
            }
        }

        if let Ok(bucket) = std::env::var("SCHOOLSITE_STORAGE_BUCKET") {
            self.storage.bucket = bucket;
        }
        if let Ok(prefix) = std::env::var("SCHOOLSITE_STORAGE_PATH_PREFIX") {
            self.storage.path_prefix = prefix;
        }

        if let Ok(page) = std::env::var("SCHOOLSITE_SITE_LOGIN_PAGE") {
            self.site.login_page = page;
        }
        if let Ok(page) = std::env::var("SCHOOLSITE_SITE_ADMIN_PAGE") {
            self.site.admin_page = page;
        }
    }
}

/// Format YAML parsing error with location
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared by every test that touches process environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
