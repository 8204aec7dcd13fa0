//! Configuration management for Shelf.
//!
//! Parses `shelf.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `sanity.project_id`
//! - `sanity.dataset`
//! - `sanity.token`
//! - `revalidate.token`
//! - `site.studio_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override Sanity project ID.
    pub project_id: Option<String>,
    /// Override Sanity dataset.
    pub dataset: Option<String>,
    /// Override page cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "shelf.toml";

/// Maximum HTTP timeout accepted for content store queries.
const MAX_TIMEOUT_SECS: u64 = 300;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Sanity content store connection (optional section).
    pub sanity: Option<SanityConfig>,
    /// Rendered page cache configuration.
    pub cache: CacheConfig,
    /// Cache invalidation endpoint configuration.
    pub revalidate: RevalidateConfig,
    /// Site presentation settings.
    pub site: SiteConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        }
    }
}

/// Sanity content store configuration.
#[derive(Debug, Deserialize)]
pub struct SanityConfig {
    /// Sanity project ID.
    pub project_id: String,
    /// Dataset name.
    #[serde(default = "default_dataset")]
    pub dataset: String,
    /// Query API version (`YYYY-MM-DD`).
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Query the API CDN instead of the live API.
    #[serde(default = "default_use_cdn")]
    pub use_cdn: bool,
    /// Read token for private datasets.
    #[serde(default)]
    pub token: Option<String>,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SanityConfig {
    /// Create a config for `project_id` with all other fields at their defaults.
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: default_dataset(),
            api_version: default_api_version(),
            use_cdn: default_use_cdn(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.project_id, "sanity.project_id")?;
        if !self
            .project_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ConfigError::Validation(
                "sanity.project_id may only contain a-z, 0-9 and dashes".to_owned(),
            ));
        }

        require_non_empty(&self.dataset, "sanity.dataset")?;
        if self.dataset.len() > 64
            || !self
                .dataset
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(
                "sanity.dataset must be at most 64 characters of a-z, 0-9, dashes and underscores"
                    .to_owned(),
            ));
        }

        if !is_valid_api_version(&self.api_version) {
            return Err(ConfigError::Validation(format!(
                "sanity.api_version must be YYYY-MM-DD or 1, got {}",
                self.api_version
            )));
        }

        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "sanity.timeout_secs must be between 1 and {MAX_TIMEOUT_SECS}"
            )));
        }

        Ok(())
    }
}

fn default_dataset() -> String {
    "production".to_owned()
}

fn default_api_version() -> String {
    "2024-01-01".to_owned()
}

fn default_use_cdn() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

/// Accept `1` (legacy) or a `YYYY-MM-DD` date.
fn is_valid_api_version(version: &str) -> bool {
    if version == "1" {
        return true;
    }
    let bytes = version.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Rendered page cache configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether rendered pages are cached until invalidated.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Cache invalidation endpoint configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RevalidateConfig {
    /// Shared secret expected in the `token` query parameter.
    ///
    /// When unset, every invalidation request is rejected.
    pub token: Option<String>,
}

/// Site presentation settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Heading shown on the book list page.
    pub title: String,
    /// Name shown in the footer copyright line.
    pub footer_name: String,
    /// Link to the content studio, shown in the footer.
    pub studio_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Your Library".to_owned(),
            footer_name: "Book Platform".to_owned(),
            studio_url: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`sanity.token`").
        field: String,
        /// Error message (e.g., "${`SANITY_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `shelf.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(project_id) = &settings.project_id {
            match &mut self.sanity {
                Some(sanity) => sanity.project_id.clone_from(project_id),
                None => self.sanity = Some(SanityConfig::new(project_id.clone())),
            }
        }
        if let Some(dataset) = &settings.dataset
            && let Some(sanity) = &mut self.sanity
        {
            sanity.dataset.clone_from(dataset);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache.enabled = cache_enabled;
        }
    }

    /// Get validated Sanity configuration.
    ///
    /// Returns the Sanity config if the `[sanity]` section is present (or a
    /// project ID was given on the command line) and all fields are valid.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_sanity(&self) -> Result<&SanityConfig, ConfigError> {
        let sanity = self.sanity.as_ref().ok_or_else(|| {
            ConfigError::Validation("[sanity] section required in config".into())
        })?;
        sanity.validate()?;
        Ok(sanity)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        if let Some(sanity) = &self.sanity {
            sanity.validate()?;
        }
        if let Some(url) = &self.site.studio_url {
            require_http_url(url, "site.studio_url")?;
        }
        if let Some(token) = &self.revalidate.token {
            require_non_empty(token, "revalidate.token")?;
        }
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref mut sanity) = self.sanity {
            sanity.project_id = expand::expand_env(&sanity.project_id, "sanity.project_id")?;
            sanity.dataset = expand::expand_env(&sanity.dataset, "sanity.dataset")?;
            expand::expand_env_opt(&mut sanity.token, "sanity.token")?;
        }

        expand::expand_env_opt(&mut self.revalidate.token, "revalidate.token")?;
        expand::expand_env_opt(&mut self.site.studio_url, "site.studio_url")?;

        Ok(())
    }
}
