//! Server configuration.
//!
//! Values are layered, lowest priority first: built-in defaults, an optional
//! TOML file, environment variables, then command-line flags.
//!
//! ```toml
//! port = 8000
//! news_api_key = "..."
//!
//! [log]
//! name = "mcp_server"
//! file = "logs/mcp_server.log"
//! level = "INFO"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use wxmcp_logging::LogSettings;

use crate::news::DEFAULT_NEWS_BASE_URL;
use crate::tools::DEFAULT_WEATHER_BASE_URL;

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`ServerConfig`].
    Parse {
        /// File path, if the input came from a file.
        path: Option<PathBuf>,
        /// Parser error.
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse {
                path: Some(path),
                source,
            } => write!(f, "Failed to parse config {}: {source}", path.display()),
            ConfigError::Parse { path: None, source } => {
                write!(f, "Failed to parse config: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port reported at startup.
    pub port: u16,
    /// Logging facility settings.
    pub log: LogSettings,
    /// API token for the news tool; the tool is only registered when set.
    pub news_api_key: Option<String>,
    /// Weather host.
    pub weather_base_url: String,
    /// News API host.
    pub news_base_url: String,
    /// Timeout for outbound fetches, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            log: LogSettings::default(),
            news_api_key: None,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            news_base_url: DEFAULT_NEWS_BASE_URL.to_string(),
            fetch_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|source| ConfigError::Parse { path: None, source })
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&input).map_err(|source| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })
    }

    /// `<config dir>/wxmcp/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wxmcp").join("config.toml"))
    }

    /// Overrides fields from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `WXMCP_PORT` | `port` (ignored unless a valid port) |
    /// | `WXMCP_LOG_NAME` | `log.name` |
    /// | `WXMCP_LOG_FILE` | `log.file` |
    /// | `WXMCP_LOG_LEVEL` | `log.level` |
    /// | `NEWS_API_KEY` | `news_api_key` |
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_vars(|key| env::var(key).ok())
    }

    /// Like [`with_env`](Self::with_env) with a custom variable lookup.
    #[must_use]
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup("WXMCP_PORT").and_then(|v| v.trim().parse().ok()) {
            self.port = port;
        }
        if let Some(name) = lookup("WXMCP_LOG_NAME").filter(|v| !v.is_empty()) {
            self.log.name = name;
        }
        if let Some(file) = lookup("WXMCP_LOG_FILE").filter(|v| !v.is_empty()) {
            self.log.file = PathBuf::from(file);
        }
        if let Some(level) = lookup("WXMCP_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(key) = lookup("NEWS_API_KEY").filter(|v| !v.is_empty()) {
            self.news_api_key = Some(key);
        }
        self
    }

    /// Fetch timeout as a duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
