use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_FEED_PAGE_SIZE, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_SEARCH_PAGE_SIZE, DEFAULT_UPSTREAM_TIMEOUT_SECS, DEFAULT_UPSTREAM_URL,
    ENV_SPARK_API_KEY, MAX_PAGE_SIZE,
};

// =============================================================================
// File Config Structs (from JSON config file, all fields optional)
// =============================================================================

/// Server configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub allowed_origins: Option<Vec<String>>,
}

/// Upstream MLS configuration section (from JSON config file)
#[derive(Default, Clone, Deserialize)]
pub struct UpstreamFileConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub feed_page_size: Option<u32>,
    pub search_page_size: Option<u32>,
}

impl fmt::Debug for UpstreamFileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamFileConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("feed_page_size", &self.feed_page_size)
            .field("search_page_size", &self.search_page_size)
            .finish()
    }
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub upstream: Option<UpstreamFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
            if server.allowed_origins.is_some() {
                tracing::trace!(
                    allowed_origins = ?server.allowed_origins,
                    "Merging server.allowed_origins"
                );
                current.allowed_origins = server.allowed_origins;
            }
        }

        if let Some(upstream) = other.upstream {
            let current = self
                .upstream
                .get_or_insert_with(UpstreamFileConfig::default);
            if upstream.base_url.is_some() {
                tracing::trace!(base_url = ?upstream.base_url, "Merging upstream.base_url");
                current.base_url = upstream.base_url;
            }
            if upstream.token.is_some() {
                tracing::trace!(token = "***", "Merging upstream.token");
                current.token = upstream.token;
            }
            if upstream.timeout_secs.is_some() {
                tracing::trace!(
                    timeout_secs = ?upstream.timeout_secs,
                    "Merging upstream.timeout_secs"
                );
                current.timeout_secs = upstream.timeout_secs;
            }
            if upstream.feed_page_size.is_some() {
                tracing::trace!(
                    feed_page_size = ?upstream.feed_page_size,
                    "Merging upstream.feed_page_size"
                );
                current.feed_page_size = upstream.feed_page_size;
            }
            if upstream.search_page_size.is_some() {
                tracing::trace!(
                    search_page_size = ?upstream.search_page_size,
                    "Merging upstream.search_page_size"
                );
                current.search_page_size = upstream.search_page_size;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

/// Upstream MLS API configuration
#[derive(Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub token: Option<String>,
    /// Request deadline in seconds (0 = none)
    pub timeout_secs: u64,
    pub feed_page_size: u32,
    pub search_page_size: u32,
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("feed_page_size", &self.feed_page_size)
            .field("search_page_size", &self.search_page_size)
            .finish()
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.mls-proxy/mls-proxy.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_home(path);
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::from_layers(cli, file_config, std::env::var(ENV_SPARK_API_KEY).ok());
        config.validate()?;
        tracing::debug!(config = ?config, "Configuration loaded");
        Ok(config)
    }

    /// Layer defaults, merged file config and CLI/env overrides
    pub(crate) fn from_layers(
        cli: &CliConfig,
        file_config: FileConfig,
        legacy_token: Option<String>,
    ) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_upstream = file_config.upstream.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let base_url = cli
            .upstream_url
            .clone()
            .or(file_upstream.base_url)
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        // Dedicated flag/env first, then file, then the legacy Spark variable
        let token = cli
            .upstream_token
            .clone()
            .or(file_upstream.token)
            .or(legacy_token)
            .filter(|t| !t.trim().is_empty());

        let timeout_secs = cli
            .upstream_timeout
            .or(file_upstream.timeout_secs)
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);

        Self {
            server: ServerConfig {
                host,
                port,
                allowed_origins: file_server.allowed_origins.unwrap_or_default(),
            },
            upstream: UpstreamConfig {
                base_url,
                token,
                timeout_secs,
                feed_page_size: file_upstream
                    .feed_page_size
                    .unwrap_or(DEFAULT_FEED_PAGE_SIZE),
                search_page_size: file_upstream
                    .search_page_size
                    .unwrap_or(DEFAULT_SEARCH_PAGE_SIZE),
            },
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        let base_url = &self.upstream.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!(
                "Configuration error: upstream.base_url must be an http(s) URL, got '{}'",
                base_url
            );
        }

        for (key, size) in [
            ("upstream.feed_page_size", self.upstream.feed_page_size),
            ("upstream.search_page_size", self.upstream.search_page_size),
        ] {
            if size == 0 || size > MAX_PAGE_SIZE {
                anyhow::bail!(
                    "Configuration error: {} must be between 1 and {}, got {}",
                    key,
                    MAX_PAGE_SIZE,
                    size
                );
            }
        }

        if is_all_interfaces(&self.server.host) && self.server.allowed_origins.is_empty() {
            tracing::warn!(
                host = %self.server.host,
                "Binding to all network interfaces with CORS open to any origin"
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.mls-proxy/mls-proxy.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// Check if host binds to all network interfaces
fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
