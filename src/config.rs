//! Client configuration.
//!
//! Configuration is loaded from TOML with the following resolution order:
//! 1. explicit path (e.g. a `--config` flag)
//! 2. `<config dir>/ollama-kit/config.toml` (e.g. `~/.config/ollama-kit/config.toml`)
//! 3. built-in defaults
//!
//! Environment variables override file values:
//! - `OLLAMA_HOST`: base URL; a bare `host:port` gets an `http://` scheme
//! - `OLLAMA_API_KEY`: bearer token
//!
//! ```toml
//! base_url = "http://gpu-box:11434"
//! bearer_token = "secret"
//! connect_timeout_secs = 5
//! stream_buffer = 128
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::transport::DEFAULT_STREAM_BUFFER;
use crate::{OllamaKitError, Result};

/// Default Ollama endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Environment variable overriding the base URL.
pub const HOST_ENV_VAR: &str = "OLLAMA_HOST";

/// Environment variable providing the bearer token.
pub const API_KEY_ENV_VAR: &str = "OLLAMA_API_KEY";

/// Settings captured by an [`OllamaKit`](crate::OllamaKit) at construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Server base URL (default: http://localhost:11434).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional bearer token sent as `Authorization: Bearer <token>`.
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Overall request timeout in seconds. Unset means no limit, which is
    /// what long generations usually need.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Connection establishment timeout in seconds.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Decoded values buffered per stream (default: 64).
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            bearer_token: None,
            timeout_secs: None,
            connect_timeout_secs: None,
            stream_buffer: default_stream_buffer(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_stream_buffer() -> usize {
    DEFAULT_STREAM_BUFFER
}

impl ClientConfig {
    /// Load configuration from the standard locations.
    ///
    /// A missing explicit path is an error; a missing default file is not.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            OllamaKitError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            OllamaKitError::Configuration(msg) => {
                OllamaKitError::Configuration(format!("{path:?}: {msg}"))
            }
            other => other,
        })
    }

    /// Parse TOML configuration text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            OllamaKitError::Configuration(format!("Failed to parse config: {e}"))
        })
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup(HOST_ENV_VAR).filter(|h| !h.trim().is_empty()) {
            self.base_url = normalize_host(&host);
        }
        if let Some(token) = lookup(API_KEY_ENV_VAR).filter(|t| !t.is_empty()) {
            self.bearer_token = Some(token);
        }
        self
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(OllamaKitError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        Ok(default_config_path().filter(|p| p.exists()))
    }
}

/// `<config dir>/ollama-kit/config.toml`, if a config dir exists on this platform.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ollama-kit").join("config.toml"))
}

/// Turn an `OLLAMA_HOST`-style value into a base URL.
fn normalize_host(host: &str) -> String {
    let host = host.trim();
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_scheme() {
        assert_eq!(normalize_host("127.0.0.1:11434"), "http://127.0.0.1:11434");
        assert_eq!(normalize_host("https://ollama.example"), "https://ollama.example");
    }

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(ClientConfig::from_toml("").unwrap(), ClientConfig::default());
    }
}
