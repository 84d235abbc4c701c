//! Builder for configuring client instances

use std::time::Duration;

use reqwest::Url;

use super::OllamaKit;
use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::transport::{DEFAULT_STREAM_BUFFER, HttpTransport};
use crate::{OllamaKitError, Result, version};

/// Builder for [`OllamaKit`].
///
/// ```rust
/// use std::time::Duration;
///
/// let client = ollama_kit::OllamaKit::builder()
///     .base_url("http://gpu-box:11434")
///     .connect_timeout(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// assert_eq!(client.base_url(), "http://gpu-box:11434");
/// ```
#[derive(Debug)]
pub struct OllamaKitBuilder {
    base_url: String,
    bearer_token: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    stream_buffer: usize,
    http_client: Option<reqwest::Client>,
}

impl OllamaKitBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            bearer_token: None,
            timeout: None,
            connect_timeout: None,
            stream_buffer: DEFAULT_STREAM_BUFFER,
            http_client: None,
        }
    }

    /// Start from a loaded [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut builder = Self::new()
            .base_url(config.base_url.clone())
            .stream_buffer(config.stream_buffer);
        if let Some(token) = &config.bearer_token {
            builder = builder.bearer_token(token.clone());
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        builder
    }

    /// Server base URL (default: http://localhost:11434).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Overall per-request timeout. Applies to whole streaming responses too.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Number of decoded values buffered per stream before the producer
    /// stops reading from the socket (default: 64, minimum: 1).
    pub fn stream_buffer(mut self, capacity: usize) -> Self {
        self.stream_buffer = capacity;
        self
    }

    /// Use a preconfigured HTTP client. Timeouts set on this builder are then
    /// ignored; configure them on the supplied client instead.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`OllamaKitError::Configuration`] when the base URL is not an
    /// absolute http(s) URL, the stream buffer is zero, or the HTTP client
    /// cannot be constructed.
    pub fn build(self) -> Result<OllamaKit> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            OllamaKitError::Configuration(format!("invalid base URL {:?}: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OllamaKitError::Configuration(format!(
                "unsupported URL scheme {:?} (expected http or https)",
                url.scheme()
            )));
        }
        if self.stream_buffer == 0 {
            return Err(OllamaKitError::Configuration(
                "stream buffer must hold at least one value".to_string(),
            ));
        }

        let http = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder().user_agent(version::user_agent());
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(|e| {
                    OllamaKitError::Configuration(format!("failed to build HTTP client: {e}"))
                })?
            }
        };

        let transport =
            HttpTransport::new(http, self.base_url, self.bearer_token, self.stream_buffer);
        Ok(OllamaKit { transport })
    }
}

impl Default for OllamaKitBuilder {
    fn default() -> Self {
        Self::new()
    }
}
