//! ollama-kit error types

/// Errors produced by [`OllamaKit`](crate::OllamaKit) calls.
///
/// Every variant is terminal for the call that produced it: async calls
/// return it, streams yield it as their last item, publishers deliver it
/// through [`Subscriber::on_error`](crate::Subscriber::on_error).
#[derive(Debug, thiserror::Error)]
pub enum OllamaKitError {
    // Transport errors
    /// Connection could not be established, was interrupted, or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status outside `200..=299`.
    #[error("bad server response (HTTP {status})")]
    BadServerResponse { status: u16 },

    // Streaming errors
    /// The stream ended while an unbalanced or partial object was still buffered.
    #[error("framing error: stream ended with {remaining} unconsumed bytes")]
    Framing { remaining: usize },

    // Data errors
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl OllamaKitError {
    /// HTTP status code of a protocol error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            OllamaKitError::BadServerResponse { status } => Some(*status),
            OllamaKitError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short label used for metrics and logs.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            OllamaKitError::Http(_) => "transport",
            OllamaKitError::BadServerResponse { .. } => "protocol",
            OllamaKitError::Framing { .. } => "framing",
            OllamaKitError::Decode(_) => "decode",
            OllamaKitError::Encode(_) => "encode",
            OllamaKitError::Configuration(_) => "configuration",
        }
    }
}

/// Result type alias for ollama-kit operations
pub type Result<T> = std::result::Result<T, OllamaKitError>;
