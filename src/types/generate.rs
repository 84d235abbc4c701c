//! Types for text generation (`/api/generate`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::completion::default_stream;
use super::{CompletionOptions, CompletionStats, ResponseFormat};
use crate::codec::timestamp;

/// Request body for `/api/generate`.
///
/// Always sent with `stream: true`; fragments arrive as [`GenerateResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default = "default_stream")]
    stream: bool,

    /// Model to use for generation.
    pub model: String,

    pub prompt: String,

    /// Text after the model response (fill-in-the-middle).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Base64-encoded images for multimodal models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ResponseFormat>,

    /// System message overriding the Modelfile's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Prompt template overriding the Modelfile's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Context returned by a previous response, for short conversational memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<i64>>,

    /// Send the prompt without applying any template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<bool>,

    /// How long the model stays loaded after the request (e.g. `"5m"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<CompletionOptions>,
}

impl GenerateRequest {
    /// Create a request for `model` with `prompt`.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            stream: true,
            model: model.into(),
            prompt: prompt.into(),
            suffix: None,
            images: None,
            format: None,
            system: None,
            template: None,
            context: None,
            raw: None,
            keep_alive: None,
            options: None,
        }
    }

    /// Whether the request asks for an incremental response.
    pub fn is_stream(&self) -> bool {
        self.stream
    }

    /// Set the system message.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Attach base64-encoded images.
    pub fn images(mut self, images: Vec<String>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Continue from the context of a previous response.
    pub fn context(mut self, context: Vec<i64>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }

    pub fn options(mut self, options: CompletionOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// One fragment of a streamed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub model: String,

    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    /// Text produced since the previous fragment.
    pub response: String,

    /// Set on the last fragment.
    pub done: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<String>,

    /// Conversation encoding to pass to the next request's `context`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<i64>>,

    #[serde(flatten)]
    pub stats: CompletionStats,
}
