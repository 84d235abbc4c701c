//! Types for embeddings (`/api/embeddings`).

use serde::{Deserialize, Serialize};

use super::CompletionOptions;

/// Request body for `POST /api/embeddings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsRequest {
    pub model: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CompletionOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

impl EmbeddingsRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options: None,
            keep_alive: None,
        }
    }

    pub fn options(mut self, options: CompletionOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }
}

/// Embedding vector for the prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsResponse {
    #[serde(default)]
    pub embedding: Option<Vec<f64>>,
}

impl EmbeddingsResponse {
    /// Number of dimensions, 0 when no embedding was returned.
    pub fn dimensions(&self) -> usize {
        self.embedding.as_ref().map_or(0, Vec::len)
    }
}
