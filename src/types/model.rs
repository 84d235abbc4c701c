//! Model lifecycle types: listing, metadata, copy, delete, pull.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::completion::default_stream;
use crate::codec::timestamp;

/// Response of `GET /api/tags`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelList {
    pub models: Vec<ModelSummary>,
}

/// A locally available model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub name: String,
    pub digest: String,
    /// Size on disk in bytes.
    pub size: u64,
    #[serde(with = "timestamp")]
    pub modified_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ModelDetails>,
}

/// Architecture details reported for a model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub families: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantization_level: Option<String>,
}

/// Request body for `POST /api/show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfoRequest {
    pub name: String,
}

impl ModelInfoRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Model metadata returned by `POST /api/show`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub modelfile: String,
    #[serde(default)]
    pub parameters: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ModelDetails>,
}

/// Request body for `POST /api/copy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyModelRequest {
    pub source: String,
    pub destination: String,
}

impl CopyModelRequest {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Request body for `DELETE /api/delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteModelRequest {
    pub name: String,
}

impl DeleteModelRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Request body for `POST /api/pull`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullModelRequest {
    #[serde(default = "default_stream")]
    stream: bool,
    pub model: String,
    /// Allow insecure connections to the registry (development only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

impl PullModelRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            stream: true,
            model: model.into(),
            insecure: None,
        }
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = Some(insecure);
        self
    }

    /// Whether the request asks for an incremental response.
    pub fn is_stream(&self) -> bool {
        self.stream
    }
}

/// One progress record of a model pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullModelResponse {
    /// e.g. `"pulling manifest"`, `"downloading <digest>"`, `"success"`.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Layer size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Bytes downloaded so far.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<u64>,
}

impl PullModelResponse {
    /// The final record of a successful pull.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Download progress of the current layer in `0.0..=1.0`.
    pub fn progress(&self) -> Option<f64> {
        let total = self.total.filter(|t| *t > 0)?;
        Some(self.completed.unwrap_or(0) as f64 / total as f64)
    }
}
