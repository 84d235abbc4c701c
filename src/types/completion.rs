//! Pieces shared by generate and chat requests/responses.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::JsonValue;

/// Timing and token statistics reported on the final fragment of a completion.
///
/// Durations are in nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_duration: Option<u64>,
}

impl CompletionStats {
    /// Generation speed in tokens per second, when both counters are present.
    pub fn tokens_per_second(&self) -> Option<f64> {
        let count = self.eval_count?;
        let nanos = self.eval_duration.filter(|d| *d > 0)?;
        Some(count as f64 / (nanos as f64 / 1_000_000_000.0))
    }
}

/// Structured output format: free-form JSON mode or a JSON schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// `"format": "json"`
    Json,
    /// `"format": { ...schema... }`
    Schema(JsonValue),
}

impl Serialize for ResponseFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ResponseFormat::Json => serializer.serialize_str("json"),
            ResponseFormat::Schema(schema) => schema.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ResponseFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match JsonValue::deserialize(deserializer)? {
            JsonValue::String(s) if s == "json" => Ok(ResponseFormat::Json),
            JsonValue::String(other) => Err(de::Error::custom(format!(
                "unknown response format '{other}'"
            ))),
            schema => Ok(ResponseFormat::Schema(schema)),
        }
    }
}

/// Streaming requests default to `stream: true` when the field is absent.
pub(crate) fn default_stream() -> bool {
    true
}
