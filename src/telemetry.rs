//! Telemetry metric name constants.
//!
//! Centralised metric names for ollama-kit operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `ollama_kit_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `route`: route name (e.g. "chat", "tags", "embeddings")
//! - `status`: outcome: "ok" or "error"
//! - `kind`: error class: "transport", "protocol", "framing", "decode"

/// Total non-streaming requests completed.
///
/// Labels: `route`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "ollama_kit_requests_total";

/// Non-streaming request duration in seconds.
///
/// Labels: `route`.
pub const REQUEST_DURATION_SECONDS: &str = "ollama_kit_request_duration_seconds";

/// Total values decoded and emitted by streaming calls.
///
/// Labels: `route`.
pub const STREAM_VALUES_TOTAL: &str = "ollama_kit_stream_values_total";

/// Total streaming calls that terminated with an error.
///
/// Labels: `route`, `kind`.
pub const STREAM_ERRORS_TOTAL: &str = "ollama_kit_stream_errors_total";
