//! Request and response shapes for the Ollama API.

mod chat;
mod completion;
mod embeddings;
mod generate;
mod json_value;
mod model;
mod options;
mod tool;

pub use chat::{ChatMessage, ChatRequest, ChatResponse, Role};
pub use completion::{CompletionStats, ResponseFormat};
pub use embeddings::{EmbeddingsRequest, EmbeddingsResponse};
pub use generate::{GenerateRequest, GenerateResponse};
pub use json_value::JsonValue;
pub use model::{
    CopyModelRequest, DeleteModelRequest, ModelDetails, ModelInfo, ModelInfoRequest, ModelList,
    ModelSummary, PullModelRequest, PullModelResponse,
};
pub use options::CompletionOptions;
pub use tool::{Function, Tool, ToolCall, ToolCallFunction};
