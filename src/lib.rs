//! ollama-kit - async client for the Ollama HTTP API
//!
//! Covers model listing and metadata, text generation, chat with tool
//! calling, embeddings, and model copy/delete/pull. Incremental responses
//! arrive as back-to-back JSON objects; they are framed and decoded as the
//! bytes come in and surfaced either as a [`ResponseStream`] (pull) or a
//! [`Publisher`] (push).
//!
//! # Generate Example
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use ollama_kit::{GenerateRequest, OllamaKit};
//!
//! #[tokio::main]
//! async fn main() -> ollama_kit::Result<()> {
//!     let client = OllamaKit::new("http://localhost:11434")?;
//!
//!     let mut stream = client.generate(&GenerateRequest::new("llama2", "Why is the sky blue?"));
//!     while let Some(fragment) = stream.next().await {
//!         print!("{}", fragment?.response);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Chat Example
//!
//! ```rust,no_run
//! use ollama_kit::{ChatMessage, ChatRequest, Completion, OllamaKit};
//!
//! #[tokio::main]
//! async fn main() -> ollama_kit::Result<()> {
//!     let client = OllamaKit::builder()
//!         .base_url("http://localhost:11434")
//!         .bearer_token("secret")
//!         .build()?;
//!
//!     let request = ChatRequest::new(
//!         "llama2",
//!         vec![
//!             ChatMessage::system("You are a helpful assistant."),
//!             ChatMessage::user("What is the capital of France?"),
//!         ],
//!     );
//!
//!     let subscription = client.chat_publisher(&request).sink(
//!         |reply| print!("{}", reply.content()),
//!         |completion| {
//!             if let Completion::Failed(e) = completion {
//!                 eprintln!("chat failed: {e}");
//!             }
//!         },
//!     );
//!     subscription.join().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod framing;
pub mod route;
pub mod telemetry;
pub mod transport;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use client::{OllamaKit, OllamaKitBuilder};
pub use config::ClientConfig;
pub use error::{OllamaKitError, Result};
pub use transport::{CancelHandle, Completion, Publisher, ResponseStream, Subscriber, Subscription};
pub use version::PKG_VERSION;

// Re-export all types
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, CompletionOptions, CompletionStats, CopyModelRequest,
    DeleteModelRequest, EmbeddingsRequest, EmbeddingsResponse, Function, GenerateRequest,
    GenerateResponse, JsonValue, ModelDetails, ModelInfo, ModelInfoRequest, ModelList,
    ModelSummary, PullModelRequest, PullModelResponse, ResponseFormat, Role, Tool, ToolCall,
    ToolCallFunction,
};
