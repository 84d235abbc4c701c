//! The client facade.
//!
//! [`OllamaKit`] turns each API operation into a [`Route`], hands the
//! resulting descriptor to its [`HttpTransport`], and returns the outcome in
//! the style the operation calls for: a future for single-shot calls, a
//! [`ResponseStream`] or [`Publisher`] for incremental ones.

mod builder;

pub use builder::OllamaKitBuilder;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::route::Route;
use crate::transport::{HttpTransport, Publisher, ResponseStream};
use crate::types::{
    ChatRequest, ChatResponse, CopyModelRequest, DeleteModelRequest, EmbeddingsRequest,
    EmbeddingsResponse, GenerateRequest, GenerateResponse, ModelInfo, ModelInfoRequest, ModelList,
    PullModelRequest, PullModelResponse,
};
use crate::Result;

/// Client for an Ollama server.
///
/// Cheap to clone; clones share the connection pool. Streaming and publisher
/// methods spawn tokio tasks and must be called inside a runtime.
#[derive(Debug, Clone)]
pub struct OllamaKit {
    transport: HttpTransport,
}

impl OllamaKit {
    /// Create a new builder.
    pub fn builder() -> OllamaKitBuilder {
        OllamaKitBuilder::new()
    }

    /// Client for `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        OllamaKitBuilder::new().base_url(base_url).build()
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        OllamaKitBuilder::from_config(config).build()
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Whether the server answers `HEAD /` with a success status.
    ///
    /// Never fails: any error counts as unreachable.
    #[instrument(skip(self))]
    pub async fn reachable(&self) -> bool {
        let result = async {
            let request = Route::Root.to_request()?;
            self.transport.send_empty(request).await
        }
        .await;
        match result {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "server not reachable");
                false
            }
        }
    }

    /// List locally available models.
    #[instrument(skip(self))]
    pub async fn models(&self) -> Result<ModelList> {
        self.send(Route::Models).await
    }

    /// Fetch license, template, modelfile and parameters of a model.
    #[instrument(skip(self, request), fields(model = %request.name))]
    pub async fn model_info(&self, request: &ModelInfoRequest) -> Result<ModelInfo> {
        self.send(Route::ModelInfo(request)).await
    }

    /// Stream a completion for a prompt.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub fn generate(&self, request: &GenerateRequest) -> ResponseStream<GenerateResponse> {
        self.stream(Route::Generate(request))
    }

    /// Push-style variant of [`generate`](Self::generate); the request is
    /// sent on subscription.
    pub fn generate_publisher(&self, request: &GenerateRequest) -> Publisher<GenerateResponse> {
        self.publisher(Route::Generate(request))
    }

    /// Stream an assistant reply to a conversation.
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    pub fn chat(&self, request: &ChatRequest) -> ResponseStream<ChatResponse> {
        self.stream(Route::Chat(request))
    }

    pub fn chat_publisher(&self, request: &ChatRequest) -> Publisher<ChatResponse> {
        self.publisher(Route::Chat(request))
    }

    #[instrument(skip(self, request), fields(source = %request.source, destination = %request.destination))]
    pub async fn copy_model(&self, request: &CopyModelRequest) -> Result<()> {
        self.send_empty(Route::CopyModel(request)).await
    }

    #[instrument(skip(self, request), fields(model = %request.name))]
    pub async fn delete_model(&self, request: &DeleteModelRequest) -> Result<()> {
        self.send_empty(Route::DeleteModel(request)).await
    }

    /// Download a model, streaming progress updates.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub fn pull_model(&self, request: &PullModelRequest) -> ResponseStream<PullModelResponse> {
        self.stream(Route::PullModel(request))
    }

    pub fn pull_model_publisher(&self, request: &PullModelRequest) -> Publisher<PullModelResponse> {
        self.publisher(Route::PullModel(request))
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn embeddings(&self, request: &EmbeddingsRequest) -> Result<EmbeddingsResponse> {
        self.send(Route::Embeddings(request)).await
    }

    async fn send<T: DeserializeOwned>(&self, route: Route<'_>) -> Result<T> {
        let request = route.to_request()?;
        self.transport.send(request).await
    }

    async fn send_empty(&self, route: Route<'_>) -> Result<()> {
        let request = route.to_request()?;
        self.transport.send_empty(request).await
    }

    fn stream<T>(&self, route: Route<'_>) -> ResponseStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        match route.to_request() {
            Ok(request) => self.transport.stream(request),
            Err(e) => ResponseStream::failed(e),
        }
    }

    /// The descriptor is built eagerly so the publisher does not borrow the
    /// request; only sending is deferred.
    fn publisher<T>(&self, route: Route<'_>) -> Publisher<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        match route.to_request() {
            Ok(request) => {
                let transport = self.transport.clone();
                Publisher::new(move || transport.stream(request))
            }
            Err(e) => Publisher::failed(e),
        }
    }
}
