//! HTTP transports: single-shot requests and incremental responses.

mod publisher;
mod stream;

pub use publisher::{Completion, Publisher, Subscriber, Subscription};
pub use stream::{ByteStream, CancelHandle, DEFAULT_STREAM_BUFFER, ResponseStream};

use std::time::Instant;

use futures_util::StreamExt;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::route::RequestDescriptor;
use crate::{OllamaKitError, Result, codec, telemetry};

/// Map a response status to success or a protocol error.
///
/// Success is exactly `200..=299`.
pub fn ensure_success(status: StatusCode) -> Result<()> {
    if (200..=299).contains(&status.as_u16()) {
        Ok(())
    } else {
        Err(OllamaKitError::BadServerResponse {
            status: status.as_u16(),
        })
    }
}

/// Executes request descriptors against one server.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
    bearer_token: Option<String>,
    stream_buffer: usize,
}

impl HttpTransport {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        bearer_token: Option<String>,
        stream_buffer: usize,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token,
            stream_buffer,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build the connection-level request from a descriptor.
    fn build(&self, request: RequestDescriptor) -> Result<reqwest::RequestBuilder> {
        let url = self.url(request.path());
        let (method, headers, body) = request.into_parts();
        let mut builder = self.http.request(method, url).headers(headers);
        if let Some(token) = &self.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                OllamaKitError::Configuration(format!("invalid bearer token: {e}"))
            })?;
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        Ok(builder)
    }

    async fn execute(&self, request: RequestDescriptor) -> Result<reqwest::Response> {
        let route = request.name();
        debug!(route, method = %request.method(), path = request.path(), "sending request");
        let response = self.build(request)?.send().await?;
        let status = response.status();
        debug!(route, status = status.as_u16(), "response received");
        ensure_success(status)?;
        Ok(response)
    }

    /// Send a request, await the full body and decode it once.
    pub async fn send<T: DeserializeOwned>(&self, request: RequestDescriptor) -> Result<T> {
        let route = request.name();
        let start = Instant::now();
        let result = async {
            let response = self.execute(request).await?;
            let body = response.bytes().await?;
            codec::decode(&body)
        }
        .await;
        record(route, start, result.is_ok());
        result
    }

    /// Send a request whose body carries no meaningful data; only the status
    /// is validated.
    pub async fn send_empty(&self, request: RequestDescriptor) -> Result<()> {
        let route = request.name();
        let start = Instant::now();
        let result = self.execute(request).await.map(drop);
        record(route, start, result.is_ok());
        result
    }

    /// Start an incremental request.
    ///
    /// The request is sent from a spawned producer task; see
    /// [`ResponseStream`] for delivery and cancellation semantics.
    ///
    /// # Panics
    ///
    /// Requires a tokio runtime context.
    pub fn stream<T>(&self, request: RequestDescriptor) -> ResponseStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let route = request.name();
        let transport = self.clone();
        ResponseStream::spawn(route, self.stream_buffer, async move {
            let response = transport.execute(request).await?;
            let bytes = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(OllamaKitError::from));
            Ok(Box::pin(bytes) as ByteStream)
        })
    }
}

fn record(route: &'static str, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::REQUESTS_TOTAL, "route" => route, "status" => status)
        .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "route" => route)
        .record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_boundaries() {
        for ok in [200, 204, 299] {
            assert!(ensure_success(StatusCode::from_u16(ok).unwrap()).is_ok(), "{ok}");
        }
        for bad in [199, 300, 404, 500] {
            let err = ensure_success(StatusCode::from_u16(bad).unwrap()).unwrap_err();
            assert_eq!(err.status(), Some(bad));
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new(Client::new(), "http://localhost:11434/", None, 8);
        assert_eq!(transport.url("/api/tags"), "http://localhost:11434/api/tags");
    }
}
