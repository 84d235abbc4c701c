//! Route table: operation + payload → request descriptor.
//!
//! Pure and stateless. The base URL and credential are attached later by the
//! transport, so the same descriptor works against any server.

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::codec;
use crate::types::{
    ChatRequest, CopyModelRequest, DeleteModelRequest, EmbeddingsRequest, GenerateRequest,
    ModelInfoRequest, PullModelRequest,
};
use crate::Result;

/// One API operation together with its payload.
#[derive(Debug, Clone, Copy)]
pub enum Route<'a> {
    /// Reachability probe against the service root.
    Root,
    Models,
    ModelInfo(&'a ModelInfoRequest),
    Generate(&'a GenerateRequest),
    Chat(&'a ChatRequest),
    CopyModel(&'a CopyModelRequest),
    DeleteModel(&'a DeleteModelRequest),
    PullModel(&'a PullModelRequest),
    Embeddings(&'a EmbeddingsRequest),
}

impl Route<'_> {
    /// Short name used in logs and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            Route::Root => "root",
            Route::Models => "tags",
            Route::ModelInfo(_) => "show",
            Route::Generate(_) => "generate",
            Route::Chat(_) => "chat",
            Route::CopyModel(_) => "copy",
            Route::DeleteModel(_) => "delete",
            Route::PullModel(_) => "pull",
            Route::Embeddings(_) => "embeddings",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Models => "/api/tags",
            Route::ModelInfo(_) => "/api/show",
            Route::Generate(_) => "/api/generate",
            Route::Chat(_) => "/api/chat",
            Route::CopyModel(_) => "/api/copy",
            Route::DeleteModel(_) => "/api/delete",
            Route::PullModel(_) => "/api/pull",
            Route::Embeddings(_) => "/api/embeddings",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Route::Root => Method::HEAD,
            Route::Models => Method::GET,
            Route::DeleteModel(_) => Method::DELETE,
            Route::ModelInfo(_)
            | Route::Generate(_)
            | Route::Chat(_)
            | Route::CopyModel(_)
            | Route::PullModel(_)
            | Route::Embeddings(_) => Method::POST,
        }
    }

    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Encoded request body, `None` for bodyless routes.
    pub fn body(&self) -> Result<Option<Vec<u8>>> {
        let body = match self {
            Route::Root | Route::Models => return Ok(None),
            Route::ModelInfo(data) => codec::encode(data)?,
            Route::Generate(data) => codec::encode(data)?,
            Route::Chat(data) => codec::encode(data)?,
            Route::CopyModel(data) => codec::encode(data)?,
            Route::DeleteModel(data) => codec::encode(data)?,
            Route::PullModel(data) => codec::encode(data)?,
            Route::Embeddings(data) => codec::encode(data)?,
        };
        Ok(Some(body))
    }

    /// Build the request descriptor for this route.
    pub fn to_request(&self) -> Result<RequestDescriptor> {
        Ok(RequestDescriptor {
            name: self.name(),
            path: self.path(),
            method: self.method(),
            headers: self.headers(),
            body: self.body()?,
        })
    }
}

/// An immutable, fully built request, consumed once by a transport.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    name: &'static str,
    path: &'static str,
    method: Method,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub(crate) fn into_parts(self) -> (Method, HeaderMap, Option<Vec<u8>>) {
        (self.method, self.headers, self.body)
    }
}
