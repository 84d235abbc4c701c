//! Incremental responses: a cancellable producer of decoded values.
//!
//! A producer task owns the byte source and an [`ObjectDecoder`]. Every chunk
//! is appended to the framer, which is drained immediately; each decoded
//! value goes through a bounded channel to the consumer. The task ends on the
//! first error, at end of body, or when cancelled. Ending drops the byte
//! source, which for HTTP closes the connection.
//!
//! ```text
//!  bytes ──► ObjectDecoder ──► mpsc (bounded) ──► ResponseStream ──► caller
//!                                                       └─► Publisher ──► Subscriber
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::FusedStream;
use futures_util::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use tokio::sync::{Notify, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use crate::framing::ObjectDecoder;
use crate::{OllamaKitError, Result, telemetry};

/// Default number of decoded values buffered between producer and consumer.
pub const DEFAULT_STREAM_BUFFER: usize = 64;

/// Boxed source of raw response bytes.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Cooperative cancellation shared by a stream, its producer and any
/// subscription built on it.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    inner: Arc<CancelState>,
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Lazy, finite, non-restartable sequence of values decoded from an
/// incremental response.
///
/// Ends after the first error. Dropping the stream or calling
/// [`cancel`](Self::cancel) stops the producer and closes the connection;
/// values already buffered at that point are discarded.
pub struct ResponseStream<T> {
    rx: ReceiverStream<Result<T>>,
    cancel: CancelHandle,
    finished: bool,
}

impl<T> std::fmt::Debug for ResponseStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseStream")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("finished", &self.finished)
            .finish()
    }
}

impl<T: DeserializeOwned + Send + 'static> ResponseStream<T> {
    /// Decode values from an arbitrary byte source.
    ///
    /// # Panics
    ///
    /// Requires a tokio runtime context (called within an async fn).
    pub fn from_byte_stream<S>(bytes: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self::spawn("bytes", DEFAULT_STREAM_BUFFER, async move {
            Ok(Box::pin(bytes) as ByteStream)
        })
    }

    /// Spawn a producer that first awaits `connect` (request sent, status
    /// validated) and then pumps the returned body.
    pub(crate) fn spawn<F>(route: &'static str, buffer: usize, connect: F) -> Self
    where
        F: Future<Output = Result<ByteStream>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let cancel = CancelHandle::new();
        tokio::spawn(produce::<T, F>(route, connect, tx, cancel.clone()));
        Self {
            rx: ReceiverStream::new(rx),
            cancel,
            finished: false,
        }
    }
}

impl<T> ResponseStream<T> {
    /// A stream that yields `error` once and ends.
    ///
    /// Used when a request cannot even be built; no runtime is needed.
    pub fn failed(error: OllamaKitError) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // capacity 1, freshly created: cannot be full or closed
        let _ = tx.try_send(Err(error));
        Self {
            rx: ReceiverStream::new(rx),
            cancel: CancelHandle::new(),
            finished: false,
        }
    }

    /// Stop the producer and end the stream.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A handle that can cancel this stream from elsewhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

impl<T> Stream for ResponseStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished || this.cancel.is_cancelled() {
            this.finished = true;
            return Poll::Ready(None);
        }
        match this.rx.poll_next_unpin(cx) {
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl<T> FusedStream for ResponseStream<T> {
    fn is_terminated(&self) -> bool {
        self.finished
    }
}

impl<T> Drop for ResponseStream<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn produce<T, F>(
    route: &'static str,
    connect: F,
    tx: mpsc::Sender<Result<T>>,
    cancel: CancelHandle,
) where
    T: DeserializeOwned + Send + 'static,
    F: Future<Output = Result<ByteStream>>,
{
    let connected = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(route, "stream cancelled before response");
            return;
        }
        connected = connect => connected,
    };
    let mut bytes = match connected {
        Ok(bytes) => bytes,
        Err(e) => {
            fail(route, &tx, &cancel, e).await;
            return;
        }
    };

    let mut decoder = ObjectDecoder::<T>::new();
    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(route, "stream cancelled");
                return;
            }
            chunk = bytes.next() => chunk,
        };
        match chunk {
            Some(Ok(chunk)) => {
                decoder.push(&chunk);
                while let Some(item) = decoder.next_value() {
                    match item {
                        Ok(value) => {
                            if !emit(&tx, &cancel, Ok(value)).await {
                                return;
                            }
                            metrics::counter!(telemetry::STREAM_VALUES_TOTAL, "route" => route)
                                .increment(1);
                        }
                        Err(e) => {
                            fail(route, &tx, &cancel, e).await;
                            return;
                        }
                    }
                }
            }
            Some(Err(e)) => {
                fail(route, &tx, &cancel, e).await;
                return;
            }
            None => {
                if let Err(e) = decoder.finish() {
                    warn!(
                        route,
                        remaining = decoder.remaining().len(),
                        "stream ended with unconsumed bytes"
                    );
                    fail(route, &tx, &cancel, e).await;
                } else {
                    debug!(route, "stream completed");
                }
                return;
            }
        }
    }
}

/// Send one item unless cancelled. Returns `false` when the producer should stop.
async fn emit<T>(tx: &mpsc::Sender<Result<T>>, cancel: &CancelHandle, item: Result<T>) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = tx.send(item) => sent.is_ok(),
    }
}

async fn fail<T>(
    route: &'static str,
    tx: &mpsc::Sender<Result<T>>,
    cancel: &CancelHandle,
    error: OllamaKitError,
) {
    debug!(route, error = %error, "stream failed");
    metrics::counter!(telemetry::STREAM_ERRORS_TOTAL, "route" => route, "kind" => error.kind())
        .increment(1);
    emit(tx, cancel, Err(error)).await;
}
