//! Push-style delivery of incremental responses.
//!
//! A [`Publisher`] is a thin adapter over [`ResponseStream`]: subscribing
//! starts the request and spawns a task that forwards each value to a
//! [`Subscriber`]. Delivery is fail-fast: the first error is passed to
//! `on_error` and nothing follows it.

use futures_util::StreamExt;
use tokio::task::JoinHandle;

use super::stream::{CancelHandle, ResponseStream};
use crate::OllamaKitError;

/// Receiver of pushed values.
///
/// Exactly one of `on_error` / `on_complete` is called at the end, unless the
/// subscription was cancelled first, in which case neither is.
pub trait Subscriber<T>: Send + 'static {
    fn on_next(&mut self, value: T);

    fn on_error(&mut self, error: OllamaKitError);

    fn on_complete(&mut self);
}

/// How a publisher finished.
#[derive(Debug)]
pub enum Completion {
    Finished,
    Failed(OllamaKitError),
}

/// Lazily started source of values; nothing is sent before
/// [`subscribe`](Self::subscribe).
pub struct Publisher<T> {
    source: Box<dyn FnOnce() -> ResponseStream<T> + Send>,
}

impl<T> std::fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Publisher<T> {
    /// Create a publisher whose stream is produced by `source` on subscription.
    pub fn new(source: impl FnOnce() -> ResponseStream<T> + Send + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// A publisher that fails immediately with `error` when subscribed.
    pub fn failed(error: OllamaKitError) -> Self {
        Self::new(move || ResponseStream::failed(error))
    }

    /// Start the request and return the pull-style stream instead.
    pub fn into_stream(self) -> ResponseStream<T> {
        (self.source)()
    }

    /// Start the request and push values to `subscriber`.
    ///
    /// # Panics
    ///
    /// Requires a tokio runtime context.
    pub fn subscribe<S: Subscriber<T>>(self, mut subscriber: S) -> Subscription {
        let mut stream = self.into_stream();
        let cancel = stream.cancel_handle();
        let task = tokio::spawn(async move {
            while let Some(item) = stream.next().await {
                if stream.is_cancelled() {
                    return;
                }
                match item {
                    Ok(value) => subscriber.on_next(value),
                    Err(error) => {
                        subscriber.on_error(error);
                        return;
                    }
                }
            }
            if !stream.is_cancelled() {
                subscriber.on_complete();
            }
        });
        Subscription { cancel, task }
    }

    /// Subscribe with closures, one per value and one for the end of the stream.
    pub fn sink<V, C>(self, on_value: V, on_completion: C) -> Subscription
    where
        V: FnMut(T) + Send + 'static,
        C: FnMut(Completion) + Send + 'static,
    {
        self.subscribe(Sink {
            on_value,
            on_completion,
        })
    }
}

struct Sink<V, C> {
    on_value: V,
    on_completion: C,
}

impl<T, V, C> Subscriber<T> for Sink<V, C>
where
    V: FnMut(T) + Send + 'static,
    C: FnMut(Completion) + Send + 'static,
{
    fn on_next(&mut self, value: T) {
        (self.on_value)(value);
    }

    fn on_error(&mut self, error: OllamaKitError) {
        (self.on_completion)(Completion::Failed(error));
    }

    fn on_complete(&mut self) {
        (self.on_completion)(Completion::Finished);
    }
}

/// Handle to an active subscription.
///
/// Dropping the handle does not cancel; call [`cancel`](Self::cancel).
#[derive(Debug)]
pub struct Subscription {
    cancel: CancelHandle,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Stop delivery and close the connection. No further callbacks fire.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether delivery has ended (completed, failed or cancelled).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until delivery has ended.
    pub async fn join(self) {
        // a panicking subscriber just ends delivery
        let _ = self.task.await;
    }
}
