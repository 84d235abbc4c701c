//! Tests for [`ResponseStream`] over in-memory byte sources: ordering,
//! termination, and cancellation.

use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::{self, FusedStream};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use ollama_kit::{OllamaKitError, ResponseStream, Result};

#[derive(Debug, Deserialize, PartialEq)]
struct Fragment {
    n: u32,
}

fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
    let items: Vec<Result<Bytes>> = parts
        .iter()
        .map(|p| Ok(Bytes::from_static(p.as_bytes())))
        .collect();
    stream::iter(items)
}

/// A byte source fed by hand, for controlling delivery timing.
fn channel_source() -> (
    mpsc::UnboundedSender<Result<Bytes>>,
    impl Stream<Item = Result<Bytes>> + Send + 'static,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let source = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    });
    (tx, source)
}

async fn collect(stream: ResponseStream<Fragment>) -> Vec<Result<Fragment>> {
    stream.collect().await
}

// =============================================================================
// Ordering and completion
// =============================================================================

#[tokio::test]
async fn values_arrive_in_order_across_chunk_boundaries() {
    let source = chunks(&[r#"{"n":1}{"#, r#""n":2"#, r#"}{"n""#, r#":3}"#]);
    let values: Vec<u32> = collect(ResponseStream::from_byte_stream(source))
        .await
        .into_iter()
        .map(|r| r.unwrap().n)
        .collect();
    assert_eq!(values, vec![1, 2, 3]);
}

#[tokio::test]
async fn trailing_whitespace_completes_cleanly() {
    let source = chunks(&["{\"n\":1}\n", "{\"n\":2}\n\n"]);
    let items = collect(ResponseStream::from_byte_stream(source)).await;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(Result::is_ok));
}

#[tokio::test]
async fn empty_source_completes_with_no_values() {
    let items = collect(ResponseStream::from_byte_stream(chunks(&[]))).await;
    assert!(items.is_empty());
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn decode_error_is_terminal() {
    let source = chunks(&[r#"{"n":1}{"n":"two"}{"n":3}"#]);
    let items = collect(ResponseStream::from_byte_stream(source)).await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), &Fragment { n: 1 });
    assert!(matches!(items[1], Err(OllamaKitError::Decode(_))));
}

/// Deliberate choice: a stream that ends inside an object reports a framing
/// error after the values that did arrive.
#[tokio::test]
async fn truncated_object_at_end_is_a_framing_error() {
    let source = chunks(&[r#"{"n":1}{"n":"#]);
    let items = collect(ResponseStream::from_byte_stream(source)).await;
    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(matches!(items[1], Err(OllamaKitError::Framing { remaining: 5 })));
}

#[tokio::test]
async fn source_error_is_forwarded_and_ends_stream() {
    let items: Vec<Result<Bytes>> = vec![
        Ok(Bytes::from_static(br#"{"n":1}"#)),
        Err(OllamaKitError::Configuration("boom".to_string())),
        Ok(Bytes::from_static(br#"{"n":2}"#)),
    ];
    let mut stream = ResponseStream::<Fragment>::from_byte_stream(stream::iter(items));

    assert_eq!(stream.next().await.unwrap().unwrap().n, 1);
    assert!(matches!(
        stream.next().await,
        Some(Err(OllamaKitError::Configuration(_)))
    ));
    assert!(stream.next().await.is_none());
    assert!(stream.is_terminated());
}

#[tokio::test]
async fn failed_stream_yields_single_error() {
    let mut stream = ResponseStream::<Fragment>::failed(OllamaKitError::Configuration(
        "bad request".to_string(),
    ));
    assert!(stream.next().await.unwrap().is_err());
    assert!(stream.next().await.is_none());
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn cancel_after_first_of_three_delivers_at_most_one() {
    let (tx, source) = channel_source();
    let mut stream = ResponseStream::<Fragment>::from_byte_stream(source);

    tx.send(Ok(Bytes::from_static(br#"{"n":1}"#))).unwrap();
    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.n, 1);

    stream.cancel();
    let _ = tx.send(Ok(Bytes::from_static(br#"{"n":2}{"n":3}"#)));
    drop(tx);

    assert!(stream.is_cancelled());
    assert!(stream.next().await.is_none());
    assert!(stream.is_terminated());
}

#[tokio::test]
async fn cancel_discards_buffered_values() {
    let source = chunks(&[r#"{"n":1}{"n":2}{"n":3}"#]);
    let mut stream = ResponseStream::<Fragment>::from_byte_stream(source);

    // let the producer run ahead into the channel
    tokio::time::sleep(Duration::from_millis(20)).await;
    stream.cancel();
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn cancel_handle_stops_from_another_task() {
    let (tx, source) = channel_source();
    let mut stream = ResponseStream::<Fragment>::from_byte_stream(source);
    let handle = stream.cancel_handle();

    let canceller = tokio::spawn(async move {
        handle.cancelled().await;
    });
    stream.cancel_handle().cancel();
    tokio::time::timeout(Duration::from_secs(1), canceller)
        .await
        .expect("cancelled() should resolve")
        .unwrap();

    drop(tx);
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn dropping_stream_releases_source() {
    let (tx, source) = channel_source();
    let stream = ResponseStream::<Fragment>::from_byte_stream(source);
    tx.send(Ok(Bytes::from_static(br#"{"n":1}"#))).unwrap();
    drop(stream);

    // the producer drops its source once it observes cancellation
    tokio::time::timeout(Duration::from_secs(1), tx.closed())
        .await
        .expect("source should be dropped after the stream");
}
