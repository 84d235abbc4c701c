//! Tests for push-style delivery through [`Publisher`] and [`Subscriber`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream;
use serde::Deserialize;
use tokio::sync::mpsc;

use ollama_kit::{Completion, OllamaKitError, Publisher, ResponseStream, Result, Subscriber};

#[derive(Debug, Deserialize, PartialEq)]
struct Fragment {
    n: u32,
}

#[derive(Debug, PartialEq)]
enum Event {
    Next(u32),
    Error,
    Complete,
}

/// Subscriber that records every callback.
#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    fn events(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl Subscriber<Fragment> for Recorder {
    fn on_next(&mut self, value: Fragment) {
        self.events.lock().unwrap().push(Event::Next(value.n));
    }

    fn on_error(&mut self, _error: OllamaKitError) {
        self.events.lock().unwrap().push(Event::Error);
    }

    fn on_complete(&mut self) {
        self.events.lock().unwrap().push(Event::Complete);
    }
}

fn publisher_of(body: &'static str) -> Publisher<Fragment> {
    Publisher::new(move || {
        let chunks: Vec<Result<Bytes>> = vec![Ok(Bytes::from_static(body.as_bytes()))];
        ResponseStream::from_byte_stream(stream::iter(chunks))
    })
}

#[tokio::test]
async fn values_then_completion() {
    let recorder = Recorder::default();
    publisher_of(r#"{"n":1}{"n":2}"#)
        .subscribe(recorder.clone())
        .join()
        .await;

    assert_eq!(
        recorder.events(),
        vec![Event::Next(1), Event::Next(2), Event::Complete]
    );
}

#[tokio::test]
async fn decode_error_goes_to_on_error_only() {
    let recorder = Recorder::default();
    publisher_of(r#"{"n":1}{"n":null}{"n":3}"#)
        .subscribe(recorder.clone())
        .join()
        .await;

    assert_eq!(recorder.events(), vec![Event::Next(1), Event::Error]);
}

#[tokio::test]
async fn nothing_happens_before_subscribe() {
    let started = Arc::new(Mutex::new(false));
    let flag = started.clone();
    let publisher: Publisher<Fragment> = Publisher::new(move || {
        *flag.lock().unwrap() = true;
        ResponseStream::failed(OllamaKitError::Configuration("unused".to_string()))
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!*started.lock().unwrap());

    publisher.subscribe(Recorder::default()).join().await;
    assert!(*started.lock().unwrap());
}

#[tokio::test]
async fn failed_publisher_reports_error() {
    let recorder = Recorder::default();
    Publisher::<Fragment>::failed(OllamaKitError::Configuration("bad".to_string()))
        .subscribe(recorder.clone())
        .join()
        .await;

    assert_eq!(recorder.events(), vec![Event::Error]);
}

#[tokio::test]
async fn cancel_after_first_value_suppresses_completion() {
    let (tx, rx) = mpsc::unbounded_channel::<Result<Bytes>>();
    let source = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    });
    let publisher = Publisher::new(move || ResponseStream::<Fragment>::from_byte_stream(source));

    let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
    let completions = Arc::new(Mutex::new(Vec::new()));
    let sink_completions = completions.clone();
    let subscription = publisher.sink(
        move |value: Fragment| {
            let _ = seen_tx.send(value.n);
        },
        move |completion| sink_completions.lock().unwrap().push(completion),
    );

    tx.send(Ok(Bytes::from_static(br#"{"n":1}"#))).unwrap();
    assert_eq!(seen_rx.recv().await, Some(1));

    subscription.cancel();
    assert!(subscription.is_cancelled());
    let _ = tx.send(Ok(Bytes::from_static(br#"{"n":2}{"n":3}"#)));
    drop(tx);

    tokio::time::timeout(Duration::from_secs(1), subscription.join())
        .await
        .expect("subscription should end after cancel");

    let mut rest = Vec::new();
    while let Ok(n) = seen_rx.try_recv() {
        rest.push(n);
    }
    assert!(rest.is_empty(), "values after cancel: {rest:?}");
    assert!(completions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sink_reports_finished() {
    let values = Arc::new(Mutex::new(Vec::new()));
    let finished = Arc::new(Mutex::new(None));
    let (v, f) = (values.clone(), finished.clone());

    publisher_of(r#"{"n":7}"#)
        .sink(
            move |value| v.lock().unwrap().push(value.n),
            move |completion| *f.lock().unwrap() = Some(completion),
        )
        .join()
        .await;

    assert_eq!(*values.lock().unwrap(), vec![7]);
    assert!(matches!(
        finished.lock().unwrap().take(),
        Some(Completion::Finished)
    ));
}
