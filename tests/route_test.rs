//! Tests for the route table: operation → method, path, headers and body.

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;

use ollama_kit::route::Route;
use ollama_kit::{
    ChatMessage, ChatRequest, CopyModelRequest, DeleteModelRequest, EmbeddingsRequest,
    GenerateRequest, ModelInfoRequest, PullModelRequest,
};

fn body_json(route: Route<'_>) -> serde_json::Value {
    let request = route.to_request().unwrap();
    serde_json::from_slice(request.body().expect("route has a body")).unwrap()
}

#[test]
fn bodyless_routes() {
    let root = Route::Root.to_request().unwrap();
    assert_eq!(root.method(), Method::HEAD);
    assert_eq!(root.path(), "/");
    assert!(root.body().is_none());

    let tags = Route::Models.to_request().unwrap();
    assert_eq!(tags.method(), Method::GET);
    assert_eq!(tags.path(), "/api/tags");
    assert!(tags.body().is_none());
}

#[test]
fn method_and_path_per_operation() {
    let info = ModelInfoRequest::new("m");
    let generate = GenerateRequest::new("m", "p");
    let chat = ChatRequest::new("m", vec![]);
    let copy = CopyModelRequest::new("a", "b");
    let delete = DeleteModelRequest::new("m");
    let pull = PullModelRequest::new("m");
    let embeddings = EmbeddingsRequest::new("m", "p");

    let cases = [
        (Route::ModelInfo(&info), Method::POST, "/api/show"),
        (Route::Generate(&generate), Method::POST, "/api/generate"),
        (Route::Chat(&chat), Method::POST, "/api/chat"),
        (Route::CopyModel(&copy), Method::POST, "/api/copy"),
        (Route::DeleteModel(&delete), Method::DELETE, "/api/delete"),
        (Route::PullModel(&pull), Method::POST, "/api/pull"),
        (Route::Embeddings(&embeddings), Method::POST, "/api/embeddings"),
    ];

    for (route, method, path) in cases {
        let request = route.to_request().unwrap();
        assert_eq!(request.method(), method, "{}", route.name());
        assert_eq!(request.path(), path, "{}", route.name());
        assert!(request.body().is_some(), "{}", route.name());
    }
}

#[test]
fn every_route_sends_json_content_type() {
    let delete = DeleteModelRequest::new("m");
    for route in [Route::Root, Route::Models, Route::DeleteModel(&delete)] {
        let request = route.to_request().unwrap();
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    }
}

#[test]
fn names_are_stable_metric_labels() {
    let chat = ChatRequest::new("m", vec![]);
    assert_eq!(Route::Root.name(), "root");
    assert_eq!(Route::Models.name(), "tags");
    assert_eq!(Route::Chat(&chat).name(), "chat");
}

#[test]
fn generate_body_omits_unset_fields() {
    let request = GenerateRequest::new("llama2", "Why is the sky blue?").system("be brief");
    assert_eq!(
        body_json(Route::Generate(&request)),
        serde_json::json!({
            "model": "llama2",
            "prompt": "Why is the sky blue?",
            "system": "be brief",
            "stream": true
        })
    );
}

#[test]
fn chat_body_uses_snake_case_keys() {
    let request = ChatRequest::new("llama2", vec![ChatMessage::user("hi")])
        .keep_alive("5m")
        .with_options(|o| {
            o.num_ctx = Some(4096);
            o.repeat_penalty = Some(1.5);
        });
    let body = body_json(Route::Chat(&request));
    assert_eq!(body["keep_alive"], "5m");
    assert_eq!(body["options"]["num_ctx"], 4096);
    assert_eq!(body["options"]["repeat_penalty"], 1.5);
    assert!(body["options"].get("temperature").is_none());
}

#[test]
fn descriptor_does_not_depend_on_server() {
    let pull = PullModelRequest::new("m").insecure(true);
    let a = Route::PullModel(&pull).to_request().unwrap();
    let b = Route::PullModel(&pull).to_request().unwrap();
    assert_eq!(a.body(), b.body());
    assert_eq!(a.path(), b.path());
}
