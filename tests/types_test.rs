//! Wire-format tests for request and response types.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use serde_json::json;

use ollama_kit::codec::{self, timestamp};
use ollama_kit::{
    ChatMessage, ChatRequest, ChatResponse, Function, GenerateResponse, JsonValue, ModelSummary,
    ResponseFormat, Role, Tool, ToolCall,
};

// =============================================================================
// Chat requests
// =============================================================================

#[test]
fn chat_request_round_trips() {
    let request = ChatRequest::new("llama2", vec![ChatMessage::user("Why is the sky blue?")]);
    let bytes = codec::encode(&request).unwrap();
    let decoded: ChatRequest = codec::decode(&bytes).unwrap();

    assert_eq!(decoded.model, "llama2");
    assert!(decoded.is_stream());
    assert_eq!(decoded.messages, request.messages);
    assert_eq!(decoded, request);
}

#[test]
fn chat_request_wire_shape() {
    let request = ChatRequest::new(
        "llama2",
        vec![
            ChatMessage::system("be terse"),
            ChatMessage::user_with_images("what is this?", vec!["aGVsbG8=".to_string()]),
        ],
    )
    .format(ResponseFormat::Json);

    let value: serde_json::Value = serde_json::from_slice(&codec::encode(&request).unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "model": "llama2",
            "stream": true,
            "format": "json",
            "messages": [
                { "role": "system", "content": "be terse" },
                { "role": "user", "content": "what is this?", "images": ["aGVsbG8="] }
            ]
        })
    );
}

#[test]
fn custom_role_is_preserved() {
    let message = ChatMessage::custom("narrator", "Once upon a time");
    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value["role"], "narrator");

    let decoded: ChatMessage = serde_json::from_value(value).unwrap();
    assert_eq!(decoded.role, Role::Custom("narrator".to_string()));
    assert_eq!(Role::from("tool"), Role::Tool);
    assert_eq!(Role::Assistant.to_string(), "assistant");
}

// =============================================================================
// Tools
// =============================================================================

#[test]
fn tool_definition_encoding() {
    let parameters = JsonValue::object([
        ("type", JsonValue::from("object")),
        (
            "properties",
            JsonValue::object([("city", JsonValue::object([("type", JsonValue::from("string"))]))]),
        ),
        ("required", JsonValue::Array(vec![JsonValue::from("city")])),
    ]);
    let tool = Tool::function(Function::new("weather", "Current weather", parameters));

    assert_eq!(
        serde_json::to_value(&tool).unwrap(),
        json!({
            "type": "function",
            "function": {
                "name": "weather",
                "description": "Current weather",
                "parameters": {
                    "type": "object",
                    "properties": { "city": { "type": "string" } },
                    "required": ["city"]
                }
            }
        })
    );
}

#[test]
fn tool_call_arguments_decode_to_json_values() {
    let call: ToolCall = serde_json::from_str(
        r#"{"function":{"name":"lookup","arguments":{"id":7,"score":0.5,"tags":["a"],"meta":null,"ok":true}}}"#,
    )
    .unwrap();

    let function = call.function.as_ref().unwrap();
    assert_eq!(call.name(), Some("lookup"));
    assert_eq!(function.arguments["id"], JsonValue::Integer(7));
    assert_eq!(function.arguments["score"], JsonValue::Number(0.5));
    assert_eq!(function.arguments["meta"], JsonValue::Null);
    assert_eq!(function.arguments["ok"].as_bool(), Some(true));
    assert_eq!(function.arguments["tags"].as_array().unwrap().len(), 1);
}

#[test]
fn tool_call_without_function_decodes() {
    let call: ToolCall = serde_json::from_str("{}").unwrap();
    assert!(call.function.is_none());
    assert_eq!(call.name(), None);

    let built = ToolCall::new("f", BTreeMap::new());
    assert_eq!(
        serde_json::to_value(&built).unwrap(),
        json!({ "function": { "name": "f", "arguments": {} } })
    );
}

// =============================================================================
// Responses
// =============================================================================

#[test]
fn generate_fragment_without_timestamp() {
    let fragment: GenerateResponse =
        serde_json::from_str(r#"{"model":"m","response":"Hi","done":false}"#).unwrap();
    assert!(fragment.created_at.is_none());
    assert_eq!(fragment.stats.eval_count, None);
}

#[test]
fn final_generate_fragment_carries_stats_and_context() {
    let fragment: GenerateResponse = serde_json::from_str(
        r#"{"model":"m","created_at":"2023-08-04T19:22:45.499127Z","response":"","done":true,
            "context":[1,2,3],"total_duration":5589157167,"eval_count":290,"eval_duration":4709213000}"#,
    )
    .unwrap();

    assert_eq!(fragment.context, Some(vec![1, 2, 3]));
    assert_eq!(fragment.stats.total_duration, Some(5_589_157_167));
    assert_eq!(
        fragment.created_at.unwrap(),
        Utc.with_ymd_and_hms(2023, 8, 4, 19, 22, 45).unwrap()
            + chrono::Duration::microseconds(499_127)
    );
}

#[test]
fn chat_fragment_without_message() {
    let reply: ChatResponse =
        serde_json::from_str(r#"{"model":"m","done":true,"done_reason":"stop"}"#).unwrap();
    assert_eq!(reply.content(), "");
    assert!(reply.tool_calls().is_empty());
}

#[test]
fn timestamps_encode_with_nanoseconds_and_offset() {
    let summary = ModelSummary {
        name: "m".to_string(),
        digest: "d".to_string(),
        size: 1,
        modified_at: Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap(),
        details: None,
    };
    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["modified_at"], "2024-02-29T12:00:00.000000000+00:00");
    assert_eq!(
        timestamp::parse("2024-02-29T14:00:00.000000000+02:00").unwrap(),
        summary.modified_at
    );
}

#[test]
fn response_format_schema() {
    let schema = JsonValue::object([("type", JsonValue::from("object"))]);
    let format = ResponseFormat::Schema(schema.clone());
    assert_eq!(serde_json::to_value(&format).unwrap(), json!({ "type": "object" }));

    let decoded: ResponseFormat = serde_json::from_str(r#""json""#).unwrap();
    assert_eq!(decoded, ResponseFormat::Json);
    assert!(serde_json::from_str::<ResponseFormat>(r#""yaml""#).is_err());
}
