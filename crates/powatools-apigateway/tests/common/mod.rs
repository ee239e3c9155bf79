//! Shared helpers for pipeline integration tests.

#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use powatools_apigateway::{Event, HandlerResult, JsonSchema, Request, Response};
use serde_json::{json, Value};

/// A POST event carrying `text` base64-encoded.
pub fn encoded(text: &str) -> Event {
    Event::default()
        .with_method("POST")
        .with_encoded_body(STANDARD.encode(text))
}

/// A GET event with the given query-string mapping.
pub fn query(params: &[(&str, &str)]) -> Event {
    Event::default()
        .with_method("GET")
        .with_query(params.iter().copied())
}

/// Decode a success body back into a JSON value.
pub fn json_body(response: &Response) -> Value {
    serde_json::from_str(&response.body).expect("success body should be JSON")
}

/// Schema requiring a string `hello` property.
pub fn greeting_schema() -> JsonSchema {
    JsonSchema::compile(json!({
        "type": "object",
        "properties": {"hello": {"type": "string"}},
        "required": ["hello"]
    }))
    .expect("greeting schema should compile")
}

/// Handler that returns whatever the body decoder attached.
pub async fn echo_body(request: Request) -> HandlerResult<Value> {
    Ok(request.parsed_body().cloned().unwrap_or(Value::Null))
}

/// Handler that always answers `{"hello": "world"}`.
pub async fn hello(_request: Request) -> HandlerResult<Value> {
    Ok(json!({"hello": "world"}))
}
