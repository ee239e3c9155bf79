//! Event fixtures for pipeline tests.
//!
//! Available inside this crate's tests and, with the `test-utils` feature,
//! to dependent crates:
//!
//! ```ignore
//! use powatools_apigateway::test_utils::{encoded_body_event, greeting_schema};
//!
//! let event = encoded_body_event(r#"{"hello":"world"}"#);
//! let decoder = BodyDecoder::with_schema(greeting_schema());
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

use crate::event::{Event, RequestContext};
use crate::schema::JsonSchema;

/// An event whose body is `json` base64-encoded, as API Gateway sends
/// binary-safe payloads.
pub fn encoded_body_event(json: &str) -> Event {
    Event::default()
        .with_method("POST")
        .with_encoded_body(STANDARD.encode(json))
}

/// An event with a plain-text body.
pub fn plain_body_event(json: &str) -> Event {
    Event::default().with_method("POST").with_body(json)
}

/// A GET event carrying the given query-string parameters.
pub fn query_event<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Event {
    Event::default().with_method("GET").with_query(params)
}

/// Attach a request id to `event`.
pub fn with_request_id(mut event: Event, suffix: &str) -> Event {
    event.request_context = Some(RequestContext {
        request_id: Some(mock_request_id(suffix)),
    });
    event
}

/// Schema document requiring a string `hello` property.
pub fn greeting_schema_document() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "hello": {"type": "string"}
        },
        "required": ["hello"]
    })
}

/// [`greeting_schema_document`], compiled.
pub fn greeting_schema() -> JsonSchema {
    JsonSchema::compile(greeting_schema_document()).expect("greeting schema should compile")
}

/// A request ID in the format `test-request-{suffix}`.
pub fn mock_request_id(suffix: &str) -> String {
    format!("test-request-{}", suffix)
}
