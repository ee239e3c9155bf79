//! Request body decoding.
//!
//! [`BodyDecoder`] turns the raw event body into a parsed JSON value:
//!
//! 1. the body must exist,
//! 2. base64 transport encoding is reversed when the event flags it,
//! 3. the text is parsed as JSON,
//! 4. the value is checked against a schema, if one was configured.
//!
//! Each step fails with its own message, so a base64 problem is never
//! reported as a JSON problem and a JSON problem never as a schema problem.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tracing::debug;

use crate::error::{
    Failure, HandlerResult, BASE64_DECODE, BODY_NOT_FOUND, JSON_DECODE, SCHEMA_VALIDATION,
};
use crate::event::{Event, Request};
use crate::middleware::{reject, BoxFuture, Middleware, Next};
use crate::schema::SchemaValidator;

/// Decodes and optionally validates the request body before the handler runs.
#[derive(Clone, Default)]
pub struct BodyDecoder {
    schema: Option<Arc<dyn SchemaValidator>>,
}

impl BodyDecoder {
    /// Decode without structural validation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and validate against `schema`.
    pub fn with_schema(schema: impl SchemaValidator + 'static) -> Self {
        Self {
            schema: Some(Arc::new(schema)),
        }
    }

    /// Whether a schema is configured.
    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }

    /// Run every decoding step against the event's body.
    pub fn parse(&self, event: &Event) -> Result<Value, Failure> {
        let raw = event
            .body
            .as_deref()
            .ok_or_else(|| Failure::new(BODY_NOT_FOUND))?;

        let text = if event.is_base64_encoded {
            decode_base64(raw)?
        } else {
            raw.to_string()
        };

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            debug!(error = %e, "body is not valid JSON");
            Failure::new(JSON_DECODE)
        })?;

        if let Some(schema) = &self.schema {
            let violations = schema.violations(&value);
            if !violations.is_empty() {
                return Err(Failure::new(format!(
                    "{}{}",
                    SCHEMA_VALIDATION,
                    violations.join("; ")
                )));
            }
        }

        Ok(value)
    }

    /// Parse the body and return a request carrying the parsed value.
    pub fn decode(&self, request: Request) -> Result<Request, Failure> {
        let value = self.parse(request.event())?;
        Ok(request.with_parsed_body(value))
    }
}

impl std::fmt::Debug for BodyDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyDecoder")
            .field("has_schema", &self.has_schema())
            .finish()
    }
}

fn decode_base64(raw: &str) -> Result<String, Failure> {
    let bytes = STANDARD.decode(raw).map_err(|e| {
        debug!(error = %e, "body is not valid base64");
        Failure::new(BASE64_DECODE)
    })?;
    String::from_utf8(bytes).map_err(|e| {
        debug!(error = %e, "decoded body is not valid UTF-8");
        Failure::new(BASE64_DECODE)
    })
}

impl<T: Send + 'static> Middleware<T> for BodyDecoder {
    fn name(&self) -> &'static str {
        "body-decoder"
    }

    fn process<'a>(
        &'a self,
        request: Request,
        next: Next<'a, T>,
    ) -> BoxFuture<'a, HandlerResult<T>> {
        match self.decode(request) {
            Ok(request) => next.run(request),
            Err(failure) => {
                debug!(reason = %failure, "request body rejected");
                reject(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::JsonSchema;
    use serde_json::json;

    fn encoded(text: &str) -> Event {
        Event::default().with_encoded_body(STANDARD.encode(text))
    }

    fn greeting_decoder() -> BodyDecoder {
        BodyDecoder::with_schema(
            JsonSchema::compile(json!({
                "type": "object",
                "properties": {"hello": {"type": "string"}},
                "required": ["hello"]
            }))
            .unwrap(),
        )
    }

    #[test]
    fn missing_body_is_reported() {
        let err = BodyDecoder::new().parse(&Event::default()).unwrap_err();
        assert_eq!(err.message(), BODY_NOT_FOUND);
    }

    #[test]
    fn plain_body_is_parsed() {
        let event = Event::default().with_body(r#"{"hello":"world"}"#);
        let value = BodyDecoder::new().parse(&event).unwrap();
        assert_eq!(value, json!({"hello": "world"}));
    }

    #[test]
    fn encoded_body_is_decoded_then_parsed() {
        let value = BodyDecoder::new()
            .parse(&encoded(r#"{"hello":"world"}"#))
            .unwrap();
        assert_eq!(value, json!({"hello": "world"}));
    }

    #[test]
    fn bad_base64_is_a_base64_error() {
        let event = Event::default().with_encoded_body("not*base64!");
        let err = BodyDecoder::new().parse(&event).unwrap_err();
        assert_eq!(err.message(), BASE64_DECODE);
    }

    #[test]
    fn bad_padding_is_a_base64_error() {
        let event = Event::default().with_encoded_body("e30");
        let err = BodyDecoder::new().parse(&event).unwrap_err();
        assert_eq!(err.message(), BASE64_DECODE);
    }

    #[test]
    fn non_utf8_payload_is_a_base64_error() {
        let event = Event::default().with_encoded_body(STANDARD.encode([0xff, 0xfe, 0xfd]));
        let err = BodyDecoder::new().parse(&event).unwrap_err();
        assert_eq!(err.message(), BASE64_DECODE);
    }

    #[test]
    fn encoded_non_json_is_a_json_error() {
        let err = BodyDecoder::new().parse(&encoded("not json")).unwrap_err();
        assert!(err.message().contains("error json"));
    }

    #[test]
    fn unencoded_base64_text_is_not_decoded() {
        let event = Event::default().with_body(STANDARD.encode("{}"));
        let err = BodyDecoder::new().parse(&event).unwrap_err();
        assert_eq!(err.message(), JSON_DECODE);
    }

    #[test]
    fn schema_mismatch_is_a_schema_error() {
        let err = greeting_decoder()
            .parse(&encoded(r#"{"foo":"bar"}"#))
            .unwrap_err();
        assert!(err.message().starts_with(SCHEMA_VALIDATION));
        assert!(err.message().contains("error validating schema"));
        assert!(err.message().contains("hello"));
    }

    #[test]
    fn invalid_json_is_not_reported_as_schema_error() {
        let err = greeting_decoder().parse(&encoded("{")).unwrap_err();
        assert_eq!(err.message(), JSON_DECODE);
    }

    #[test]
    fn decode_attaches_parsed_body() {
        let request = Request::new(encoded(r#"{"hello":"world"}"#));
        let request = greeting_decoder().decode(request).unwrap();
        assert_eq!(request.parsed_body(), Some(&json!({"hello": "world"})));
    }
}
