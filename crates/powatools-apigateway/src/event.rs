//! Inbound API Gateway event and the request value threaded through the pipeline.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Failure, JSON_DECODE};

/// API Gateway proxy event, as delivered by the Lambda runtime.
///
/// Only the fields the pipeline reads are modelled; unknown fields are
/// ignored during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// HTTP method of the original request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    /// Resource path of the original request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Request headers (single-value form).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub headers: HashMap<String, String>,

    /// Query-string parameters. `None` when the gateway sent no mapping,
    /// which is distinct from an empty mapping.
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,

    /// Raw request body, possibly base64 encoded.
    #[serde(default)]
    pub body: Option<String>,

    /// Whether `body` is base64 encoded.
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_base64_encoded: bool,

    /// Gateway request metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_context: Option<RequestContext>,
}

/// Subset of the gateway request context used for log correlation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Gateway-assigned request identifier.
    #[serde(default)]
    pub request_id: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<HashMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl Event {
    /// Set the query-string mapping.
    pub fn with_query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query_string_parameters = Some(
            params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Set a plain-text body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = false;
        self
    }

    /// Set a body that is already base64 encoded.
    pub fn with_encoded_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = true;
        self
    }

    /// Set the HTTP method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.http_method = Some(method.into());
        self
    }

    /// Gateway request id, if the event carries one.
    pub fn request_id(&self) -> Option<&str> {
        self.request_context
            .as_ref()
            .and_then(|ctx| ctx.request_id.as_deref())
    }
}

/// The value handed from stage to stage: the original event plus the
/// parsed body once a body decoder has run.
///
/// Stages take a `Request` by value and hand a fresh one to the next stage;
/// the wrapped event is never exposed mutably.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    event: Event,
    parsed_body: Option<Value>,
}

impl Request {
    /// Wrap an inbound event.
    pub fn new(event: Event) -> Self {
        Self {
            event,
            parsed_body: None,
        }
    }

    /// The inbound event.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// The parsed body, present once a body decoder has accepted the request.
    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_ref()
    }

    /// Deserialize the parsed body into a typed payload.
    ///
    /// Fails with the JSON decoding message when no body was parsed or the
    /// parsed value does not have the expected shape.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, Failure> {
        let value = self.parsed_body.as_ref().ok_or_else(|| Failure::new(JSON_DECODE))?;
        T::deserialize(value).map_err(|e| Failure::new(format!("{}: {}", JSON_DECODE, e)))
    }

    /// Return a new request carrying `body` as its parsed body.
    pub(crate) fn with_parsed_body(self, body: Value) -> Self {
        Self {
            event: self.event,
            parsed_body: Some(body),
        }
    }

    /// Unwrap the original event.
    pub fn into_event(self) -> Event {
        self.event
    }
}

impl From<Event> for Request {
    fn from(event: Event) -> Self {
        Self::new(event)
    }
}
