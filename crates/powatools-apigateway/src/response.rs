//! Gateway response envelope.

use std::collections::BTreeMap;

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{Failure, Result};
use crate::numeric;

/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";
/// Content type of success bodies.
pub const APPLICATION_JSON: &str = "application/json";
/// Content type of failure bodies.
pub const TEXT_PLAIN: &str = "text/plain";

/// Response returned to API Gateway.
///
/// Success bodies are JSON, failure bodies are the failure message as plain
/// text; `Content-Type` always says which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// HTTP status code (200 or 400).
    pub status_code: u16,

    /// Response headers, keyed exactly as set.
    pub headers: BTreeMap<String, String>,

    /// Response body.
    pub body: String,
}

impl Response {
    /// Wrap a handler's success value: 200 with a pretty-printed JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::with_content_type(
            StatusCode::OK,
            APPLICATION_JSON,
            numeric::encode(value)?,
        ))
    }

    /// Wrap a rejection: 400 with the message as the plain-text body.
    pub fn rejection(failure: &Failure) -> Self {
        Self::with_content_type(
            StatusCode::BAD_REQUEST,
            TEXT_PLAIN,
            failure.message().to_string(),
        )
    }

    fn with_content_type(status: StatusCode, content_type: &str, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), content_type.to_string());
        Self {
            status_code: status.as_u16(),
            headers,
            body,
        }
    }

    /// The status as an [`http::StatusCode`].
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Look up a header by its exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// The `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }
}
