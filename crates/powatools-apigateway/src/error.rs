//! Error types for the handler pipeline.
//!
//! Two families live here:
//!
//! - [`Failure`] is the one recoverable, user-facing error. It is always
//!   rendered as a `400` with the message as a plain-text body, so its
//!   messages are a contract and are exposed as constants.
//! - [`Error`] covers configuration mistakes (bad regex, bad schema) and
//!   unexpected faults that must reach the Lambda runtime untouched.

use thiserror::Error;

/// Convenient result alias for pipeline configuration and invocation.
pub type Result<T> = std::result::Result<T, Error>;

/// Result returned by middleware stages and core handlers.
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Raised when the event carries no query-string mapping at all.
pub const MISSING_QUERYSTRING: &str = "event is missing querystring";

/// Prefix for the aggregated list of absent query parameters.
pub const MISSING_PARAMETERS: &str = "missing parameters - ";

/// Prefix for the aggregated list of query parameters failing their pattern.
pub const INVALID_PARAMETERS: &str = "invalid parameters - ";

/// Raised when a body decoder runs against an event without a body.
pub const BODY_NOT_FOUND: &str = "POST body not found in event";

/// Raised when a flagged body is not valid base64 or not valid UTF-8.
pub const BASE64_DECODE: &str = "error base64- decoding POST body";

/// Raised when the (decoded) body is not valid JSON.
pub const JSON_DECODE: &str = "error json- loading POST body";

/// Prefix for schema violations; the violation details follow it.
pub const SCHEMA_VALIDATION: &str = "error validating schema against POST body: ";

/// Recoverable request failure, rendered as HTTP 400 with a plain-text body.
///
/// Callers match on substrings of the message, so it is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Failure {
    message: String,
}

impl Failure {
    /// Create a failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build `"<prefix><k1>, <k2>"` from a list of offending keys.
    pub(crate) fn listing(prefix: &str, keys: &[&str]) -> Self {
        Self::new(format!("{}{}", prefix, keys.join(", ")))
    }

    /// The message as it will appear in the response body.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Outcome of a failed stage or handler.
///
/// The two variants never mix: only `Rejected` becomes a 400, a `Fault`
/// escapes the envelope and is reported to the runtime.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The request was refused for a reason the caller can fix.
    #[error(transparent)]
    Rejected(#[from] Failure),

    /// Something went wrong that the caller cannot fix.
    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl HandlerError {
    /// Shorthand for a rejection with the given message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(Failure::new(message))
    }

    /// Returns the failure when this is a rejection.
    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            Self::Rejected(failure) => Some(failure),
            Self::Fault(_) => None,
        }
    }
}

/// Top-level pipeline error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A query parameter pattern did not compile.
    #[error("invalid pattern for query parameter '{key}': {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    /// A schema document could not be compiled.
    #[error("invalid schema document: {message}")]
    InvalidSchema { message: String },

    /// The handler's success value refused to serialize.
    #[error("failed to encode response body: {0}")]
    Encode(#[source] serde_json::Error),

    /// An unexpected fault raised by the core handler or a stage.
    #[error(transparent)]
    Handler(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_displays_message_verbatim() {
        let failure = Failure::new("oops \"quoted\"");
        assert_eq!(failure.to_string(), "oops \"quoted\"");
        assert_eq!(failure.message(), "oops \"quoted\"");
    }

    #[test]
    fn listing_joins_keys() {
        let failure = Failure::listing(MISSING_PARAMETERS, &["hello", "foo"]);
        assert_eq!(failure.message(), "missing parameters - hello, foo");
    }

    #[test]
    fn question_mark_converts_both_variants() {
        fn reject() -> HandlerResult<()> {
            let checked: std::result::Result<(), Failure> = Err(Failure::new("bad"));
            checked?;
            Ok(())
        }
        fn fault() -> HandlerResult<()> {
            let io: anyhow::Result<()> = Err(anyhow::anyhow!("boom"));
            io?;
            Ok(())
        }

        assert!(matches!(reject(), Err(HandlerError::Rejected(_))));
        assert!(matches!(fault(), Err(HandlerError::Fault(_))));
    }

    #[test]
    fn as_failure_only_matches_rejections() {
        assert!(HandlerError::rejected("x").as_failure().is_some());
        assert!(HandlerError::Fault(anyhow::anyhow!("x"))
            .as_failure()
            .is_none());
    }

    #[test]
    fn handler_error_wraps_fault_transparently() {
        let err: Error = anyhow::anyhow!("disk on fire").into();
        assert_eq!(err.to_string(), "disk on fire");
    }
}
