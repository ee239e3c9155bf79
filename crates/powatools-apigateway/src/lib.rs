//! Middleware pipeline for AWS Lambda handlers behind API Gateway.
//!
//! A handler is an async function from [`Request`] to
//! [`HandlerResult<T>`]. Wrapping it in a [`Pipeline`] adds:
//!
//! - [`QueryValidator`]: required query-string keys, optionally checked
//!   against regular expressions
//! - [`BodyDecoder`]: base64 and JSON decoding of the request body, with an
//!   optional [`JsonSchema`] check
//! - the response envelope: 200 `application/json` for success values, 400
//!   `text/plain` for a [`Failure`]
//! - [`Cors`]: cross-origin headers on every response
//!
//! Success values are encoded by [`numeric`], which renders
//! `rust_decimal::Decimal` values as JSON numbers.
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides event fixtures. Enable the
//! `test-utils` feature to access it from dependent crates.

pub mod body;
pub mod cors;
pub mod error;
pub mod event;
pub mod logging;
pub mod middleware;
pub mod numeric;
pub mod params;
pub mod pipeline;
pub mod response;
pub mod runtime;
pub mod schema;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use body::BodyDecoder;
pub use cors::Cors;
pub use error::{
    Error, Failure, HandlerError, HandlerResult, Result, BASE64_DECODE, BODY_NOT_FOUND,
    INVALID_PARAMETERS, JSON_DECODE, MISSING_PARAMETERS, MISSING_QUERYSTRING, SCHEMA_VALIDATION,
};
pub use event::{Event, Request, RequestContext};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use middleware::{BoxFuture, Handler, Middleware, Next};
pub use numeric::DecimalNumber;
pub use params::QueryValidator;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use response::Response;
pub use runtime::run;
pub use schema::{JsonSchema, SchemaValidator};
