//! Handler pipeline composition.
//!
//! A [`Pipeline`] wraps one core handler with an ordered list of middleware
//! stages, the response envelope, and optional CORS headers:
//!
//! ```text
//! event ─▶ stage 1 ─▶ … ─▶ stage n ─▶ handler
//!                                        │
//! response ◀─ CORS ◀─ envelope ◀─────────┘
//! ```
//!
//! Stages run in the order they were added. The envelope is always the
//! outermost layer, so every rejection raised by a stage or the handler is
//! rendered exactly once. Faults skip the envelope and are returned as
//! [`Error::Handler`].
//!
//! # Example
//!
//! ```
//! use powatools_apigateway::{Cors, Event, HandlerResult, Pipeline, QueryValidator, Request};
//! use serde_json::{json, Value};
//!
//! async fn greet(request: Request) -> HandlerResult<Value> {
//!     let params = request.event().query_string_parameters.clone().unwrap_or_default();
//!     Ok(json!({"greeting": format!("hello {}", params["name"])}))
//! }
//!
//! let pipeline = Pipeline::builder(greet)
//!     .stage(QueryValidator::required(["name"]))
//!     .cors(Cors::new(http::Method::GET))
//!     .build();
//!
//! let event = Event::default().with_query([("name", "world")]);
//! let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let response = runtime.block_on(pipeline.invoke(event)).unwrap();
//! assert_eq!(response.status_code, 200);
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::cors::Cors;
use crate::error::{Error, HandlerError, Result};
use crate::event::{Event, Request};
use crate::middleware::{BoxedMiddleware, Handler, Middleware, Next};
use crate::response::Response;

/// A core handler wrapped in its middleware chain.
///
/// Cloning is cheap; clones share the stages and handler.
pub struct Pipeline<T> {
    stages: Arc<[BoxedMiddleware<T>]>,
    handler: Arc<dyn Handler<T>>,
    cors: Option<Cors>,
}

impl<T> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Self {
            stages: Arc::clone(&self.stages),
            handler: Arc::clone(&self.handler),
            cors: self.cors.clone(),
        }
    }
}

impl<T> Pipeline<T>
where
    T: Serialize + Send + 'static,
{
    /// Start building a pipeline around `handler`.
    pub fn builder<H>(handler: H) -> PipelineBuilder<T>
    where
        H: Handler<T> + 'static,
    {
        PipelineBuilder {
            stages: Vec::new(),
            handler: Arc::new(handler),
            cors: None,
        }
    }

    /// Run one invocation.
    ///
    /// Returns the gateway response for successes and rejections. Faults
    /// raised by a stage or the handler, and success values that refuse to
    /// serialize, are returned as errors for the runtime to report.
    pub async fn invoke(&self, event: Event) -> Result<Response> {
        let span = info_span!(
            "invocation",
            request_id = event.request_id().unwrap_or("-"),
            method = event.http_method.as_deref().unwrap_or("-"),
        );

        async move {
            debug!(stages = ?self.stage_names(), "running pipeline");

            let outcome = Next::new(&self.stages, self.handler.as_ref())
                .run(Request::new(event))
                .await;

            let mut response = match outcome {
                Ok(value) => match Response::json(&value) {
                    Ok(response) => response,
                    Err(e) => {
                        error!(error = %e, "response encoding failed");
                        return Err(e);
                    }
                },
                Err(HandlerError::Rejected(failure)) => {
                    warn!(reason = %failure, "request rejected");
                    Response::rejection(&failure)
                }
                Err(HandlerError::Fault(fault)) => {
                    error!(error = %fault, "handler fault");
                    return Err(Error::Handler(fault));
                }
            };

            if let Some(cors) = &self.cors {
                cors.apply(&mut response.headers);
            }

            info!(status = response.status_code, "invocation complete");
            Ok(response)
        }
        .instrument(span)
        .await
    }

    /// Names of the stages, in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// The CORS augmentation, if any.
    pub fn cors(&self) -> Option<&Cors> {
        self.cors.as_ref()
    }
}

/// Builder for [`Pipeline`].
pub struct PipelineBuilder<T> {
    stages: Vec<BoxedMiddleware<T>>,
    handler: Arc<dyn Handler<T>>,
    cors: Option<Cors>,
}

impl<T> PipelineBuilder<T>
where
    T: Serialize + Send + 'static,
{
    /// Append a stage; stages run in the order they are added.
    pub fn stage<M>(mut self, stage: M) -> Self
    where
        M: Middleware<T> + 'static,
    {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Add CORS headers to every response.
    pub fn cors(mut self, cors: Cors) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Finish the pipeline.
    pub fn build(self) -> Pipeline<T> {
        Pipeline {
            stages: self.stages.into(),
            handler: self.handler,
            cors: self.cors,
        }
    }
}
