//! Adapter between [`Pipeline`] and `lambda_runtime`.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde::Serialize;
use tracing::{info, info_span, Instrument};

use crate::event::Event;
use crate::pipeline::Pipeline;
use crate::response::Response;

/// Serve `pipeline` on the Lambda runtime API until the process is stopped.
///
/// # Example
///
/// ```no_run
/// use powatools_apigateway::{init_logging, run, HandlerResult, LoggingConfig, Pipeline, Request};
///
/// async fn ping(_request: Request) -> HandlerResult<&'static str> {
///     Ok("pong")
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), lambda_runtime::Error> {
///     init_logging(&LoggingConfig::from_env())?;
///     run(Pipeline::builder(ping).build()).await
/// }
/// ```
pub async fn run<T>(pipeline: Pipeline<T>) -> Result<(), Error>
where
    T: Serialize + Send + 'static,
{
    info!(stages = ?pipeline.stage_names(), "starting Lambda runtime");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Event>| {
        let pipeline = pipeline.clone();
        async move { handle(&pipeline, event).await }
    }))
    .await
}

/// Handle one Lambda invocation.
///
/// Faults surface as Lambda errors; the runtime reports them to the
/// invocation error endpoint.
pub async fn handle<T>(pipeline: &Pipeline<T>, event: LambdaEvent<Event>) -> Result<Response, Error>
where
    T: Serialize + Send + 'static,
{
    let span = info_span!("lambda", aws_request_id = %event.context.request_id);

    pipeline
        .invoke(event.payload)
        .instrument(span)
        .await
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Failure, HandlerResult};
    use crate::event::Request;
    use lambda_runtime::Context;
    use serde_json::{json, Value};

    async fn echo_query(request: Request) -> HandlerResult<Value> {
        Ok(json!(request.event().query_string_parameters))
    }

    async fn refuse(_request: Request) -> HandlerResult<Value> {
        Err(Failure::new("nope").into())
    }

    async fn crash(_request: Request) -> HandlerResult<Value> {
        Err(anyhow::anyhow!("disk full").into())
    }

    fn lambda_event(payload: Event) -> LambdaEvent<Event> {
        LambdaEvent::new(payload, Context::default())
    }

    #[tokio::test]
    async fn success_returns_response() {
        let pipeline = Pipeline::builder(echo_query).build();
        let event = Event::default().with_query([("a", "1")]);

        let response = handle(&pipeline, lambda_event(event)).await.unwrap();
        assert_eq!(response.status_code, 200);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body, json!({"a": "1"}));
    }

    #[tokio::test]
    async fn rejection_returns_response() {
        let pipeline = Pipeline::builder(refuse).build();
        let response = handle(&pipeline, lambda_event(Event::default()))
            .await
            .unwrap();
        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, "nope");
    }

    #[tokio::test]
    async fn fault_becomes_lambda_error() {
        let pipeline = Pipeline::builder(crash).build();
        let err = handle(&pipeline, lambda_event(Event::default()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "disk full");
    }
}
