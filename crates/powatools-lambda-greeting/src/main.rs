//! AWS Lambda entry point for the greeting endpoint.

use lambda_runtime::Error;

use powatools_apigateway::{init_logging, run, LoggingConfig};
use powatools_lambda_greeting::pipeline;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut config = LoggingConfig::from_env();
    if config.service.is_none() {
        config = config.with_service(env!("CARGO_PKG_NAME"));
    }
    init_logging(&config)?;

    run(pipeline()?).await
}
