//! Tracing setup for gateway Lambdas.
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: `json` (default, CloudWatch) or `text`/`pretty`
//! - `RUST_LOG`: filter directive (default: `info`)
//! - `SERVICE_NAME`: optional service label, logged once at startup
//!
//! # Example
//!
//! ```no_run
//! use powatools_apigateway::logging::{init_logging, LoggingConfig};
//!
//! let config = LoggingConfig::from_env().with_service("greeting");
//! init_logging(&config).expect("global subscriber should be unset");
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Text,
}

impl LogFormat {
    /// Interpret a `LOG_FORMAT` value. Unknown values fall back to `Json`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset or unparsable.
    pub level: String,
    pub service: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            service: None,
        }
    }
}

impl LoggingConfig {
    /// Read `LOG_FORMAT`, `RUST_LOG` and `SERVICE_NAME`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let format = lookup("LOG_FORMAT")
            .map(|v| LogFormat::from_name(&v))
            .unwrap_or_default();
        let level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let service = lookup("SERVICE_NAME").filter(|s| !s.is_empty());

        Self {
            format,
            level,
            service,
        }
    }

    /// Override the service label.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }
}

/// Install the global subscriber.
///
/// JSON output flattens event fields and keeps the current span, so every
/// line written during an invocation carries its `request_id`. Fails if a
/// global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Text => registry.with(fmt::layer().pretty()).try_init()?,
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true);
            registry.with(json_layer).try_init()?
        }
    }

    info!(
        service = config.service.as_deref().unwrap_or("-"),
        format = ?config.format,
        "logging initialised"
    );
    Ok(())
}
