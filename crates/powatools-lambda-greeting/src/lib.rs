//! Greeting endpoint: `POST /greet?lang=<en|fr|es>` with a JSON body
//! `{"hello": "<name>", "tip": <decimal>}`.

use http::Method;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::info;

use powatools_apigateway::numeric;
use powatools_apigateway::{
    BodyDecoder, Cors, Failure, HandlerResult, JsonSchema, Pipeline, QueryValidator, Request,
    Result,
};

/// JSON Schema for the request body.
pub const GREETING_SCHEMA: &str = include_str!("../schema/greeting.json");

/// Accepted values of the `lang` query parameter.
pub const LANGUAGE_PATTERN: &str = "^(en|fr|es)$";

/// Request body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GreetingRequest {
    pub hello: String,
    #[serde(default, with = "numeric::decimal::option")]
    pub tip: Option<Decimal>,
}

/// Response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Greeting {
    pub greeting: String,
    pub language: String,
    #[serde(with = "numeric::decimal")]
    pub tip: Decimal,
}

fn salutation(language: &str) -> &'static str {
    match language {
        "fr" => "bonjour",
        "es" => "hola",
        _ => "hello",
    }
}

/// Tips are quoted in cents; half a cent rounds away from zero.
fn round_tip(tip: Decimal) -> Decimal {
    tip.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Core handler; runs after the query and body stages have accepted the request.
pub async fn greet(request: Request) -> HandlerResult<Greeting> {
    let body: GreetingRequest = request.body_as()?;

    let language = request
        .event()
        .query_string_parameters
        .as_ref()
        .and_then(|params| params.get("lang"))
        .map(String::as_str)
        .unwrap_or("en");

    let tip = body.tip.unwrap_or_default();
    if tip.is_sign_negative() && !tip.is_zero() {
        return Err(Failure::new("tip must not be negative").into());
    }

    info!(language, "greeting");
    Ok(Greeting {
        greeting: format!("{} {}", salutation(language), body.hello),
        language: language.to_string(),
        tip: round_tip(tip),
    })
}

/// The wired pipeline: query check, body decoding against
/// [`GREETING_SCHEMA`], then [`greet`], with CORS for `POST`.
pub fn pipeline() -> Result<Pipeline<Greeting>> {
    Ok(Pipeline::builder(greet)
        .stage(QueryValidator::patterns([("lang", LANGUAGE_PATTERN)])?)
        .stage(BodyDecoder::with_schema(JsonSchema::parse(GREETING_SCHEMA)?))
        .cors(Cors::new(Method::POST))
        .build())
}
