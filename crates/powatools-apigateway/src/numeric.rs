//! JSON encoding with decimal fidelity.
//!
//! `rust_decimal::Decimal` serializes as a string by default, which callers
//! would then have to parse back. Response bodies instead carry decimals as
//! JSON numbers carrying the exact digits of the decimal: the integer token
//! when the value has no fractional part, otherwise the decimal token with
//! trailing zeros removed. Nothing is routed through `f64`, so a fraction
//! with more digits than a double holds is written in full.
//!
//! Exact tokens rely on `serde_json`'s `arbitrary_precision` feature, which
//! this crate enables.
//!
//! Decimals opt in either by wrapping in [`DecimalNumber`] (handy inside
//! `serde_json::json!`) or through a field attribute:
//!
//! ```
//! use powatools_apigateway::numeric;
//! use rust_decimal::Decimal;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Price {
//!     #[serde(with = "numeric::decimal")]
//!     amount: Decimal,
//! }
//!
//! let body = numeric::encode(&Price { amount: Decimal::new(250, 2) }).unwrap();
//! assert_eq!(body, "{\n  \"amount\": 2.5\n}");
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::Number;

use crate::error::{Error, Result};

/// Encode a success payload as pretty-printed JSON (two-space indent).
///
/// Output is deterministic: the same value always yields the same bytes.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Error::Encode)
}

/// Serialize a decimal as a JSON number token.
///
/// The token is the normalized decimal text: `1.000` is written `1`, `1.10`
/// is written `1.1`, and every significant digit is kept.
pub fn serialize_decimal<S>(value: &Decimal, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let token = value.normalize().to_string();
    let number = Number::from_str(&token).map_err(|e| {
        S::Error::custom(format!("decimal {} is not a JSON number: {}", token, e))
    })?;
    number.serialize(serializer)
}

/// `#[serde(with = "numeric::decimal")]` support for `Decimal` fields.
pub mod decimal {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        super::serialize_decimal(value, serializer)
    }

    /// Accepts JSON numbers as well as numeric strings.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer)
    }

    /// Same rule for `Option<Decimal>`; `None` becomes `null`.
    pub mod option {
        use rust_decimal::Decimal;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<Decimal>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(decimal) => crate::numeric::serialize_decimal(decimal, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Decimal>, D::Error> {
            Option::<Decimal>::deserialize(deserializer)
        }
    }
}

/// A decimal that serializes as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DecimalNumber(pub Decimal);

impl From<Decimal> for DecimalNumber {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Serialize for DecimalNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_decimal(&self.0, serializer)
    }
}
