//! Query-string parameter validation.
//!
//! [`QueryValidator`] checks the event's `queryStringParameters` either for
//! presence only or for presence plus a regular expression per key. Every
//! violation found in a pass is reported in a single [`Failure`]; missing
//! keys are reported before (and instead of) pattern mismatches.

use regex::Regex;
use tracing::debug;

use crate::error::{
    Error, Failure, HandlerResult, Result, INVALID_PARAMETERS, MISSING_PARAMETERS,
    MISSING_QUERYSTRING,
};
use crate::event::{Event, Request};
use crate::middleware::{reject, BoxFuture, Middleware, Next};

/// A required query parameter and the pattern its value must contain.
#[derive(Debug, Clone)]
struct Rule {
    key: String,
    pattern: Option<Regex>,
}

/// Validates query-string parameters before the handler runs.
///
/// # Example
///
/// ```
/// use powatools_apigateway::{Event, QueryValidator};
///
/// let validator = QueryValidator::patterns([("hello", "^wor")]).unwrap();
/// let event = Event::default().with_query([("hello", "world")]);
/// assert!(validator.validate(&event).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct QueryValidator {
    rules: Vec<Rule>,
}

impl QueryValidator {
    /// Require each key to be present, whatever its value.
    pub fn required<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            rules: keys
                .into_iter()
                .map(|key| Rule {
                    key: key.into(),
                    pattern: None,
                })
                .collect(),
        }
    }

    /// Require each key to be present with a value matching its pattern.
    ///
    /// Patterns use search semantics: `"world"` accepts `"hello world"`.
    /// Anchor explicitly for a full match.
    pub fn patterns<I, K, P>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|(key, pattern)| {
                let key = key.into();
                match Regex::new(pattern.as_ref()) {
                    Ok(regex) => Ok(Rule {
                        key,
                        pattern: Some(regex),
                    }),
                    Err(source) => Err(Error::InvalidPattern { key, source }),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Keys this validator requires, in configured order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.key.as_str())
    }

    /// Check the event, reporting every missing or invalid key at once.
    pub fn validate(&self, event: &Event) -> std::result::Result<(), Failure> {
        let params = event
            .query_string_parameters
            .as_ref()
            .ok_or_else(|| Failure::new(MISSING_QUERYSTRING))?;

        let missing: Vec<&str> = self
            .rules
            .iter()
            .filter(|rule| !params.contains_key(&rule.key))
            .map(|rule| rule.key.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(Failure::listing(MISSING_PARAMETERS, &missing));
        }

        let invalid: Vec<&str> = self
            .rules
            .iter()
            .filter(|rule| match (&rule.pattern, params.get(&rule.key)) {
                (Some(pattern), Some(value)) => !pattern.is_match(value),
                _ => false,
            })
            .map(|rule| rule.key.as_str())
            .collect();
        if !invalid.is_empty() {
            return Err(Failure::listing(INVALID_PARAMETERS, &invalid));
        }

        Ok(())
    }
}

impl<T: Send + 'static> Middleware<T> for QueryValidator {
    fn name(&self) -> &'static str {
        "query-validator"
    }

    fn process<'a>(
        &'a self,
        request: Request,
        next: Next<'a, T>,
    ) -> BoxFuture<'a, HandlerResult<T>> {
        match self.validate(request.event()) {
            Ok(()) => next.run(request),
            Err(failure) => {
                debug!(reason = %failure, "query parameters rejected");
                reject(failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(params: &[(&str, &str)]) -> Event {
        Event::default().with_query(params.iter().copied())
    }

    #[test]
    fn required_key_present_passes() {
        let validator = QueryValidator::required(["hello"]);
        assert!(validator.validate(&event(&[("hello", "world")])).is_ok());
    }

    #[test]
    fn required_key_absent_is_missing() {
        let validator = QueryValidator::required(["hello"]);
        let err = validator.validate(&event(&[("foo", "bar")])).unwrap_err();
        assert!(err.message().contains("missing"));
        assert_eq!(err.message(), "missing parameters - hello");
    }

    #[test]
    fn all_missing_keys_are_reported_in_order() {
        let validator = QueryValidator::required(["a", "b", "c"]);
        let err = validator.validate(&event(&[("b", "1")])).unwrap_err();
        assert_eq!(err.message(), "missing parameters - a, c");
    }

    #[test]
    fn no_query_mapping_fails_before_key_checks() {
        let validator = QueryValidator::required(Vec::<String>::new());
        let err = validator.validate(&Event::default()).unwrap_err();
        assert_eq!(err.message(), MISSING_QUERYSTRING);
    }

    #[test]
    fn empty_mapping_is_not_a_missing_querystring() {
        let validator = QueryValidator::required(["hello"]);
        let err = validator.validate(&event(&[])).unwrap_err();
        assert_eq!(err.message(), "missing parameters - hello");
    }

    #[test]
    fn pattern_mismatch_is_invalid() {
        let validator = QueryValidator::patterns([("hello", "world")]).unwrap();
        let err = validator.validate(&event(&[("hello", "earth")])).unwrap_err();
        assert!(err.message().contains("invalid"));
        assert_eq!(err.message(), "invalid parameters - hello");
    }

    #[test]
    fn pattern_uses_search_semantics() {
        let validator = QueryValidator::patterns([("hello", "world")]).unwrap();
        assert!(validator
            .validate(&event(&[("hello", "big world out there")]))
            .is_ok());
    }

    #[test]
    fn missing_keys_take_priority_over_invalid_ones() {
        let validator = QueryValidator::patterns([("a", "^x$"), ("b", "^y$")]).unwrap();
        let err = validator.validate(&event(&[("a", "nope")])).unwrap_err();
        assert_eq!(err.message(), "missing parameters - b");
    }

    #[test]
    fn all_invalid_keys_are_reported() {
        let validator =
            QueryValidator::patterns([("a", r"^\d+$"), ("b", "^y$"), ("c", "z")]).unwrap();
        let err = validator
            .validate(&event(&[("a", "12x"), ("b", "y"), ("c", "q")]))
            .unwrap_err();
        assert_eq!(err.message(), "invalid parameters - a, c");
    }

    #[test]
    fn bad_pattern_fails_construction() {
        let err = QueryValidator::patterns([("hello", "(")]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref key, .. } if key == "hello"));
    }

    #[test]
    fn keys_preserve_configuration_order() {
        let validator = QueryValidator::required(["z", "a"]);
        assert_eq!(validator.keys().collect::<Vec<_>>(), vec!["z", "a"]);
    }
}
