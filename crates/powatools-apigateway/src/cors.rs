//! CORS headers for browser-facing gateway routes.
//!
//! The header set is fixed: any origin, the standard API Gateway request
//! headers, and `OPTIONS` plus the route's declared method. Headers are
//! merged into the response after the envelope has set `Content-Type`, on
//! success and failure alike.

use std::collections::BTreeMap;

use http::Method;

/// `Access-Control-Allow-Origin` header.
pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
/// `Access-Control-Allow-Headers` header.
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
/// `Access-Control-Allow-Methods` header.
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";

/// Request headers API Gateway clients commonly send.
pub const GATEWAY_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token,X-Amz-User-Agent";

/// CORS augmentation for a single route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cors {
    method: Method,
}

impl Cors {
    /// Allow cross-origin calls to a route declared with `method`.
    pub fn new(method: Method) -> Self {
        Self { method }
    }

    /// The declared method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Value of `Access-Control-Allow-Methods`.
    pub fn allow_methods(&self) -> String {
        format!("OPTIONS,{}", self.method)
    }

    /// Merge the CORS headers into `headers`, leaving other entries intact.
    pub fn apply(&self, headers: &mut BTreeMap<String, String>) {
        headers.insert(ALLOW_ORIGIN.to_string(), "*".to_string());
        headers.insert(ALLOW_HEADERS.to_string(), GATEWAY_HEADERS.to_string());
        headers.insert(ALLOW_METHODS.to_string(), self.allow_methods());
    }
}
