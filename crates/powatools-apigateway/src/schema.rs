//! Structural validation of parsed request bodies.

use std::fmt;

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::error::{Error, Result};

/// Structural contract checked against a parsed body.
///
/// An empty list of violations means the value passes.
pub trait SchemaValidator: Send + Sync {
    /// Describe every way `value` breaks the contract.
    fn violations(&self, value: &Value) -> Vec<String>;
}

/// A compiled JSON Schema document (draft 7 unless the document says otherwise).
pub struct JsonSchema {
    document: Value,
    compiled: JSONSchema,
}

impl JsonSchema {
    /// Compile a schema document.
    pub fn compile(document: Value) -> Result<Self> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&document)
            .map_err(|e| Error::InvalidSchema {
                message: e.to_string(),
            })?;
        Ok(Self { document, compiled })
    }

    /// Parse and compile a schema document from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text).map_err(|e| Error::InvalidSchema {
            message: e.to_string(),
        })?;
        Self::compile(document)
    }

    /// The source document.
    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl SchemaValidator for JsonSchema {
    fn violations(&self, value: &Value) -> Vec<String> {
        match self.compiled.validate(value) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.map(|e| e.to_string()).collect(),
        }
    }
}
