use std::fmt;

use jsonschema::Draft;
use serde_json::Value;

use crate::error::{ContractError, Result};

/// Compact structural meta-schema for OpenAPI 3.0 documents. Rejects
/// non-contracts without shipping the official multi-thousand-line bundle.
const META_SCHEMA_3_0: &str = r#"{
    "type": "object",
    "required": ["openapi", "info", "paths"],
    "properties": {
        "openapi": { "type": "string", "pattern": "^3\\.0\\.\\d+" },
        "info": {
            "type": "object",
            "required": ["title", "version"],
            "properties": {
                "title": { "type": "string" },
                "version": { "type": "string" }
            }
        },
        "paths": { "type": "object" },
        "components": { "type": "object" }
    }
}"#;

/// Compact structural meta-schema for OpenAPI 3.1 documents. 3.1 requires
/// at least one of paths, components or webhooks.
const META_SCHEMA_3_1: &str = r#"{
    "type": "object",
    "required": ["openapi", "info"],
    "properties": {
        "openapi": { "type": "string", "pattern": "^3\\.1\\.\\d+" },
        "info": {
            "type": "object",
            "required": ["title", "version"],
            "properties": {
                "title": { "type": "string" },
                "version": { "type": "string" }
            }
        },
        "paths": { "type": "object" },
        "components": { "type": "object" },
        "webhooks": { "type": "object" }
    },
    "anyOf": [
        { "required": ["paths"] },
        { "required": ["components"] },
        { "required": ["webhooks"] }
    ]
}"#;

/// The contract's declared OpenAPI version, which selects the JSON Schema
/// dialect used for every schema drawn from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenApiVersion {
    V3_0,
    V3_1,
}

impl OpenApiVersion {
    /// Detects the version from the primary document's `openapi` field.
    pub fn from_document(document: &Value) -> Result<Self> {
        let declared = document
            .get("openapi")
            .and_then(Value::as_str)
            .ok_or_else(|| ContractError::invalid("missing 'openapi' version field"))?;

        if declared.starts_with("3.0") {
            Ok(OpenApiVersion::V3_0)
        } else if declared.starts_with("3.1") {
            Ok(OpenApiVersion::V3_1)
        } else {
            Err(ContractError::invalid(format!(
                "unsupported openapi version: {declared}"
            )))
        }
    }

    /// The JSON Schema dialect the external evaluator should use for
    /// schemas drawn from a contract of this version.
    pub fn draft(self) -> Draft {
        match self {
            OpenApiVersion::V3_0 => Draft::Draft4,
            OpenApiVersion::V3_1 => Draft::Draft202012,
        }
    }

    /// The embedded meta-schema a primary document of this version must
    /// conform to.
    pub(crate) fn meta_schema(self) -> Result<Value> {
        let raw = match self {
            OpenApiVersion::V3_0 => META_SCHEMA_3_0,
            OpenApiVersion::V3_1 => META_SCHEMA_3_1,
        };
        serde_json::from_str(raw)
            .map_err(|err| ContractError::found_issue(format!("embedded meta-schema: {err}")))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OpenApiVersion::V3_0 => "3.0",
            OpenApiVersion::V3_1 => "3.1",
        }
    }
}

impl fmt::Display for OpenApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
