use bytes::Bytes;
use jsonschema::Validator;
use oasguard_contract::ResolvedContract;
use oasguard_mediatype::{MediaType, ValidationContext};
use serde_json::{Map, Value};

use crate::error::{Result, ValidatorError, Violation};
use crate::parameter::Parameter;
use crate::registry::Registration;

/// One entry of an operation's content map, selected by full type.
#[derive(Debug, Clone)]
pub struct MediaTypeEntry {
    identifier: String,
    schema: Option<Value>,
}

impl MediaTypeEntry {
    /// Selects the entry matching `full_type` from a content map. Map keys
    /// are compared by their parsed full type, so a `application/json;
    /// charset=utf-8` key still matches `application/json`.
    pub fn from_content_map(content: &Map<String, Value>, full_type: &str) -> Option<Self> {
        content
            .iter()
            .find(|(key, _)| MediaType::parse(key).full_type() == full_type)
            .map(|(key, entry)| Self {
                identifier: key.clone(),
                schema: entry.get("schema").cloned(),
            })
    }

    /// The content-map key this entry was selected by.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The entry's schema, if one is declared.
    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }
}

/// Decides whether an entry's schema requires validation.
///
/// Validation is skipped when no schema is declared (OpenAPI 3.1 entries
/// carrying only encoding info) and for the plain binary string schema
/// `{"type": "string", "format": "binary"}` with no further properties — a
/// binary string with length restrictions would still be validated.
fn schema_validation_required(schema: Option<&Value>) -> bool {
    let Some(schema) = schema else {
        return false;
    };
    let Some(map) = schema.as_object() else {
        return true;
    };

    let is_string = map
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| t.eq_ignore_ascii_case("string"));
    let is_binary = map
        .get("format")
        .and_then(Value::as_str)
        .is_some_and(|f| f.eq_ignore_ascii_case("binary"));
    let no_further_properties = map.len() == 2;

    !(is_string && is_binary && no_further_properties)
}

/// Validates bodies of one media type against one content-map entry.
///
/// Construction compiles the entry's schema once through the contract's
/// repository; the validator is reusable across requests and holds no
/// mutable state.
pub struct MediaTypeValidator {
    registration: Registration,
    entry: Option<MediaTypeEntry>,
    compiled: Option<Validator>,
    context: ValidationContext,
}

impl MediaTypeValidator {
    pub fn new(
        registration: &Registration,
        contract: &ResolvedContract,
        content: Option<&Map<String, Value>>,
        full_type: &str,
        context: ValidationContext,
    ) -> Result<Self> {
        let entry = content.and_then(|map| MediaTypeEntry::from_content_map(map, full_type));

        let compiled = match &entry {
            Some(entry)
                if registration.schema_validation()
                    && schema_validation_required(entry.schema()) =>
            {
                match entry.schema() {
                    Some(schema) => Some(contract.repository().compile(schema)?),
                    None => None,
                }
            }
            _ => None,
        };

        Ok(Self {
            registration: registration.clone(),
            entry,
            compiled,
            context,
        })
    }

    /// Validates one body, producing the parameter or a typed failure.
    pub fn validate(&self, content_type: &str, content: &Bytes) -> Result<Parameter> {
        // Passthrough registrations return the input without any checks.
        if !self.registration.schema_validation() {
            return Ok(Parameter::Binary(content.clone()));
        }

        if self.entry.is_none() {
            return Err(ValidatorError::UnsupportedValueFormat {
                context: self.context,
            });
        }

        let analyser = self
            .registration
            .analyser(content_type, content.clone(), self.context);
        analyser.check_syntax()?;

        let Some(compiled) = &self.compiled else {
            // Binary string schema or no schema declared: raw passthrough.
            return Ok(Parameter::Binary(content.clone()));
        };

        let value = analyser.transform()?;
        let violations: Vec<Violation> = compiled
            .iter_errors(&value)
            .map(|err| Violation {
                instance_path: err.instance_path().to_string(),
                message: err.to_string(),
            })
            .collect();
        if violations.is_empty() {
            Ok(Parameter::Value(value))
        } else {
            Err(ValidatorError::SchemaViolation {
                context: self.context,
                violations,
            })
        }
    }
}
