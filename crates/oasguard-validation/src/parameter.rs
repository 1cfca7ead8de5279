use bytes::Bytes;
use serde_json::Value;

/// The validated result of a body validation.
///
/// Either the transformed value that passed schema validation, or the raw
/// bytes when schema validation was skipped (passthrough registrations,
/// binary string schemas, undeclared schemas). Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// The transformed, schema-validated value.
    Value(Value),
    /// The raw bytes, passed through without schema validation.
    Binary(Bytes),
}

impl Parameter {
    pub fn is_binary(&self) -> bool {
        matches!(self, Parameter::Binary(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Parameter::Value(value) => Some(value),
            Parameter::Binary(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Parameter::Value(_) => None,
            Parameter::Binary(bytes) => Some(bytes),
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Parameter::Value(value) => Some(value),
            Parameter::Binary(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accessors_match_variant() {
        let value = Parameter::Value(json!({"a": 1}));
        assert!(!value.is_binary());
        assert_eq!(value.as_value(), Some(&json!({"a": 1})));
        assert!(value.as_bytes().is_none());

        let binary = Parameter::Binary(Bytes::from_static(b"\x00\x01"));
        assert!(binary.is_binary());
        assert!(binary.as_value().is_none());
        assert_eq!(binary.as_bytes().map(|b| b.as_ref()), Some(&b"\x00\x01"[..]));
    }
}
