use bytes::Bytes;
use serde_json::Value;

use crate::context::ValidationContext;
use crate::error::{MediaTypeError, Result};

/// Per-invocation content analysis for one media family.
///
/// An analyser is constructed for a single body and used in two phases:
/// [`check_syntax`](ContentAnalyser::check_syntax) fails fast on malformed
/// bytes, [`transform`](ContentAnalyser::transform) produces the canonical
/// value handed to schema validation. Callers must not call `transform`
/// when `check_syntax` failed.
pub trait ContentAnalyser {
    /// Checks that the raw bytes are syntactically well-formed for the
    /// family.
    fn check_syntax(&self) -> Result<()>;

    /// Transforms the raw bytes into the canonical value used for schema
    /// validation.
    fn transform(&self) -> Result<Value>;
}

/// Analyser for the JSON family (`application/json`, `+json` suffixes and
/// JSON vendor types).
pub struct JsonAnalyser {
    content: Bytes,
    context: ValidationContext,
}

impl JsonAnalyser {
    pub fn new(_content_type: &str, content: Bytes, context: ValidationContext) -> Self {
        Self { content, context }
    }

    fn decode(&self) -> Result<Value> {
        serde_json::from_slice(&self.content).map_err(|err| {
            MediaTypeError::syntax(self.context, format!("invalid JSON: {err}"))
        })
    }
}

impl ContentAnalyser for JsonAnalyser {
    fn check_syntax(&self) -> Result<()> {
        self.decode().map(|_| ())
    }

    fn transform(&self) -> Result<Value> {
        self.decode()
    }
}

/// Analyser for `text/plain`. Any byte sequence is valid text at this
/// layer; the transform is the decoded string.
pub struct TextAnalyser {
    content: Bytes,
}

impl TextAnalyser {
    pub fn new(_content_type: &str, content: Bytes, _context: ValidationContext) -> Self {
        Self { content }
    }
}

impl ContentAnalyser for TextAnalyser {
    fn check_syntax(&self) -> Result<()> {
        Ok(())
    }

    fn transform(&self) -> Result<Value> {
        Ok(Value::String(
            String::from_utf8_lossy(&self.content).into_owned(),
        ))
    }
}

/// Analyser for passthrough families such as `application/octet-stream`.
///
/// Both phases are no-ops. Validators built on this analyser return the raw
/// bytes without schema validation, so `transform` is normally never
/// reached; it renders the bytes as a lossy string for completeness.
pub struct NoOpAnalyser {
    content: Bytes,
}

impl NoOpAnalyser {
    pub fn new(_content_type: &str, content: Bytes, _context: ValidationContext) -> Self {
        Self { content }
    }
}

impl ContentAnalyser for NoOpAnalyser {
    fn check_syntax(&self) -> Result<()> {
        Ok(())
    }

    fn transform(&self) -> Result<Value> {
        Ok(Value::String(
            String::from_utf8_lossy(&self.content).into_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bytes(raw: &str) -> Bytes {
        Bytes::copy_from_slice(raw.as_bytes())
    }

    #[test]
    fn json_analyser_accepts_valid_json() {
        let analyser = JsonAnalyser::new(
            "application/json",
            bytes(r#"{"id":1,"name":"pet"}"#),
            ValidationContext::Request,
        );
        assert!(analyser.check_syntax().is_ok());
        assert_eq!(
            analyser.transform().unwrap(),
            json!({"id": 1, "name": "pet"})
        );
    }

    #[test]
    fn json_analyser_accepts_scalars_and_arrays() {
        for raw in ["42", "\"hello\"", "[1,2,3]", "null"] {
            let analyser =
                JsonAnalyser::new("application/json", bytes(raw), ValidationContext::Request);
            assert!(analyser.check_syntax().is_ok(), "{raw} should decode");
        }
    }

    #[test]
    fn json_analyser_rejects_malformed_json() {
        let analyser = JsonAnalyser::new(
            "application/json",
            bytes("{not json"),
            ValidationContext::Response,
        );
        let err = analyser.check_syntax().unwrap_err();
        let MediaTypeError::Syntax { context, .. } = err;
        assert_eq!(context, ValidationContext::Response);
    }

    #[test]
    fn text_analyser_is_always_valid() {
        let analyser = TextAnalyser::new(
            "text/plain",
            Bytes::from_static(&[0xff, 0xfe, 0x00]),
            ValidationContext::Request,
        );
        assert!(analyser.check_syntax().is_ok());
        assert!(matches!(analyser.transform().unwrap(), Value::String(_)));
    }

    #[test]
    fn text_analyser_transforms_to_string() {
        let analyser =
            TextAnalyser::new("text/plain", bytes("hello world"), ValidationContext::Request);
        assert_eq!(analyser.transform().unwrap(), json!("hello world"));
    }

    #[test]
    fn noop_analyser_accepts_anything() {
        let analyser = NoOpAnalyser::new(
            "application/octet-stream",
            Bytes::from_static(&[0x00, 0x01, 0x02]),
            ValidationContext::Request,
        );
        assert!(analyser.check_syntax().is_ok());
    }
}
