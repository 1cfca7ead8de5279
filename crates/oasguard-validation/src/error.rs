use oasguard_contract::ContractError;
use oasguard_mediatype::{MediaTypeError, ValidationContext};
use serde::Serialize;

/// One schema violation from the evaluator's report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON pointer to the offending location in the body.
    pub instance_path: String,
    /// The evaluator's message for the violated keyword.
    pub message: String,
}

/// Errors raised while validating a body.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// No registration in the registry matches the content type.
    #[error("unsupported media type {media_type}")]
    UnsupportedMediaType { media_type: String },

    /// The registry matched, but the operation's content map declares no
    /// entry for this content type.
    #[error("the format of the {context} body is not supported")]
    UnsupportedValueFormat { context: ValidationContext },

    /// The body bytes are not well-formed for the matched family.
    #[error("illegal value: {0}")]
    IllegalValue(#[from] MediaTypeError),

    /// The transformed value violates the schema.
    #[error("the {context} body is invalid: {} schema violation(s)", .violations.len())]
    SchemaViolation {
        context: ValidationContext,
        violations: Vec<Violation>,
    },

    /// Contract-level failure while compiling the entry's schema.
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
