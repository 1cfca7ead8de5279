use crate::context::ValidationContext;

/// Errors raised while analysing body content.
#[derive(Debug, thiserror::Error)]
pub enum MediaTypeError {
    /// The body bytes are not well-formed for the matched media family.
    #[error("the {context} body is syntactically malformed: {message}")]
    Syntax {
        context: ValidationContext,
        message: String,
    },
}

impl MediaTypeError {
    /// Builds the error for syntactically incorrect content.
    pub fn syntax(context: ValidationContext, message: impl Into<String>) -> Self {
        MediaTypeError::Syntax {
            context,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MediaTypeError>;
