use std::fmt;

/// Whether a body is being validated as a request or a response.
///
/// Carried through analysers and validators so that errors name the body
/// they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationContext {
    Request,
    Response,
}

impl fmt::Display for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationContext::Request => write!(f, "request"),
            ValidationContext::Response => write!(f, "response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_lowercase_body_kind() {
        assert_eq!(ValidationContext::Request.to_string(), "request");
        assert_eq!(ValidationContext::Response.to_string(), "response");
    }
}
