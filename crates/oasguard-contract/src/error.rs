use std::fmt;
use std::path::PathBuf;

/// Errors raised while building a contract.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// The contract configuration is inconsistent. Raised synchronously,
    /// before any I/O.
    #[error("invalid contract configuration: {0}")]
    Config(String),

    /// A contract document could not be read.
    #[error("failed to read contract document {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A contract document could not be decoded as YAML or JSON.
    #[error("failed to decode contract document {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    /// The contract cannot be used: a document failed meta-schema
    /// validation, a reference did not resolve, or resolution hit an
    /// unexpected issue. The single error surface for an unusable contract.
    #[error("invalid contract: {message}{}", format_violations(.violations))]
    InvalidContract {
        message: String,
        violations: Vec<String>,
    },
}

impl ContractError {
    /// Builds an invalid-contract error without a violation report.
    pub fn invalid(message: impl Into<String>) -> Self {
        ContractError::InvalidContract {
            message: message.into(),
            violations: Vec::new(),
        }
    }

    /// Wraps a non-contract failure encountered during resolution,
    /// preserving the original message for diagnostics.
    pub fn found_issue(cause: impl fmt::Display) -> Self {
        ContractError::invalid(format!(
            "found issue in specification for reference: {cause}"
        ))
    }
}

fn format_violations(violations: &[String]) -> String {
    if violations.is_empty() {
        String::new()
    } else {
        format!(" ({})", violations.join("; "))
    }
}

pub type Result<T> = std::result::Result<T, ContractError>;
