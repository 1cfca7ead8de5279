use std::fmt;
use std::io;

use oasguard_contract::ContractError;
use oasguard_validation::ValidatorError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn contract_error(context: &str, err: ContractError) -> CliError {
    let code = match &err {
        ContractError::Config(_) => USAGE,
        ContractError::Read { source, .. } => match source.kind() {
            io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
            io::ErrorKind::NotFound => FAILURE,
            _ => INTERNAL,
        },
        ContractError::Decode { .. } | ContractError::InvalidContract { .. } => DATA_INVALID,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn validator_error(context: &str, err: ValidatorError) -> CliError {
    match err {
        ValidatorError::UnsupportedMediaType { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        ValidatorError::UnsupportedValueFormat { .. }
        | ValidatorError::IllegalValue(_)
        | ValidatorError::SchemaViolation { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ValidatorError::Contract(err) => contract_error(context, err),
    }
}
