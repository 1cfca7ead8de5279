//! Media-type dispatch and body validation against a resolved contract.
//!
//! A [`MediaTypeRegistry`] holds an ordered list of registrations; the
//! first registration whose predicate matches a parsed content type wins
//! and supplies the validator for it. Validators run the family's content
//! analyser, decide whether schema validation applies (binary string
//! schemas and undeclared schemas pass through), and validate the
//! transformed value against the contract's schema repository.
//!
//! Registry and contract are read-only after construction; every
//! validation call allocates only request-scoped state and concurrent
//! calls are fully independent.

pub mod config;
pub mod error;
pub mod parameter;
pub mod registry;
pub mod validator;

pub use config::BodyValidatorConfig;
pub use error::{Result, ValidatorError, Violation};
pub use parameter::Parameter;
pub use registry::{AnalyserFactory, CustomRegistration, MediaTypeRegistry, Registration};
pub use validator::{MediaTypeEntry, MediaTypeValidator};
