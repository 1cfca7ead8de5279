//! OpenAPI contract resolution.
//!
//! A contract is built once from a primary document plus zero or more
//! additional documents it references, and is immutable afterwards. The
//! build step materializes all documents concurrently, detects the schema
//! dialect from the declared `openapi` version, registers additional
//! documents into a [`SchemaRepository`] under the `app://` namespace,
//! validates the primary document against the dialect's meta-schema and
//! inlines every `$ref`. The result is a [`ResolvedContract`] that
//! validation-phase code can share across arbitrarily many concurrent
//! requests.

pub mod config;
pub mod contract;
pub mod error;
mod loader;
pub mod repository;
pub mod resolver;
pub mod version;

pub use config::ContractConfig;
pub use contract::ResolvedContract;
pub use error::{ContractError, Result};
pub use repository::{SchemaRepository, BASE_URI};
pub use resolver::resolve;
pub use version::OpenApiVersion;
