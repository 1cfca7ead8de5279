//! OpenAPI request/response body validation against resolved contracts.
//!
//! oasguard validates HTTP-style bodies against an OpenAPI 3.0/3.1
//! contract: a raw content-type string and a byte payload are dispatched
//! to a media family, checked for syntactic well-formedness, transformed
//! into a canonical value and validated against the correct schema — with
//! binary payloads passed through untouched.
//!
//! # Crate Structure
//!
//! - [`mediatype`] — Content-type parsing and per-family content analysers
//! - [`contract`] — Contract resolution and the dereferenced schema repository
//! - [`validation`] — Media-type registry and body validators

/// Re-export media-type types.
pub mod mediatype {
    pub use oasguard_mediatype::*;
}

/// Re-export contract resolution types.
pub mod contract {
    pub use oasguard_contract::*;
}

/// Re-export validation types.
pub mod validation {
    pub use oasguard_validation::*;
}
