//! Content-type parsing and per-family content analysis.
//!
//! This is the leaf layer of oasguard. A raw `Content-Type` header value is
//! split into its base type, structural suffix, and parameters; per media
//! family a [`ContentAnalyser`] checks the payload bytes for syntactic
//! well-formedness and transforms them into a canonical JSON value for
//! schema validation.
//!
//! No schema knowledge lives here — deciding *whether* to validate and
//! against *what* is the job of the validation layer.

pub mod analyser;
pub mod context;
pub mod error;
pub mod media_type;
pub mod multipart;

pub use analyser::{ContentAnalyser, JsonAnalyser, NoOpAnalyser, TextAnalyser};
pub use context::ValidationContext;
pub use error::{MediaTypeError, Result};
pub use media_type::{is_vendor_specific_json, MediaType};
pub use multipart::MultipartAnalyser;
