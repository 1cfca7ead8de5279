use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use oasguard_contract::ResolvedContract;
use oasguard_mediatype::media_type::{
    APPLICATION_OCTET_STREAM, MULTIPART_FORM_DATA,
};
use oasguard_mediatype::{
    ContentAnalyser, JsonAnalyser, MediaType, MultipartAnalyser, NoOpAnalyser, ValidationContext,
};
use serde_json::{Map, Value};

use crate::error::{Result, ValidatorError};
use crate::parameter::Parameter;
use crate::validator::MediaTypeValidator;

/// Builds the content analyser for a custom registration.
pub type AnalyserFactory =
    Arc<dyn Fn(&str, Bytes, ValidationContext) -> Box<dyn ContentAnalyser> + Send + Sync>;

/// A caller-supplied registration: a predicate over the parsed full type
/// plus an analyser factory.
#[derive(Clone)]
pub struct CustomRegistration {
    pub(crate) name: String,
    pub(crate) predicate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
    pub(crate) factory: AnalyserFactory,
    pub(crate) schema_validation: bool,
}

/// One entry of the media-type registry.
///
/// The built-in families are a closed set dispatched by an ordered match;
/// `Custom` covers everything else. Registrations are tried in
/// registration order and the first match wins, so overlapping predicates
/// are resolved purely by order.
#[derive(Clone)]
pub enum Registration {
    /// `application/json`, `+json` suffixes and JSON vendor types.
    /// Syntax-checked and schema-validated.
    Json,
    /// `multipart/form-data`. Syntax-checked and schema-validated.
    Multipart,
    /// `text/plain`. Passthrough: never schema-validated.
    PlainText,
    /// `application/octet-stream`. Passthrough: never schema-validated.
    OctetStream,
    /// A caller-supplied registration.
    Custom(CustomRegistration),
}

impl Registration {
    /// Creates a custom registration. When `schema_validation` is false the
    /// registration is a passthrough: bodies are returned unvalidated, the
    /// way the octet-stream family behaves.
    pub fn custom(
        name: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
        factory: impl Fn(&str, Bytes, ValidationContext) -> Box<dyn ContentAnalyser> + Send + Sync + 'static,
        schema_validation: bool,
    ) -> Self {
        Registration::Custom(CustomRegistration {
            name: name.into(),
            predicate: Arc::new(predicate),
            factory: Arc::new(factory),
            schema_validation,
        })
    }

    /// Checks whether this registration handles the given full type.
    pub fn can_handle(&self, full_type: &str) -> bool {
        match self {
            Registration::Json => {
                full_type.starts_with("application/json") || full_type.ends_with("+json")
            }
            Registration::Multipart => full_type == MULTIPART_FORM_DATA,
            Registration::PlainText => full_type.starts_with("text/plain"),
            Registration::OctetStream => full_type == APPLICATION_OCTET_STREAM,
            Registration::Custom(custom) => (custom.predicate)(full_type),
        }
    }

    /// Whether validators of this registration run schema validation at
    /// all. Passthrough registrations return the raw bytes unconditionally.
    pub(crate) fn schema_validation(&self) -> bool {
        match self {
            Registration::Json | Registration::Multipart => true,
            Registration::PlainText | Registration::OctetStream => false,
            Registration::Custom(custom) => custom.schema_validation,
        }
    }

    /// Creates a fresh analyser for one body.
    pub(crate) fn analyser(
        &self,
        content_type: &str,
        content: Bytes,
        context: ValidationContext,
    ) -> Box<dyn ContentAnalyser> {
        match self {
            Registration::Json => Box::new(JsonAnalyser::new(content_type, content, context)),
            Registration::Multipart => {
                Box::new(MultipartAnalyser::new(content_type, content, context))
            }
            Registration::PlainText | Registration::OctetStream => {
                Box::new(NoOpAnalyser::new(content_type, content, context))
            }
            Registration::Custom(custom) => (custom.factory)(content_type, content, context),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Registration::Json => write!(f, "Json"),
            Registration::Multipart => write!(f, "Multipart"),
            Registration::PlainText => write!(f, "PlainText"),
            Registration::OctetStream => write!(f, "OctetStream"),
            Registration::Custom(custom) => write!(f, "Custom({})", custom.name),
        }
    }
}

/// Ordered set of media-type registrations.
///
/// Read-only after construction; safe to share across concurrent
/// validations.
#[derive(Debug, Clone)]
pub struct MediaTypeRegistry {
    registrations: Vec<Registration>,
}

impl MediaTypeRegistry {
    /// Creates an empty registry; the caller registers everything.
    pub fn empty() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Creates the default registry: text/plain, multipart/form-data, the
    /// JSON family, application/octet-stream, in that priority. The order
    /// is the tie-break for overlapping predicates and is part of the
    /// contract of this function.
    pub fn default_set() -> Self {
        let mut registry = Self::empty();
        registry
            .register(Registration::PlainText)
            .register(Registration::Multipart)
            .register(Registration::Json)
            .register(Registration::OctetStream);
        registry
    }

    /// Appends a registration. No dedup: a later registration overlapping
    /// an earlier one is simply never reached for the overlap.
    pub fn register(&mut self, registration: Registration) -> &mut Self {
        self.registrations.push(registration);
        self
    }

    /// Checks whether any registration handles the given raw content type.
    pub fn is_supported(&self, content_type: &str) -> bool {
        let full_type = MediaType::parse(content_type).full_type();
        self.registrations
            .iter()
            .any(|registration| registration.can_handle(&full_type))
    }

    /// The first registration handling the given full type.
    pub fn find(&self, full_type: &str) -> Option<&Registration> {
        self.registrations
            .iter()
            .find(|registration| registration.can_handle(full_type))
    }

    /// Dispatches a body to the matching registration's validator.
    ///
    /// `content` is the operation's content map for the body being
    /// validated (request or one response), or `None` when the operation
    /// declares none.
    pub fn validate_body(
        &self,
        contract: &ResolvedContract,
        content: Option<&Map<String, Value>>,
        content_type: &str,
        body: Bytes,
        context: ValidationContext,
    ) -> Result<Parameter> {
        let full_type = MediaType::parse(content_type).full_type();
        let registration =
            self.find(&full_type)
                .ok_or_else(|| ValidatorError::UnsupportedMediaType {
                    media_type: content_type.to_string(),
                })?;
        tracing::trace!(%full_type, registration = ?registration, "dispatching body");

        let validator =
            MediaTypeValidator::new(registration, contract, content, &full_type, context)?;
        validator.validate(content_type, &body)
    }
}

impl Default for MediaTypeRegistry {
    fn default() -> Self {
        Self::default_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_supports_the_documented_families() {
        let registry = MediaTypeRegistry::default_set();
        assert!(registry.is_supported("text/plain"));
        assert!(registry.is_supported("multipart/form-data"));
        assert!(registry.is_supported("application/json"));
        assert!(registry.is_supported("application/octet-stream"));
        assert!(!registry.is_supported("application/xml"));
    }

    #[test]
    fn default_set_supports_json_variants() {
        let registry = MediaTypeRegistry::default_set();
        assert!(registry.is_supported("application/json; charset=utf-8"));
        assert!(registry.is_supported("application/hal+json"));
        assert!(registry.is_supported("application/vnd.api+json"));
        assert!(registry.is_supported("text/plain; charset=utf-8"));
    }

    #[test]
    fn empty_registry_supports_nothing() {
        let registry = MediaTypeRegistry::empty();
        assert!(!registry.is_supported("application/json"));
        assert!(!registry.is_supported("text/plain"));
    }

    #[test]
    fn vendor_json_dispatches_to_the_json_family() {
        let registry = MediaTypeRegistry::default_set();
        let registration = registry.find("application/vnd.api+json").unwrap();
        assert!(matches!(registration, Registration::Json));
    }

    #[test]
    fn first_matching_registration_wins() {
        let mut registry = MediaTypeRegistry::empty();
        registry
            .register(Registration::custom(
                "grab-all",
                |_| true,
                |content_type, content, context| {
                    Box::new(NoOpAnalyser::new(content_type, content, context))
                },
                false,
            ))
            .register(Registration::Json);

        // The custom registration shadows the JSON family entirely.
        let registration = registry.find("application/json").unwrap();
        assert!(matches!(registration, Registration::Custom(_)));
    }

    #[test]
    fn registration_predicates_match_the_documented_types() {
        assert!(Registration::Json.can_handle("application/json"));
        assert!(Registration::Json.can_handle("application/hal+json"));
        assert!(!Registration::Json.can_handle("application/xml"));
        assert!(Registration::Multipart.can_handle("multipart/form-data"));
        assert!(!Registration::Multipart.can_handle("multipart/mixed"));
        assert!(Registration::PlainText.can_handle("text/plain"));
        assert!(!Registration::PlainText.can_handle("text/html"));
        assert!(Registration::OctetStream.can_handle("application/octet-stream"));
    }
}
