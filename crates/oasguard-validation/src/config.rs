use bytes::Bytes;
use oasguard_contract::ResolvedContract;
use oasguard_mediatype::ValidationContext;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::parameter::Parameter;
use crate::registry::MediaTypeRegistry;

/// Pairs a registry with the validation context it runs in.
///
/// A convenience over carrying the two around separately; most callers
/// want the default registry and only choose request or response.
#[derive(Debug, Clone)]
pub struct BodyValidatorConfig {
    registry: MediaTypeRegistry,
    context: ValidationContext,
}

impl BodyValidatorConfig {
    /// Default registry for the given context.
    pub fn new(context: ValidationContext) -> Self {
        Self {
            registry: MediaTypeRegistry::default_set(),
            context,
        }
    }

    /// Caller-supplied registry for the given context.
    pub fn with_registry(registry: MediaTypeRegistry, context: ValidationContext) -> Self {
        Self { registry, context }
    }

    pub fn registry(&self) -> &MediaTypeRegistry {
        &self.registry
    }

    pub fn context(&self) -> ValidationContext {
        self.context
    }

    /// Validates one body through the registry.
    pub fn validate(
        &self,
        contract: &ResolvedContract,
        content: Option<&Map<String, Value>>,
        content_type: &str,
        body: Bytes,
    ) -> Result<Parameter> {
        self.registry
            .validate_body(contract, content, content_type, body, self.context)
    }
}
