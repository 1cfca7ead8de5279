use std::sync::Arc;

use serde_json::{Map, Value};

use crate::repository::SchemaRepository;
use crate::version::OpenApiVersion;

/// A resolved contract: the fully dereferenced primary document, its
/// version, and the schema repository backing it.
///
/// Constructed once by [`resolve`](crate::resolver::resolve) and immutable
/// afterwards; safe to share across concurrent validations.
#[derive(Debug, Clone)]
pub struct ResolvedContract {
    version: OpenApiVersion,
    document: Value,
    repository: Arc<SchemaRepository>,
}

impl ResolvedContract {
    pub(crate) fn new(
        version: OpenApiVersion,
        document: Value,
        repository: Arc<SchemaRepository>,
    ) -> Self {
        Self {
            version,
            document,
            repository,
        }
    }

    pub fn version(&self) -> OpenApiVersion {
        self.version
    }

    /// The resolved document; every `$ref` has been replaced by its target.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn repository(&self) -> &Arc<SchemaRepository> {
        &self.repository
    }

    /// Looks up an operation object by path template and lowercased HTTP
    /// method.
    pub fn operation(&self, path: &str, method: &str) -> Option<&Value> {
        self.document
            .get("paths")?
            .get(path)?
            .get(method.to_ascii_lowercase().as_str())
    }

    /// The request body content map of an operation, if declared.
    pub fn request_content(&self, path: &str, method: &str) -> Option<&Map<String, Value>> {
        self.operation(path, method)?
            .get("requestBody")?
            .get("content")?
            .as_object()
    }

    /// The content map of one response of an operation, if declared.
    pub fn response_content(
        &self,
        path: &str,
        method: &str,
        status: &str,
    ) -> Option<&Map<String, Value>> {
        self.operation(path, method)?
            .get("responses")?
            .get(status)?
            .get("content")?
            .as_object()
    }

    /// Number of path templates in the contract.
    pub fn path_count(&self) -> usize {
        self.document
            .get("paths")
            .and_then(Value::as_object)
            .map(Map::len)
            .unwrap_or(0)
    }

    /// Number of operations across all paths.
    pub fn operation_count(&self) -> usize {
        const METHODS: [&str; 8] = [
            "get", "put", "post", "delete", "options", "head", "patch", "trace",
        ];
        self.document
            .get("paths")
            .and_then(Value::as_object)
            .map(|paths| {
                paths
                    .values()
                    .filter_map(Value::as_object)
                    .map(|item| item.keys().filter(|k| METHODS.contains(&k.as_str())).count())
                    .sum()
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonschema::Draft;
    use serde_json::json;

    fn contract() -> ResolvedContract {
        let document = json!({
            "openapi": "3.0.3",
            "info": {"title": "pets", "version": "1.0.0"},
            "paths": {
                "/pets": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {"schema": {"type": "object"}}
                            }
                        },
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {"schema": {"type": "array"}}
                                }
                            }
                        }
                    },
                    "get": {"responses": {"200": {"description": "ok"}}}
                }
            }
        });
        ResolvedContract::new(
            OpenApiVersion::V3_0,
            document,
            Arc::new(SchemaRepository::new(Draft::Draft4)),
        )
    }

    #[test]
    fn finds_operations_case_insensitively() {
        let contract = contract();
        assert!(contract.operation("/pets", "post").is_some());
        assert!(contract.operation("/pets", "POST").is_some());
        assert!(contract.operation("/pets", "delete").is_none());
        assert!(contract.operation("/missing", "get").is_none());
    }

    #[test]
    fn exposes_request_and_response_content_maps() {
        let contract = contract();
        let request = contract.request_content("/pets", "post").unwrap();
        assert!(request.contains_key("application/json"));

        let response = contract.response_content("/pets", "post", "200").unwrap();
        assert!(response.contains_key("application/json"));

        assert!(contract.request_content("/pets", "get").is_none());
        assert!(contract.response_content("/pets", "post", "404").is_none());
    }

    #[test]
    fn counts_paths_and_operations() {
        let contract = contract();
        assert_eq!(contract.path_count(), 1);
        assert_eq!(contract.operation_count(), 2);
    }
}
