use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::Value;

use crate::config::ContractConfig;
use crate::contract::ResolvedContract;
use crate::error::{ContractError, Result};
use crate::loader;
use crate::repository::{SchemaRepository, BASE_URI};
use crate::version::OpenApiVersion;

/// Builds a [`ResolvedContract`] from a configuration.
///
/// Documents are materialized concurrently with all-or-first-error join
/// semantics: the first read failure aborts the build without waiting for
/// the remaining reads. Everything after materialization is CPU work and
/// runs sequentially; registration into the shared repository is the
/// build's single serialization point.
pub async fn resolve(config: ContractConfig) -> Result<ResolvedContract> {
    let ContractConfig {
        primary_path,
        primary_document,
        additional_paths,
        additional_documents,
    } = config;

    enum PrimarySource {
        Path(std::path::PathBuf),
        Document(Value),
    }

    let primary_source = match (primary_path, primary_document) {
        (Some(path), _) => PrimarySource::Path(path),
        (None, Some(document)) => PrimarySource::Document(document),
        (None, None) => {
            return Err(ContractError::Config(
                "neither a primary document path nor a parsed primary document is set".to_string(),
            ));
        }
    };

    let primary = async {
        match primary_source {
            PrimarySource::Path(path) => loader::load_document(&path).await,
            PrimarySource::Document(document) => Ok(document),
        }
    };

    let additional_reads = additional_paths.into_iter().map(|(key, path)| async move {
        let document = loader::load_document(&path).await?;
        Ok::<_, ContractError>((key, document))
    });

    let (primary, mut additionals) =
        futures::try_join!(primary, try_join_all(additional_reads))?;
    additionals.extend(additional_documents);

    tracing::debug!(
        additional = additionals.len(),
        "materialized contract documents"
    );
    build(primary, additionals)
}

/// Steps 2–5 of the build: version detection, repository registration,
/// meta-schema validation, reference resolution.
fn build(primary: Value, additionals: Vec<(String, Value)>) -> Result<ResolvedContract> {
    let version = OpenApiVersion::from_document(&primary)?;

    let mut repository = SchemaRepository::new(version.draft());
    for (key, document) in additionals {
        repository.register(&key, document)?;
    }

    validate_against_meta_schema(version, &primary)?;

    let document = resolve_refs(&primary, &repository).map_err(ContractError::found_issue)?;

    tracing::debug!(version = %version, "resolved contract");
    Ok(ResolvedContract::new(
        version,
        document,
        Arc::new(repository),
    ))
}

fn validate_against_meta_schema(version: OpenApiVersion, primary: &Value) -> Result<()> {
    let meta = version.meta_schema()?;
    let validator = jsonschema::validator_for(&meta)
        .map_err(|err| ContractError::found_issue(format!("embedded meta-schema: {err}")))?;

    let violations: Vec<String> = validator
        .iter_errors(primary)
        .map(|err| format!("{err} at {}", err.instance_path()))
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ContractError::InvalidContract {
            message: format!("document does not conform to OpenAPI {version}"),
            violations,
        })
    }
}

/// Replaces every `$ref` in the primary document with its target.
///
/// Local references (`#/...`) resolve against the document that contains
/// them; external references (`key`, `key#/...`, `app://key#/...`) resolve
/// against the registered additional documents. A reference cycle is an
/// error — circular contracts cannot be inlined.
fn resolve_refs(
    primary: &Value,
    repository: &SchemaRepository,
) -> std::result::Result<Value, String> {
    let mut stack = Vec::new();
    deref_value(primary, primary, "", repository, &mut stack)
}

fn deref_value(
    node: &Value,
    root: &Value,
    base: &str,
    repository: &SchemaRepository,
    stack: &mut Vec<String>,
) -> std::result::Result<Value, String> {
    match node {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref") {
                let reference = reference
                    .as_str()
                    .ok_or_else(|| "'$ref' must be a string".to_string())?;
                let (target, target_root, target_base, canonical) =
                    lookup(reference, root, base, repository)?;
                if stack.contains(&canonical) {
                    return Err(format!("circular reference: {canonical}"));
                }
                stack.push(canonical);
                let resolved = deref_value(target, target_root, &target_base, repository, stack)?;
                stack.pop();
                return Ok(resolved);
            }
            let mut resolved = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                resolved.insert(
                    key.clone(),
                    deref_value(value, root, base, repository, stack)?,
                );
            }
            Ok(Value::Object(resolved))
        }
        Value::Array(items) => {
            let resolved = items
                .iter()
                .map(|item| deref_value(item, root, base, repository, stack))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(Value::Array(resolved))
        }
        scalar => Ok(scalar.clone()),
    }
}

/// Resolves a reference string to its target value, the document that
/// target lives in, that document's base identifier, and a canonical form
/// of the reference for cycle detection.
fn lookup<'a>(
    reference: &str,
    root: &'a Value,
    base: &str,
    repository: &'a SchemaRepository,
) -> std::result::Result<(&'a Value, &'a Value, String, String), String> {
    if let Some(pointer) = reference.strip_prefix('#') {
        let target = root
            .pointer(pointer)
            .ok_or_else(|| format!("unresolvable reference: {reference}"))?;
        return Ok((target, root, base.to_string(), format!("{base}#{pointer}")));
    }

    let rest = reference.strip_prefix(BASE_URI).unwrap_or(reference);
    let (key, pointer) = match rest.split_once('#') {
        Some((key, pointer)) => (key, pointer),
        None => (rest, ""),
    };
    let document = repository
        .document(key)
        .ok_or_else(|| format!("unknown additional content key '{key}' in reference: {reference}"))?;
    let target = if pointer.is_empty() {
        document
    } else {
        document
            .pointer(pointer)
            .ok_or_else(|| format!("unresolvable reference: {reference}"))?
    };
    let target_base = format!("{BASE_URI}{key}");
    let canonical = format!("{target_base}#{pointer}");
    Ok((target, document, target_base, canonical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn minimal_contract() -> Value {
        json!({
            "openapi": "3.0.3",
            "info": {"title": "pets", "version": "1.0.0"},
            "paths": {
                "/pets": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Pet"}
                                }
                            }
                        },
                        "responses": {"201": {"description": "created"}}
                    }
                }
            },
            "components": {
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {"name": {"type": "string"}}
                    }
                }
            }
        })
    }

    fn temp_contract_file(tag: &str, name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "oasguard-resolver-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("temp file should be writable");
        path
    }

    #[tokio::test]
    async fn resolves_self_contained_contract() {
        let config = ContractConfig::new()
            .primary_document(minimal_contract())
            .unwrap();
        let contract = resolve(config).await.unwrap();

        assert_eq!(contract.version(), OpenApiVersion::V3_0);
        assert!(contract.repository().is_empty());

        // The local reference has been inlined.
        let schema = contract
            .document()
            .pointer("/paths/~1pets/post/requestBody/content/application~1json/schema")
            .unwrap();
        assert_eq!(schema["type"], json!("object"));
    }

    #[tokio::test]
    async fn fails_before_io_when_no_primary_is_set() {
        let err = resolve(ContractConfig::new()).await.unwrap_err();
        assert!(matches!(err, ContractError::Config(_)));
    }

    #[tokio::test]
    async fn resolves_external_reference_supplied_as_value() {
        let mut primary = minimal_contract();
        primary["paths"]["/pets"]["post"]["requestBody"]["content"]["application/json"]
            ["schema"] = json!({"$ref": "shared#/$defs/Pet"});

        let shared = json!({
            "$defs": {
                "Pet": {"type": "object", "required": ["id"], "properties": {"id": {"type": "integer"}}}
            }
        });

        let config = ContractConfig::new()
            .primary_document(primary)
            .unwrap()
            .additional_document("shared", shared)
            .unwrap();
        let contract = resolve(config).await.unwrap();

        let schema = contract
            .document()
            .pointer("/paths/~1pets/post/requestBody/content/application~1json/schema")
            .unwrap();
        assert_eq!(schema["required"], json!(["id"]));
        assert_eq!(contract.repository().len(), 1);
    }

    #[tokio::test]
    async fn resolves_external_reference_supplied_as_path() {
        let shared_path = temp_contract_file(
            "shared",
            "shared.json",
            r#"{"$defs": {"Pet": {"type": "string"}}}"#,
        );

        let mut primary = minimal_contract();
        primary["paths"]["/pets"]["post"]["requestBody"]["content"]["application/json"]
            ["schema"] = json!({"$ref": "app://shared#/$defs/Pet"});

        let config = ContractConfig::new()
            .primary_document(primary)
            .unwrap()
            .additional_path("shared", shared_path)
            .unwrap();
        let contract = resolve(config).await.unwrap();

        let schema = contract
            .document()
            .pointer("/paths/~1pets/post/requestBody/content/application~1json/schema")
            .unwrap();
        assert_eq!(schema["type"], json!("string"));
    }

    #[tokio::test]
    async fn fails_when_referenced_key_is_absent() {
        let mut primary = minimal_contract();
        primary["paths"]["/pets"]["post"]["requestBody"]["content"]["application/json"]
            ["schema"] = json!({"$ref": "missing#/$defs/Pet"});

        let config = ContractConfig::new().primary_document(primary).unwrap();
        let err = resolve(config).await.unwrap_err();
        assert!(matches!(err, ContractError::InvalidContract { .. }));
        assert!(err.to_string().contains("found issue in specification"));
    }

    #[tokio::test]
    async fn fails_fast_on_read_errors() {
        let config = ContractConfig::new()
            .primary_document(minimal_contract())
            .unwrap()
            .additional_path("missing", "/nonexistent/shared.json")
            .unwrap();
        let err = resolve(config).await.unwrap_err();
        assert!(matches!(err, ContractError::Read { .. }));
    }

    #[tokio::test]
    async fn rejects_documents_failing_the_meta_schema() {
        let config = ContractConfig::new()
            .primary_document(json!({"openapi": "3.0.0", "info": {"title": "x"}}))
            .unwrap();
        let err = resolve(config).await.unwrap_err();
        match err {
            ContractError::InvalidContract { violations, .. } => {
                assert!(!violations.is_empty());
            }
            other => panic!("expected invalid contract, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_circular_references() {
        let mut primary = minimal_contract();
        primary["components"]["schemas"]["Pet"] =
            json!({"$ref": "#/components/schemas/Pet"});

        let config = ContractConfig::new().primary_document(primary).unwrap();
        let err = resolve(config).await.unwrap_err();
        assert!(err.to_string().contains("circular reference"));
    }

    #[tokio::test]
    async fn yaml_and_json_primary_documents_resolve_identically() {
        let yaml = concat!(
            "openapi: 3.0.3\n",
            "info:\n  title: pets\n  version: 1.0.0\n",
            "paths:\n  /pets:\n    get:\n      responses:\n        '200':\n          description: ok\n",
        );
        let yaml_path = temp_contract_file("yaml", "contract.yaml", yaml);
        let json_path = temp_contract_file(
            "json",
            "contract.json",
            r#"{
                "openapi": "3.0.3",
                "info": {"title": "pets", "version": "1.0.0"},
                "paths": {"/pets": {"get": {"responses": {"200": {"description": "ok"}}}}}
            }"#,
        );

        let from_yaml = resolve(ContractConfig::new().primary_path(yaml_path).unwrap())
            .await
            .unwrap();
        let from_json = resolve(ContractConfig::new().primary_path(json_path).unwrap())
            .await
            .unwrap();
        assert_eq!(from_yaml.document(), from_json.document());
    }

    #[tokio::test]
    async fn rejects_additional_document_that_is_not_a_schema() {
        let config = ContractConfig::new()
            .primary_document(minimal_contract())
            .unwrap()
            .additional_document("bad", json!({"type": "definitely-not-a-type"}))
            .unwrap();
        let err = resolve(config).await.unwrap_err();
        assert!(matches!(err, ContractError::InvalidContract { .. }));
    }
}
