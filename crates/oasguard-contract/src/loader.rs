use std::path::Path;

use serde_json::Value;

use crate::error::{ContractError, Result};

/// Reads and decodes a contract document. `.yaml`/`.yml` paths decode as
/// YAML, everything else as JSON. Decode failures are read-phase errors,
/// not invalid-contract errors.
pub(crate) async fn load_document(path: &Path) -> Result<Value> {
    let raw = tokio::fs::read(path).await.map_err(|source| ContractError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_document(path, &raw)
}

fn decode_document(path: &Path, raw: &[u8]) -> Result<Value> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml_ng::from_slice(raw).map_err(|err| ContractError::Decode {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    } else {
        serde_json::from_slice(raw).map_err(|err| ContractError::Decode {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn temp_file(tag: &str, name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "oasguard-loader-{tag}-{}-{}",
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
    async fn loads_json_documents() {
        let path = temp_file("json", "doc.json", r#"{"openapi": "3.0.3"}"#);
        let doc = load_document(&path).await.unwrap();
        assert_eq!(doc, json!({"openapi": "3.0.3"}));
    }

    #[tokio::test]
    async fn loads_yaml_documents() {
        let path = temp_file("yaml", "doc.yaml", "openapi: 3.0.3\ninfo:\n  title: t\n");
        let doc = load_document(&path).await.unwrap();
        assert_eq!(doc, json!({"openapi": "3.0.3", "info": {"title": "t"}}));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let err = load_document(Path::new("/nonexistent/contract.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Read { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let path = temp_file("bad", "doc.json", "{broken");
        let err = load_document(&path).await.unwrap_err();
        assert!(matches!(err, ContractError::Decode { .. }));
    }
}
