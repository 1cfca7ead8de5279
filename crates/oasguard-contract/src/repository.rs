use std::collections::BTreeMap;
use std::sync::Arc;

use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde_json::Value;

use crate::error::{ContractError, Result};

/// Base identifier under which additional contract documents are
/// registered; the key `components` becomes `app://components`.
pub const BASE_URI: &str = "app://";

/// Read-only store of dereferenceable contract documents.
///
/// Built once during contract resolution (registration is the single
/// serialization point of the build), immutable afterwards. The repository
/// compiles dialect-correct validators for schemas drawn from the resolved
/// contract and serves registered documents to the evaluator whenever a
/// schema still carries an `app://` reference.
#[derive(Debug, Clone)]
pub struct SchemaRepository {
    draft: Draft,
    documents: BTreeMap<String, Arc<Value>>,
}

/// Serves registered documents to the schema evaluator by absolute URI.
#[derive(Clone)]
struct RepositoryRetriever {
    documents: BTreeMap<String, Arc<Value>>,
}

impl Retrieve for RepositoryRetriever {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        self.documents
            .get(uri.as_str())
            .map(|document| (**document).clone())
            .ok_or_else(|| format!("schema resource not found: {uri}").into())
    }
}

impl SchemaRepository {
    /// Creates an empty repository for the given dialect.
    pub fn new(draft: Draft) -> Self {
        Self {
            draft,
            documents: BTreeMap::new(),
        }
    }

    /// Registers an additional contract document under its key.
    ///
    /// The document must itself be dialect-conformant: it is compiled as a
    /// schema of the repository's dialect, and a compilation failure is an
    /// invalid-contract error naming the key.
    pub(crate) fn register(&mut self, key: &str, document: Value) -> Result<()> {
        self.compile_raw(&document).map_err(|message| {
            ContractError::invalid(format!(
                "additional contract document '{key}' is not a valid schema: {message}"
            ))
        })?;
        tracing::debug!(key = %key, "registered additional contract document");
        self.documents
            .insert(format!("{BASE_URI}{key}"), Arc::new(document));
        Ok(())
    }

    /// Compiles a schema drawn from the resolved contract into a reusable
    /// validator. References to registered documents resolve through the
    /// repository.
    pub fn compile(&self, schema: &Value) -> Result<Validator> {
        self.compile_raw(schema).map_err(|message| {
            ContractError::invalid(format!("schema compilation failed: {message}"))
        })
    }

    fn compile_raw(&self, schema: &Value) -> std::result::Result<Validator, String> {
        let retriever = RepositoryRetriever {
            documents: self.documents.clone(),
        };
        let options = jsonschema::options()
            .with_draft(self.draft)
            .with_retriever(retriever);
        options.build(schema).map_err(|err| err.to_string())
    }

    /// Looks up a registered document by its key.
    pub fn document(&self, key: &str) -> Option<&Value> {
        self.documents
            .get(&format!("{BASE_URI}{key}"))
            .map(|document| document.as_ref())
    }

    /// The registered keys, without the base identifier.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.documents
            .keys()
            .map(|uri| uri.strip_prefix(BASE_URI).unwrap_or(uri))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn draft(&self) -> Draft {
        self.draft
    }
}
