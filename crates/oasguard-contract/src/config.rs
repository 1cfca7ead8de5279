use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::{ContractError, Result};

/// Configuration for a contract build.
///
/// An explicit value in place of a mutable builder: every setter validates
/// eagerly and returns `Result`, so an inconsistent configuration (both
/// primary sources set, a duplicate additional-content key) fails at the
/// call that introduces it, not at resolve time. The only check left to
/// [`resolve`](crate::resolver::resolve) is that a primary source exists at
/// all, which it performs before any I/O.
#[derive(Debug, Clone, Default)]
pub struct ContractConfig {
    pub(crate) primary_path: Option<PathBuf>,
    pub(crate) primary_document: Option<Value>,
    pub(crate) additional_paths: BTreeMap<String, PathBuf>,
    pub(crate) additional_documents: BTreeMap<String, Value>,
}

impl ContractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path to the primary contract document. Fails if a parsed
    /// primary document was already supplied.
    pub fn primary_path(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        if self.primary_document.is_some() {
            return Err(ContractError::Config(
                "a parsed primary document was already set; supply a path or a document, not both"
                    .to_string(),
            ));
        }
        self.primary_path = Some(path.into());
        Ok(self)
    }

    /// Sets the parsed primary contract document. Fails if a primary
    /// document path was already supplied.
    pub fn primary_document(mut self, document: Value) -> Result<Self> {
        if self.primary_path.is_some() {
            return Err(ContractError::Config(
                "a primary document path was already set; supply a path or a document, not both"
                    .to_string(),
            ));
        }
        self.primary_document = Some(document);
        Ok(self)
    }

    /// Adds an additional document, referenced by the primary contract
    /// under `key`, to be read from `path`. Keys must be unique across
    /// path-sourced and value-sourced additional content.
    pub fn additional_path(mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
        let key = key.into();
        self.check_duplicate_key(&key)?;
        self.additional_paths.insert(key, path.into());
        Ok(self)
    }

    /// Adds an additional document, referenced by the primary contract
    /// under `key`, supplied already parsed.
    pub fn additional_document(mut self, key: impl Into<String>, document: Value) -> Result<Self> {
        let key = key.into();
        self.check_duplicate_key(&key)?;
        self.additional_documents.insert(key, document);
        Ok(self)
    }

    /// Adds several path-sourced additional documents.
    pub fn additional_paths<K, P>(mut self, entries: impl IntoIterator<Item = (K, P)>) -> Result<Self>
    where
        K: Into<String>,
        P: Into<PathBuf>,
    {
        for (key, path) in entries {
            self = self.additional_path(key, path)?;
        }
        Ok(self)
    }

    /// Adds several value-sourced additional documents.
    pub fn additional_documents<K>(mut self, entries: impl IntoIterator<Item = (K, Value)>) -> Result<Self>
    where
        K: Into<String>,
    {
        for (key, document) in entries {
            self = self.additional_document(key, document)?;
        }
        Ok(self)
    }

    /// True if either primary source is set.
    pub fn has_primary(&self) -> bool {
        self.primary_path.is_some() || self.primary_document.is_some()
    }

    fn check_duplicate_key(&self, key: &str) -> Result<()> {
        if self.additional_paths.contains_key(key) || self.additional_documents.contains_key(key) {
            return Err(ContractError::Config(format!(
                "the additional content key '{key}' has been added twice"
            )));
        }
        Ok(())
    }
}
