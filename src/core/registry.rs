use crate::core::document::FiscalDocument;
use std::collections::HashMap;

/// Loaded documents keyed by file name. Grows only; the first document
/// registered under a name wins.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: HashMap<String, FiscalDocument>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when a document with the same name is already present.
    pub fn add(&mut self, doc: FiscalDocument) -> bool {
        if self.documents.contains_key(doc.name()) {
            tracing::warn!("Document {} already loaded, keeping existing entry", doc.name());
            return false;
        }

        tracing::info!("Registered document {}", doc.name());
        self.documents.insert(doc.name().to_string(), doc);
        true
    }

    pub fn get(&self, name: &str) -> Option<&FiscalDocument> {
        self.documents.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.documents.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// 排序後的檔名列表，供選單使用
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
