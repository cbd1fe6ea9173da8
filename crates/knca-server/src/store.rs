//! In-memory document storage.

use chrono::Utc;
use knca_core::Document;

use crate::error::SignRejection;

const SAMPLES: [&str; 3] = [
    "<document><title>Sample Document 1</title><content>This is the first sample document for signing.</content></document>",
    "<document><title>Sample Document 2</title><content>This is the second sample document for signing.</content></document>",
    "<document><title>Sample Document 3</title><content>This is the third sample document for signing.</content></document>",
];

/// Documents in creation order, with ids `doc-1`, `doc-2`, ...
#[derive(Debug)]
pub struct DocumentStore {
    next_id: u64,
    documents: Vec<Document>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 1,
            documents: Vec::new(),
        }
    }

    /// A store holding the three sample XML documents.
    #[must_use]
    pub fn with_samples() -> Self {
        let mut store = Self::new();
        for sample in SAMPLES {
            store.create(sample);
        }
        store
    }

    #[must_use]
    pub fn list(&self) -> Vec<Document> {
        self.documents.clone()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn create(&mut self, content: &str) -> Document {
        let id = format!("doc-{}", self.next_id);
        self.next_id += 1;
        let mut document = Document::new(id, content);
        document.created_at = Some(Utc::now());
        self.documents.push(document.clone());
        document
    }

    /// Attach a signature to an unsigned document.
    ///
    /// # Errors
    ///
    /// Returns [`SignRejection`] if the id is unknown or the document already
    /// carries a signature.
    pub fn sign(&mut self, id: &str, signature: &str) -> Result<(), SignRejection> {
        let document = self
            .documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| SignRejection::NotFound(id.to_string()))?;
        if document.signed {
            return Err(SignRejection::AlreadySigned(id.to_string()));
        }
        document.signature = Some(signature.to_string());
        document.signed = true;
        Ok(())
    }
}
