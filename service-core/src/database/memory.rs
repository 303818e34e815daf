use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use mongodb::bson::Document;

use super::{DocumentStore, ID_FIELD, RepositoryError};

/// Process-local collection used by tests and single-node tooling.
///
/// Filters match on top-level field equality; patches overwrite top-level
/// fields. `set_unavailable(true)` makes every operation fail the way an
/// unreachable database would.
pub struct InMemoryStore {
    name: String,
    documents: Mutex<Vec<Document>>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Mutex::new(Vec::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn documents(&self) -> Result<std::sync::MutexGuard<'_, Vec<Document>>, RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Persistence(anyhow::anyhow!(
                "Collection '{}' is unavailable",
                self.name
            )));
        }

        self.documents.lock().map_err(|e| {
            RepositoryError::Persistence(anyhow::anyhow!("In-memory store mutex poisoned: {}", e))
        })
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn collection_name(&self) -> &str {
        &self.name
    }

    async fn insert_one(&self, document: Document) -> Result<(), RepositoryError> {
        let mut documents = self.documents()?;

        let id = document.get(ID_FIELD);
        if id.is_some() && documents.iter().any(|existing| existing.get(ID_FIELD) == id) {
            return Err(RepositoryError::Persistence(anyhow::anyhow!(
                "Duplicate _id in collection '{}'",
                self.name
            )));
        }

        documents.push(document);
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, RepositoryError> {
        let documents = self.documents()?;
        Ok(documents.iter().find(|doc| matches(doc, &filter)).cloned())
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>, RepositoryError> {
        let documents = self.documents()?;
        Ok(documents
            .iter()
            .filter(|doc| matches(doc, &filter))
            .cloned()
            .collect())
    }

    async fn find_one_and_update(
        &self,
        filter: Document,
        patch: Document,
    ) -> Result<Option<Document>, RepositoryError> {
        let mut documents = self.documents()?;

        Ok(documents
            .iter_mut()
            .find(|doc| matches(doc, &filter))
            .map(|doc| {
                for (field, value) in patch {
                    doc.insert(field, value);
                }
                doc.clone()
            }))
    }

    async fn find_one_and_delete(
        &self,
        filter: Document,
    ) -> Result<Option<Document>, RepositoryError> {
        let mut documents = self.documents()?;

        Ok(documents
            .iter()
            .position(|doc| matches(doc, &filter))
            .map(|index| documents.remove(index)))
    }
}
