use std::marker::PhantomData;
use std::sync::Arc;

use mongodb::bson::{self, Document, oid::ObjectId};
use serde::{Serialize, de::DeserializeOwned};

use super::{DocumentStore, ID_FIELD, RepositoryError, normalize_filter};

/// A persisted entity with an `_id` field.
///
/// Implementors serialize their identifier as `_id` (`#[serde(rename = "_id")]`).
pub trait DocumentModel: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the model is stored in.
    const COLLECTION: &'static str;

    fn id(&self) -> ObjectId;

    /// Identifier in its string form, as exposed outside the store.
    fn id_string(&self) -> String {
        self.id().to_hex()
    }
}

/// CRUD over one collection for model type `T`.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _model: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _model: PhantomData,
        }
    }
}

impl<T: DocumentModel> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _model: PhantomData,
        }
    }

    pub fn collection(&self) -> &str {
        self.store.collection_name()
    }

    /// Persist `draft` under a freshly generated identifier.
    ///
    /// Any `_id` the draft carries is discarded.
    pub async fn create<D>(&self, draft: &D) -> Result<T, RepositoryError>
    where
        D: Serialize + Sync + ?Sized,
    {
        let mut fields = bson::to_document(draft)?;
        fields.remove(ID_FIELD);

        let mut document = Document::new();
        document.insert(ID_FIELD, ObjectId::new());
        for (key, value) in fields {
            document.insert(key, value);
        }

        self.store.insert_one(document.clone()).await?;

        tracing::debug!(
            collection = %self.collection(),
            id = ?document.get(ID_FIELD),
            "Document created"
        );

        Ok(bson::from_document(document)?)
    }

    /// Exactly one match, or `NotFound`.
    pub async fn find_one(&self, filter: Document) -> Result<T, RepositoryError> {
        let normalized = normalize_filter(&filter)?.into_owned();

        match self.store.find_one(normalized).await? {
            Some(document) => Ok(bson::from_document(document)?),
            None => Err(self.not_found(&filter)),
        }
    }

    /// All matches; an empty result is not an error.
    pub async fn find(&self, filter: Document) -> Result<Vec<T>, RepositoryError> {
        let normalized = normalize_filter(&filter)?.into_owned();

        self.store
            .find(normalized)
            .await?
            .into_iter()
            .map(|document| bson::from_document(document).map_err(RepositoryError::from))
            .collect()
    }

    /// Set the fields in `patch` on the first match and return the updated document.
    ///
    /// The identifier cannot be patched; an `_id` entry in `patch` is ignored.
    pub async fn find_one_and_update(
        &self,
        filter: Document,
        mut patch: Document,
    ) -> Result<T, RepositoryError> {
        let normalized = normalize_filter(&filter)?.into_owned();

        if patch.remove(ID_FIELD).is_some() {
            tracing::debug!(collection = %self.collection(), "Ignoring _id in update patch");
        }

        if patch.is_empty() {
            return self.find_one(filter).await;
        }

        match self.store.find_one_and_update(normalized, patch).await? {
            Some(document) => Ok(bson::from_document(document)?),
            None => Err(self.not_found(&filter)),
        }
    }

    /// Remove the first match and return it.
    pub async fn find_one_and_delete(&self, filter: Document) -> Result<T, RepositoryError> {
        let normalized = normalize_filter(&filter)?.into_owned();

        match self.store.find_one_and_delete(normalized).await? {
            Some(document) => Ok(bson::from_document(document)?),
            None => Err(self.not_found(&filter)),
        }
    }

    fn not_found(&self, filter: &Document) -> RepositoryError {
        tracing::warn!(
            collection = %self.collection(),
            filter = %filter,
            "Document not found"
        );
        metrics::counter!(
            "repository_not_found_total",
            "collection" => self.collection().to_string()
        )
        .increment(1);
        RepositoryError::NotFound
    }
}
