use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client as MongoClient, Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
};

use super::{DocumentModel, DocumentStore, Repository, RepositoryError};
use crate::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    /// Create a unique ascending index on `field` unless it already exists.
    pub async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), AppError> {
        let mut keys = Document::new();
        keys.insert(field, 1);

        let index = IndexModel::builder()
            .keys(keys)
            .options(
                IndexOptions::builder()
                    .name(format!("{}_unique", field))
                    .unique(true)
                    .build(),
            )
            .build();

        self.db
            .collection::<Document>(collection)
            .create_index(index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create unique {} index on {} collection: {}",
                    field,
                    collection,
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on {}.{}", collection, field);

        Ok(())
    }

    pub fn store(&self, collection: &str) -> Arc<dyn DocumentStore> {
        Arc::new(MongoStore::new(self.db.collection(collection)))
    }

    pub fn repository<T: DocumentModel>(&self) -> Repository<T> {
        Repository::new(self.store(T::COLLECTION))
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

/// [`DocumentStore`] over a MongoDB collection.
pub struct MongoStore {
    collection: Collection<Document>,
}

impl MongoStore {
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn collection_name(&self) -> &str {
        self.collection.name()
    }

    async fn insert_one(&self, document: Document) -> Result<(), RepositoryError> {
        self.collection.insert_one(document, None).await?;
        Ok(())
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, RepositoryError> {
        Ok(self.collection.find_one(filter, None).await?)
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>, RepositoryError> {
        let cursor = self.collection.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one_and_update(
        &self,
        filter: Document,
        patch: Document,
    ) -> Result<Option<Document>, RepositoryError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .collection
            .find_one_and_update(filter, doc! { "$set": patch }, options)
            .await?)
    }

    async fn find_one_and_delete(
        &self,
        filter: Document,
    ) -> Result<Option<Document>, RepositoryError> {
        Ok(self.collection.find_one_and_delete(filter, None).await?)
    }
}
