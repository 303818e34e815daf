use async_trait::async_trait;
use mongodb::bson::Document;

use super::RepositoryError;

/// Logical operations against a single named collection.
///
/// Filters reaching a store are already normalized. Every returned document
/// is an owned copy.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn collection_name(&self) -> &str;

    async fn insert_one(&self, document: Document) -> Result<(), RepositoryError>;

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, RepositoryError>;

    async fn find(&self, filter: Document) -> Result<Vec<Document>, RepositoryError>;

    /// Set the fields of `patch` on the first match and return it as updated.
    async fn find_one_and_update(
        &self,
        filter: Document,
        patch: Document,
    ) -> Result<Option<Document>, RepositoryError>;

    async fn find_one_and_delete(
        &self,
        filter: Document,
    ) -> Result<Option<Document>, RepositoryError>;
}
