use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The filter matched no document. Expected and recoverable.
    #[error("Document not found")]
    NotFound,

    /// A string identifier in a filter is not a well-formed `ObjectId`.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The store rejected the operation or could not be reached.
    #[error("Persistence error: {0}")]
    Persistence(anyhow::Error),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound)
    }
}

impl From<mongodb::error::Error> for RepositoryError {
    fn from(err: mongodb::error::Error) -> Self {
        RepositoryError::Persistence(anyhow::Error::new(err))
    }
}

impl From<mongodb::bson::ser::Error> for RepositoryError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        RepositoryError::Persistence(anyhow::anyhow!("Failed to encode document: {}", err))
    }
}

impl From<mongodb::bson::de::Error> for RepositoryError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        RepositoryError::Persistence(anyhow::anyhow!("Failed to decode document: {}", err))
    }
}
