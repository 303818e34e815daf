use thiserror::Error;

use crate::database::RepositoryError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No authentication token provided")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Principal not found")]
    PrincipalNotFound,

    /// The validator answered and refused the credential.
    #[error("Authentication rejected: {0}")]
    Rejected(String),

    /// The validator could not be reached or failed internally.
    #[error("Authentication service unavailable: {0}")]
    Unavailable(tonic::Status),

    #[error("Persistence error: {0}")]
    Persistence(anyhow::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    /// True when the failure says nothing about the credential itself.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            AuthError::Unavailable(_) | AuthError::Persistence(_) | AuthError::Configuration(_)
        )
    }
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // A well-signed claim that names no stored principal is still just an unknown user.
            RepositoryError::NotFound | RepositoryError::InvalidIdentifier(_) => {
                AuthError::PrincipalNotFound
            }
            RepositoryError::Persistence(e) => AuthError::Persistence(e),
        }
    }
}
