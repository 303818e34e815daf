use async_trait::async_trait;

use super::{AuthError, Principal};

/// Resolves a raw credential to the principal it belongs to.
///
/// Implementations either succeed with a principal or fail; there is no
/// partial result.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError>;
}
