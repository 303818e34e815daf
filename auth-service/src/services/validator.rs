use async_trait::async_trait;
use mongodb::bson::doc;
use service_core::auth::{AuthError, Authenticator, Principal};
use service_core::database::{Repository, ID_FIELD};

use super::JwtService;
use crate::models::User;

/// Resolves a token to the stored user it was issued for.
#[derive(Clone)]
pub struct CredentialValidator {
    jwt: JwtService,
    users: Repository<User>,
}

impl CredentialValidator {
    pub fn new(jwt: JwtService, users: Repository<User>) -> Self {
        Self { jwt, users }
    }

    /// Verify `token`, then look up the user named by its claim.
    ///
    /// A bad signature or expiry fails before the store is touched. A valid
    /// token whose user no longer exists is `PrincipalNotFound`.
    /// A claim that is not an ObjectId hex string also resolves as
    /// `PrincipalNotFound`, since no stored user can carry it.
    pub async fn validate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.jwt.verify(token)?;

        let mut filter = doc! {};
        filter.insert(ID_FIELD, claims.user_id.as_str());

        let user = self.users.find_one(filter).await.map_err(|e| {
            tracing::warn!(user_id = %claims.user_id, error = %e, "Token names no usable user");
            AuthError::from(e)
        })?;

        Ok(user)
    }
}

/// In-process validation, for guarding routes served by the auth service itself.
#[async_trait]
impl Authenticator for CredentialValidator {
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        Ok(self.validate(token).await?.principal())
    }
}
