//! `Authenticate` RPC: token in, user projection out.

use service_core::auth::{extract_token, token_from_headers};
use service_core::grpc::IntoStatus;
use tonic::{Request, Response, Status};

use crate::grpc::proto::auth::{auth_service_server::AuthService, AuthenticateRequest, User};
use crate::services::CredentialValidator;

pub struct AuthServiceImpl {
    validator: CredentialValidator,
}

impl AuthServiceImpl {
    pub fn new(validator: CredentialValidator) -> Self {
        Self { validator }
    }
}

#[tonic::async_trait]
impl AuthService for AuthServiceImpl {
    /// The token is taken from a `cookie` metadata entry when present, else
    /// from the `Authentication` field.
    async fn authenticate(
        &self,
        request: Request<AuthenticateRequest>,
    ) -> Result<Response<User>, Status> {
        let cookie = token_from_headers(&request.metadata().clone().into_headers());
        let req = request.into_inner();

        let token = extract_token(cookie.as_deref(), Some(req.authentication.as_str()))
            .map_err(|e| e.into_status())?;

        let user = self.validator.validate(token).await.map_err(|e| {
            if !e.is_unavailable() {
                tracing::debug!(error = %e, "Authentication refused");
            }
            e.into_status()
        })?;

        Ok(Response::new(User::from(&user)))
    }
}
