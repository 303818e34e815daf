//! Client for the auth service's `Authenticate` RPC.

use std::time::Duration;

use async_trait::async_trait;
use tonic::Request;
use tonic::transport::{Channel, Endpoint};

use super::interceptors::inject_trace_context;
use super::proto::auth::auth_service_client::AuthServiceClient;
use super::proto::auth::{AuthenticateRequest, User};
use super::retry::{RetryConfig, retry_grpc_call};
use crate::auth::{AuthError, Authenticator, Principal};

#[derive(Clone, Debug)]
pub struct AuthClientConfig {
    /// e.g. "http://auth-service:50051"
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Transient failures only. The default makes a single attempt.
    pub retry: RetryConfig,
}

impl Default for AuthClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:50051".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::no_retry(),
        }
    }
}

impl AuthClientConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    fn endpoint(&self) -> Result<Endpoint, tonic::transport::Error> {
        Ok(Endpoint::from_shared(self.endpoint.clone())?
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout))
    }
}

/// Validates credentials by calling the auth service.
#[derive(Clone)]
pub struct AuthClient {
    client: AuthServiceClient<Channel>,
    retry: RetryConfig,
}

impl AuthClient {
    /// Connect eagerly; fails if the auth service is not reachable now.
    pub async fn new(config: AuthClientConfig) -> Result<Self, tonic::transport::Error> {
        let channel = config.endpoint()?.connect().await?;

        Ok(Self {
            client: AuthServiceClient::new(channel),
            retry: config.retry,
        })
    }

    /// Connect on first use, so a service can start before the auth service.
    pub fn lazy(config: AuthClientConfig) -> Result<Self, tonic::transport::Error> {
        let channel = config.endpoint()?.connect_lazy();

        Ok(Self {
            client: AuthServiceClient::new(channel),
            retry: config.retry,
        })
    }

    pub async fn connect(endpoint: &str) -> Result<Self, tonic::transport::Error> {
        Self::new(AuthClientConfig::with_endpoint(endpoint)).await
    }

    /// Raw RPC: the user the token belongs to, or the service's status.
    pub async fn authenticate_token(&self, token: &str) -> Result<User, tonic::Status> {
        retry_grpc_call(&self.retry, "authenticate", || {
            let mut client = self.client.clone();
            let mut request = Request::new(AuthenticateRequest {
                authentication: token.to_string(),
            });
            inject_trace_context(&mut request);
            async move { client.authenticate(request).await }
        })
        .await
        .map(tonic::Response::into_inner)
    }
}

#[async_trait]
impl Authenticator for AuthClient {
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let user = self.authenticate_token(token).await?;
        Ok(Principal::from(user))
    }
}
