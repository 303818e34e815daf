//! Test helpers: an in-process auth-service over an in-memory user store.

#![allow(dead_code)]

use std::sync::Arc;

use auth_service::{
    grpc::{proto::auth::auth_service_server::AuthServiceServer, AuthServiceImpl},
    models::{CreateUser, User},
    AppState,
};
use axum_extra::extract::cookie::CookieJar;
use service_core::auth::AUTHENTICATION_COOKIE;
use service_core::config::{keys, MapSettings};
use service_core::database::{DocumentModel, InMemoryStore, Repository};
use service_core::grpc::{AuthClient, AuthClientConfig};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "Str0ngPassword!";

/// Running gRPC server plus handles on its state.
pub struct TestApp {
    pub grpc_port: u16,
    pub state: AppState,
    pub settings: Arc<MapSettings>,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let settings = Arc::new(
            MapSettings::new()
                .with(keys::JWT_SECRET, TEST_SECRET)
                .with(keys::JWT_EXPIRATION, "3600"),
        );
        let store = Arc::new(InMemoryStore::new(User::COLLECTION));
        let state = AppState::new(Repository::new(store.clone()), settings.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let grpc_port = listener.local_addr().unwrap().port();

        let server = tonic::transport::Server::builder()
            .add_service(AuthServiceServer::new(AuthServiceImpl::new(
                state.validator.clone(),
            )))
            .serve_with_incoming(TcpListenerStream::new(listener));

        tokio::spawn(async move {
            let _ = server.await;
        });

        TestApp {
            grpc_port,
            state,
            settings,
            store,
        }
    }

    pub fn grpc_addr(&self) -> String {
        format!("http://127.0.0.1:{}", self.grpc_port)
    }

    pub async fn auth_client(&self) -> AuthClient {
        AuthClient::connect(&self.grpc_addr())
            .await
            .expect("Failed to connect to auth service")
    }

    /// Lazily connecting client, as consuming services build it.
    pub fn lazy_auth_client(&self) -> AuthClient {
        AuthClient::lazy(AuthClientConfig::with_endpoint(self.grpc_addr()))
            .expect("Invalid auth service endpoint")
    }

    pub async fn register(&self, email: &str) -> User {
        self.state
            .users
            .create(CreateUser {
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await
            .expect("Failed to create user")
    }

    /// Log `user` in and return the cookie value the browser would store.
    pub fn login(&self, user: &User) -> String {
        let jar = self
            .state
            .auth
            .login(user, CookieJar::new())
            .expect("Failed to log in");
        jar.get(AUTHENTICATION_COOKIE)
            .expect("Login did not set the authentication cookie")
            .value()
            .to_string()
    }
}
