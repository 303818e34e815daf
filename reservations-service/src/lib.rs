pub mod models;
pub mod services;

use std::sync::Arc;

use service_core::auth::{Authenticator, JwtAuthGuard};
use service_core::config::{keys, SettingsProvider};
use service_core::database::MongoDb;
use service_core::error::AppError;
use service_core::grpc::{AuthClient, AuthClientConfig};

use crate::models::Reservation;
use crate::services::ReservationsService;

/// What reservation handlers need: persistence plus the request guard.
///
/// Handlers are mounted behind
/// `axum::middleware::from_fn_with_state(state.guard.clone(), require_auth)`
/// and read the caller through `CurrentUser`.
#[derive(Clone)]
pub struct ReservationsState {
    pub reservations: ReservationsService,
    pub guard: JwtAuthGuard,
}

impl ReservationsState {
    pub fn new(reservations: ReservationsService, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            reservations,
            guard: JwtAuthGuard::new(authenticator),
        }
    }

    /// Wire against MongoDB and the auth service at `AUTH_SERVICE_ENDPOINT`.
    ///
    /// The auth service is dialled on first use. Must run inside a tokio runtime.
    pub fn connect(db: &MongoDb, settings: &dyn SettingsProvider) -> Result<Self, AppError> {
        let endpoint = settings.require(keys::AUTH_SERVICE_ENDPOINT)?;
        let client = AuthClient::lazy(AuthClientConfig::with_endpoint(endpoint.as_str()))
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "Invalid {} '{}': {}",
                    keys::AUTH_SERVICE_ENDPOINT,
                    endpoint,
                    e
                ))
            })?;

        tracing::info!(endpoint = %endpoint, "Reservations guarded by remote auth service");

        Ok(Self::new(
            ReservationsService::new(db.repository::<Reservation>()),
            Arc::new(client),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_core::config::MapSettings;

    #[tokio::test]
    async fn test_connect_requires_auth_endpoint() {
        // The driver does not dial until the first operation.
        let db = MongoDb::connect("mongodb://127.0.0.1:27017", "reservations")
            .await
            .unwrap();

        let missing = ReservationsState::connect(&db, &MapSettings::new());
        assert!(matches!(missing, Err(AppError::ConfigError(_))));

        let settings =
            MapSettings::new().with(keys::AUTH_SERVICE_ENDPOINT, "http://auth-service:50051");
        let state = ReservationsState::connect(&db, &settings).unwrap();
        assert_eq!(state.reservations.collection(), "reservations");
    }
}
