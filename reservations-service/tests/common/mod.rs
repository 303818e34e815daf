#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use reservations_service::{
    models::{CreateReservation, Reservation, ReservationView, UpdateReservation},
    services::ReservationsService,
    ReservationsState,
};
use service_core::auth::{require_auth, AuthError, Authenticator, CurrentUser, Principal};
use service_core::database::{DocumentModel, InMemoryStore, Repository};
use service_core::error::AppError;

pub const VALID_TOKEN: &str = "jwt-token";

/// Accepts exactly [`VALID_TOKEN`] and counts every call.
pub struct MockAuthenticator {
    calls: AtomicUsize,
}

impl MockAuthenticator {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if token == VALID_TOKEN {
            Ok(Principal {
                id: "123".to_string(),
                email: "guest@example.com".to_string(),
            })
        } else {
            Err(AuthError::Rejected("invalid token".to_string()))
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub authenticator: Arc<MockAuthenticator>,
}

pub fn spawn() -> TestApp {
    let store = Arc::new(InMemoryStore::new(Reservation::COLLECTION));
    let authenticator = Arc::new(MockAuthenticator::new());
    let state = ReservationsState::new(
        ReservationsService::new(Repository::new(store.clone())),
        authenticator.clone(),
    );

    TestApp {
        router: router(state),
        store,
        authenticator,
    }
}

fn router(state: ReservationsState) -> Router {
    Router::new()
        .route("/reservations", get(find_all).post(create))
        .route(
            "/reservations/:id",
            get(find_one).patch(update).delete(remove),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.guard.clone(),
            require_auth,
        ))
        .with_state(state)
}

async fn create(
    State(state): State<ReservationsState>,
    CurrentUser(principal): CurrentUser,
    Json(input): Json<CreateReservation>,
) -> Result<Json<ReservationView>, AppError> {
    Ok(Json(state.reservations.create(input, &principal).await?.into()))
}

async fn find_all(
    State(state): State<ReservationsState>,
) -> Result<Json<Vec<ReservationView>>, AppError> {
    let reservations = state.reservations.find_all().await?;
    Ok(Json(reservations.into_iter().map(ReservationView::from).collect()))
}

async fn find_one(
    State(state): State<ReservationsState>,
    Path(id): Path<String>,
) -> Result<Json<ReservationView>, AppError> {
    Ok(Json(state.reservations.find_one(&id).await?.into()))
}

async fn update(
    State(state): State<ReservationsState>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateReservation>,
) -> Result<Json<ReservationView>, AppError> {
    Ok(Json(state.reservations.update(&id, patch).await?.into()))
}

async fn remove(
    State(state): State<ReservationsState>,
    Path(id): Path<String>,
) -> Result<Json<ReservationView>, AppError> {
    Ok(Json(state.reservations.remove(&id).await?.into()))
}
