use chrono::Utc;
use mongodb::bson::{doc, Document};
use service_core::auth::Principal;
use service_core::database::{Repository, RepositoryError, ID_FIELD};

use crate::models::{CreateReservation, NewReservation, Reservation, UpdateReservation};

/// Reservation CRUD. Repository errors are returned to the caller unchanged.
#[derive(Clone)]
pub struct ReservationsService {
    reservations: Repository<Reservation>,
}

fn by_id(id: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(ID_FIELD, id);
    filter
}

impl ReservationsService {
    pub fn new(reservations: Repository<Reservation>) -> Self {
        Self { reservations }
    }

    pub fn collection(&self) -> &str {
        self.reservations.collection()
    }

    /// Store `input` as made now by `principal`.
    pub async fn create(
        &self,
        input: CreateReservation,
        principal: &Principal,
    ) -> Result<Reservation, RepositoryError> {
        let reservation = self
            .reservations
            .create(&NewReservation::stamped(input, &principal.id, Utc::now()))
            .await?;

        tracing::info!(
            reservation_id = %reservation.id,
            user_id = %principal.id,
            "Reservation created"
        );
        Ok(reservation)
    }

    pub async fn find_all(&self) -> Result<Vec<Reservation>, RepositoryError> {
        self.reservations.find(doc! {}).await
    }

    pub async fn find_one(&self, id: &str) -> Result<Reservation, RepositoryError> {
        self.reservations.find_one(by_id(id)).await
    }

    pub async fn update(
        &self,
        id: &str,
        patch: UpdateReservation,
    ) -> Result<Reservation, RepositoryError> {
        self.reservations
            .find_one_and_update(by_id(id), patch.into_patch())
            .await
    }

    pub async fn remove(&self, id: &str) -> Result<Reservation, RepositoryError> {
        self.reservations.find_one_and_delete(by_id(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mongodb::bson::oid::ObjectId;
    use service_core::database::{DocumentModel, InMemoryStore};
    use std::sync::Arc;

    fn service() -> (Arc<InMemoryStore>, ReservationsService) {
        let store = Arc::new(InMemoryStore::new(Reservation::COLLECTION));
        let service = ReservationsService::new(Repository::new(store.clone()));
        (store, service)
    }

    fn principal() -> Principal {
        Principal {
            id: "123".to_string(),
            email: "guest@example.com".to_string(),
        }
    }

    fn input() -> CreateReservation {
        CreateReservation {
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            place_id: "place-123".to_string(),
            invoice_id: "invoice-456".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_stamps_timestamp_and_owner() {
        let (_, reservations) = service();
        let before = Utc::now() - chrono::Duration::seconds(1);

        let created = reservations.create(input(), &principal()).await.unwrap();

        assert_eq!(created.user_id, "123");
        assert_eq!(created.place_id, "place-123");
        assert_eq!(created.start_date, input().start_date);
        assert!(created.timestamp >= before);
    }

    #[tokio::test]
    async fn test_find_all_and_find_one() {
        let (_, reservations) = service();
        assert!(reservations.find_all().await.unwrap().is_empty());

        let created = reservations.create(input(), &principal()).await.unwrap();
        reservations.create(input(), &principal()).await.unwrap();

        assert_eq!(reservations.find_all().await.unwrap().len(), 2);
        let found = reservations.find_one(&created.id_string()).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let (_, reservations) = service();
        let created = reservations.create(input(), &principal()).await.unwrap();

        let updated = reservations
            .update(
                &created.id_string(),
                UpdateReservation {
                    invoice_id: Some("invoice-789".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.invoice_id, "invoice-789");
        assert_eq!(updated.place_id, created.place_id);
        assert_eq!(updated.user_id, created.user_id);
    }

    #[tokio::test]
    async fn test_remove_then_lookup_is_not_found() {
        let (_, reservations) = service();
        let created = reservations.create(input(), &principal()).await.unwrap();
        let id = created.id_string();

        assert_eq!(reservations.remove(&id).await.unwrap(), created);
        assert!(matches!(
            reservations.find_one(&id).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            reservations.remove(&id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let (_, reservations) = service();

        assert!(matches!(
            reservations.find_one(&ObjectId::new().to_hex()).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            reservations.update("reservation-1", UpdateReservation::default()).await,
            Err(RepositoryError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let (store, reservations) = service();
        store.set_unavailable(true);

        assert!(matches!(
            reservations.create(input(), &principal()).await,
            Err(RepositoryError::Persistence(_))
        ));
        assert!(matches!(
            reservations.find_all().await,
            Err(RepositoryError::Persistence(_))
        ));
    }
}
