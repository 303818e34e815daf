use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime, Document};
use serde::{Deserialize, Serialize};
use service_core::database::DocumentModel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// When the reservation was made.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub end_date: DateTime<Utc>,
    /// Principal that made the reservation.
    pub user_id: String,
    pub place_id: String,
    pub invoice_id: String,
}

impl DocumentModel for Reservation {
    const COLLECTION: &'static str = "reservations";

    fn id(&self) -> ObjectId {
        self.id
    }
}

/// Outward form of a reservation: string id and RFC 3339 dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub user_id: String,
    pub place_id: String,
    pub invoice_id: String,
}

impl From<Reservation> for ReservationView {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id_string(),
            timestamp: reservation.timestamp,
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            user_id: reservation.user_id,
            place_id: reservation.place_id,
            invoice_id: reservation.invoice_id,
        }
    }
}

/// Caller input for a new reservation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservation {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub place_id: String,
    pub invoice_id: String,
}

/// Insert shape: the input stamped with time and owner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub end_date: DateTime<Utc>,
    pub user_id: String,
    pub place_id: String,
    pub invoice_id: String,
}

impl NewReservation {
    pub fn stamped(input: CreateReservation, user_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            start_date: input.start_date,
            end_date: input.end_date,
            user_id: user_id.to_string(),
            place_id: input.place_id,
            invoice_id: input.invoice_id,
        }
    }
}

/// Partial update; only the fields that are set are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservation {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub place_id: Option<String>,
    pub invoice_id: Option<String>,
}

impl UpdateReservation {
    /// Field-level patch in stored field names.
    pub fn into_patch(self) -> Document {
        let mut patch = Document::new();
        if let Some(start_date) = self.start_date {
            patch.insert("startDate", bson::DateTime::from_chrono(start_date));
        }
        if let Some(end_date) = self.end_date {
            patch.insert("endDate", bson::DateTime::from_chrono(end_date));
        }
        if let Some(place_id) = self.place_id {
            patch.insert("placeId", place_id);
        }
        if let Some(invoice_id) = self.invoice_id {
            patch.insert("invoiceId", invoice_id);
        }
        patch
    }
}
