use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use service_core::auth::Principal;
use service_core::database::DocumentModel;

use crate::grpc::proto::auth as proto;

/// Stored user. `password` holds the Argon2 hash, never the plain text.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl DocumentModel for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> ObjectId {
        self.id
    }
}

impl User {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id_string(),
            email: self.email.clone(),
        }
    }
}

impl From<&User> for proto::User {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
}

/// Insert shape; the repository assigns `_id`.
#[derive(Serialize)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
}
