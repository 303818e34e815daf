use serde::{Deserialize, Serialize};

/// Read-only view of an authenticated user, attached to guarded requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
}

impl From<crate::grpc::proto::auth::User> for Principal {
    fn from(user: crate::grpc::proto::auth::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

impl From<Principal> for crate::grpc::proto::auth::User {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            email: principal.email,
        }
    }
}
