//! Conversions between service errors and `tonic::Status`.
//!
//! | Error | gRPC Status |
//! |-------|-------------|
//! | `AppError::BadRequest` | `INVALID_ARGUMENT` |
//! | `AppError::NotFound` | `NOT_FOUND` |
//! | `AppError::Unauthorized` | `UNAUTHENTICATED` |
//! | `AppError::Conflict` | `ALREADY_EXISTS` |
//! | `AppError::ServiceUnavailable` | `UNAVAILABLE` |
//! | internal, database, configuration | `INTERNAL` |
//! | `AuthError` credential problems | `UNAUTHENTICATED` |

use tonic::{Code, Status};

use crate::auth::AuthError;
use crate::error::AppError;

pub trait IntoStatus {
    fn into_status(self) -> Status;
}

impl IntoStatus for AppError {
    fn into_status(self) -> Status {
        match self {
            AppError::BadRequest(err) => Status::invalid_argument(err.to_string()),
            AppError::NotFound(err) => Status::not_found(err.to_string()),
            AppError::Unauthorized(err) => Status::unauthenticated(err.to_string()),
            AppError::Conflict(err) => Status::already_exists(err.to_string()),
            AppError::InternalError(err) => {
                // Log the full error but don't expose it to clients
                tracing::error!(error = %err, "Internal error");
                Status::internal("Internal server error")
            }
            AppError::ServiceUnavailable => Status::unavailable("Service unavailable"),
            AppError::DatabaseError(err) => {
                tracing::error!(error = %err, "Database error");
                Status::internal("Database error")
            }
            AppError::ConfigError(err) => {
                tracing::error!(error = %err, "Configuration error");
                Status::internal("Configuration error")
            }
        }
    }
}

impl From<AppError> for Status {
    fn from(err: AppError) -> Self {
        err.into_status()
    }
}

impl From<Status> for AppError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
                AppError::BadRequest(anyhow::anyhow!("{}", status.message()))
            }
            Code::NotFound => AppError::NotFound(anyhow::anyhow!("{}", status.message())),
            Code::Unauthenticated | Code::PermissionDenied => {
                AppError::Unauthorized(anyhow::anyhow!("{}", status.message()))
            }
            Code::AlreadyExists => AppError::Conflict(anyhow::anyhow!("{}", status.message())),
            Code::Unavailable => AppError::ServiceUnavailable,
            _ => AppError::InternalError(anyhow::anyhow!(
                "Request failed ({:?}): {}",
                status.code(),
                status.message()
            )),
        }
    }
}

impl IntoStatus for AuthError {
    fn into_status(self) -> Status {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken(_)
            | AuthError::PrincipalNotFound
            | AuthError::Rejected(_) => Status::unauthenticated(self.to_string()),
            AuthError::Unavailable(status) => status,
            AuthError::Persistence(err) => {
                tracing::error!(error = %err, "Persistence error during authentication");
                Status::internal("Internal server error")
            }
            AuthError::Configuration(msg) => {
                tracing::error!(error = %msg, "Configuration error during authentication");
                Status::internal("Internal server error")
            }
        }
    }
}

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        err.into_status()
    }
}

/// Status returned by the auth service, as seen by a caller.
///
/// A definite answer about the credential is a rejection; anything else means
/// the validator could not decide.
impl From<Status> for AuthError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::Unauthenticated
            | Code::PermissionDenied
            | Code::NotFound
            | Code::InvalidArgument => AuthError::Rejected(status.message().to_string()),
            _ => AuthError::Unavailable(status),
        }
    }
}

pub type GrpcResult<T> = Result<tonic::Response<T>, Status>;
