//! Delegated authentication for consuming services.
//!
//! A service never verifies credentials itself. [`JwtAuthGuard`] pulls the
//! `Authentication` cookie off the inbound request and hands it to an
//! [`Authenticator`] (normally the auth service over gRPC, see
//! [`crate::grpc::AuthClient`]). A resolved [`Principal`] is attached to the
//! request before the guard reports success.

mod authenticator;
mod error;
mod guard;
mod middleware;
mod principal;
mod token;

pub use authenticator::Authenticator;
pub use error::AuthError;
pub use guard::JwtAuthGuard;
pub use middleware::{CurrentUser, require_auth};
pub use principal::Principal;
pub use token::{AUTHENTICATION_COOKIE, extract_token, token_from_headers};
