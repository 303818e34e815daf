pub mod auth;
pub mod error;
pub mod jwt;
pub mod users;
pub mod validator;

pub use auth::AuthService;
pub use error::ServiceError;
pub use jwt::{IssuedToken, JwtService, TokenClaims};
pub use users::UsersService;
pub use validator::CredentialValidator;
