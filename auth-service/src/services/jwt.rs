use std::sync::Arc;

use axum_extra::extract::cookie::Cookie;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use service_core::auth::{AuthError, AUTHENTICATION_COOKIE};
use service_core::config::{keys, SettingsProvider};
use time::OffsetDateTime;

use super::ServiceError;

/// Token payload: the user id and nothing else besides expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires: DateTime<Utc>,
}

/// HS256 token issuing and verification.
///
/// `JWT_SECRET`, `JWT_EXPIRATION` and `IS_PRODUCTION` are looked up on every
/// call, never cached.
#[derive(Clone)]
pub struct JwtService {
    settings: Arc<dyn SettingsProvider>,
}

impl JwtService {
    pub fn new(settings: Arc<dyn SettingsProvider>) -> Self {
        Self { settings }
    }

    pub fn issue(&self, user_id: &str) -> Result<IssuedToken, ServiceError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<IssuedToken, ServiceError> {
        let secret = self
            .settings
            .require(keys::JWT_SECRET)
            .map_err(ServiceError::configuration)?;
        let ttl = self
            .settings
            .require_positive(keys::JWT_EXPIRATION)
            .map_err(ServiceError::configuration)?;

        let ttl = i64::try_from(ttl).map_err(|_| {
            ServiceError::Configuration(format!("{} is out of range", keys::JWT_EXPIRATION))
        })?;
        let expires = now + Duration::seconds(ttl);

        let claims = TokenClaims {
            user_id: user_id.to_string(),
            exp: expires.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;

        tracing::debug!(user_id = %user_id, expires = %expires, "Issued authentication token");

        Ok(IssuedToken { token, expires })
    }

    /// Check signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let secret = self
            .settings
            .require(keys::JWT_SECRET)
            .map_err(|e| AuthError::Configuration(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;

        Ok(data.claims)
    }

    /// `Authentication` cookie for `issued`; expires with the token.
    pub fn authentication_cookie(
        &self,
        issued: &IssuedToken,
    ) -> Result<Cookie<'static>, ServiceError> {
        let secure = self
            .settings
            .flag(keys::IS_PRODUCTION)
            .map_err(ServiceError::configuration)?;

        let nanos = issued.expires.timestamp_nanos_opt().ok_or_else(|| {
            ServiceError::Internal(anyhow::anyhow!("Token expiry out of range"))
        })?;
        let expires = OffsetDateTime::from_unix_timestamp_nanos(i128::from(nanos))
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Invalid cookie expiry: {}", e)))?;

        Ok(Cookie::build((AUTHENTICATION_COOKIE, issued.token.clone()))
            .path("/")
            .http_only(true)
            .secure(secure)
            .expires(expires)
            .build())
    }
}
