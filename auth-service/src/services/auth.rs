use axum_extra::extract::cookie::{Cookie, CookieJar};
use service_core::auth::AUTHENTICATION_COOKIE;
use service_core::database::DocumentModel;

use super::{JwtService, ServiceError};
use crate::models::User;

/// Session cookie handling around the issuer.
#[derive(Clone)]
pub struct AuthService {
    jwt: JwtService,
}

impl AuthService {
    pub fn new(jwt: JwtService) -> Self {
        Self { jwt }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// Issue a token for `user` and set it as the `Authentication` cookie.
    pub fn login(&self, user: &User, jar: CookieJar) -> Result<CookieJar, ServiceError> {
        let issued = self.jwt.issue(&user.id_string())?;
        let cookie = self.jwt.authentication_cookie(&issued)?;

        tracing::info!(user_id = %user.id, expires = %issued.expires, "User logged in");
        Ok(jar.add(cookie))
    }

    /// Clear the `Authentication` cookie. Tokens already handed out stay
    /// valid until they expire.
    pub fn logout(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build((AUTHENTICATION_COOKIE, "")).path("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use mongodb::bson::oid::ObjectId;
    use service_core::config::{keys, MapSettings};
    use std::sync::Arc;

    fn service() -> AuthService {
        AuthService::new(JwtService::new(Arc::new(
            MapSettings::new()
                .with(keys::JWT_SECRET, "test-secret")
                .with(keys::JWT_EXPIRATION, "3600"),
        )))
    }

    fn user() -> User {
        User {
            id: ObjectId::new(),
            email: "guest@example.com".to_string(),
            password: "$argon2id$hash".to_string(),
        }
    }

    #[test]
    fn test_login_sets_verifiable_cookie() {
        let auth = service();
        let user = user();

        let jar = auth.login(&user, CookieJar::new()).unwrap();

        let cookie = jar.get(AUTHENTICATION_COOKIE).unwrap();
        let claims = auth.jwt().verify(cookie.value()).unwrap();
        assert_eq!(claims.user_id, user.id.to_hex());
    }

    #[test]
    fn test_login_response_sets_http_only_cookie() {
        let auth = service();

        let response = auth.login(&user(), CookieJar::new()).unwrap().into_response();

        let set_cookie = response
            .headers()
            .get(axum::http::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("Authentication="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Expires="));
        assert!(!set_cookie.contains("Secure"));
    }

    #[test]
    fn test_logout_clears_cookie() {
        let auth = service();
        let jar = auth.login(&user(), CookieJar::new()).unwrap();

        let jar = auth.logout(jar);

        assert!(jar.get(AUTHENTICATION_COOKIE).is_none());
    }
}
