use axum_extra::extract::cookie::CookieJar;
use http::HeaderMap;

use super::AuthError;

/// Cookie (and RPC payload field) carrying the signed token.
pub const AUTHENTICATION_COOKIE: &str = "Authentication";

/// Pick the credential: the cookie value first, then the payload field.
///
/// Blank values count as absent.
pub fn extract_token<'a>(
    cookie: Option<&'a str>,
    field: Option<&'a str>,
) -> Result<&'a str, AuthError> {
    cookie
        .into_iter()
        .chain(field)
        .map(str::trim)
        .find(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// `Authentication` cookie value from request headers, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(AUTHENTICATION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.trim().is_empty())
}
