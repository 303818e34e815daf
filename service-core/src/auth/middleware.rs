use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use super::{JwtAuthGuard, Principal};
use crate::error::AppError;

/// Reject requests the guard does not allow with a bare 401.
///
/// ```ignore
/// let app = Router::new()
///     .route("/reservations", get(list))
///     .layer(axum::middleware::from_fn_with_state(guard, require_auth));
/// ```
pub async fn require_auth(
    State(guard): State<JwtAuthGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !guard.can_activate(&mut req).await {
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Request denied by authentication guard"
        )));
    }

    Ok(next.run(req).await)
}

/// The principal attached by [`require_auth`].
pub struct CurrentUser(pub Principal);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts.extensions.get::<Principal>().ok_or_else(|| {
            AppError::Unauthorized(anyhow::anyhow!("No principal attached to request"))
        })?;

        Ok(CurrentUser(principal.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AUTHENTICATION_COOKIE;
    use crate::auth::guard::tests::MockAuthenticator;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn whoami(CurrentUser(principal): CurrentUser) -> String {
        principal.id
    }

    fn app(mock: Arc<MockAuthenticator>) -> Router {
        let guard = JwtAuthGuard::new(mock);
        Router::new()
            .route("/me", get(whoami))
            .layer(axum::middleware::from_fn_with_state(guard, require_auth))
    }

    #[tokio::test]
    async fn test_allowed_request_reaches_handler_with_principal() {
        let mock = Arc::new(MockAuthenticator::accepting());
        let request = axum::http::Request::builder()
            .uri("/me")
            .header("cookie", format!("{}=jwt-token", AUTHENTICATION_COOKIE))
            .body(Body::empty())
            .unwrap();

        let response = app(mock.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"user-1");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_denied_request_gets_generic_unauthorized() {
        let mock = Arc::new(MockAuthenticator::rejecting());
        let request = axum::http::Request::builder()
            .uri("/me")
            .header("cookie", format!("{}=jwt-token", AUTHENTICATION_COOKIE))
            .body(Body::empty())
            .unwrap();

        let response = app(mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_missing_cookie_is_unauthorized() {
        let mock = Arc::new(MockAuthenticator::accepting());
        let request = axum::http::Request::builder()
            .uri("/me")
            .body(Body::empty())
            .unwrap();

        let response = app(mock.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(mock.calls(), 0);
    }
}
