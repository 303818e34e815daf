use std::sync::Arc;

use super::{AuthError, Authenticator, token_from_headers};

/// Allow/deny decision for inbound requests, backed by a remote validator.
///
/// Holds no per-request state; one guard is shared by every request.
#[derive(Clone)]
pub struct JwtAuthGuard {
    authenticator: Arc<dyn Authenticator>,
}

impl JwtAuthGuard {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Decide whether `request` may proceed.
    ///
    /// Without an `Authentication` cookie the request is denied and the
    /// validator is never called. Otherwise exactly one validation call is
    /// made; on success the [`super::Principal`] is stored in the request
    /// extensions before `true` is returned. Every failure is a plain `false`.
    pub async fn can_activate<B>(&self, request: &mut http::Request<B>) -> bool {
        let Some(token) = token_from_headers(request.headers()) else {
            tracing::debug!("Request carries no authentication cookie");
            record_decision("missing_token");
            return false;
        };

        match self.authenticator.authenticate(&token).await {
            Ok(principal) => {
                tracing::debug!(user_id = %principal.id, "Request authenticated");
                request.extensions_mut().insert(principal);
                record_decision("allowed");
                true
            }
            Err(err) => {
                log_denial(&err);
                record_decision(if err.is_unavailable() {
                    "unavailable"
                } else {
                    "denied"
                });
                false
            }
        }
    }
}

fn log_denial(err: &AuthError) {
    if err.is_unavailable() {
        tracing::error!(error = %err, "Authentication service call failed, denying request");
    } else {
        tracing::warn!(error = %err, "Authentication rejected");
    }
}

fn record_decision(outcome: &'static str) {
    metrics::counter!("auth_gateway_decisions_total", "outcome" => outcome).increment(1);
}
