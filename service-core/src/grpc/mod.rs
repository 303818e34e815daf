//! gRPC plumbing shared by the services: the auth client used by the
//! gateway, status conversion, trace propagation and client retries.

pub mod auth_client;
pub mod error;
pub mod interceptors;
pub mod retry;

pub mod proto {
    pub mod auth {
        tonic::include_proto!("booking.auth.v1");
    }
}

pub use auth_client::{AuthClient, AuthClientConfig};
pub use error::{GrpcResult, IntoStatus};
pub use interceptors::{
    REQUEST_ID_KEY, extract_request_id, inject_trace_context, trace_context_interceptor,
    with_request_id,
};
pub use retry::{RetryConfig, is_retryable, retry_grpc_call};

pub use tonic::{Code, Request, Response, Status};
