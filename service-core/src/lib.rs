//! service-core: Shared infrastructure for booking microservices.
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod grpc;
pub mod observability;

pub use async_trait;
pub use axum;
pub use axum_extra;
pub use mongodb;
pub use prost;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tonic;
pub use tracing;
