use std::net::SocketAddr;
use std::sync::Arc;

use auth_service::{
    config::AuthConfig,
    grpc::{
        proto::auth::{auth_service_server::AuthServiceServer, FILE_DESCRIPTOR_SET},
        AuthServiceImpl,
    },
    models::User,
    AppState,
};
use service_core::config::{EnvSettings, SettingsProvider};
use service_core::database::{DocumentModel, MongoDb};
use service_core::error::AppError;
use service_core::grpc::trace_context_interceptor;
use service_core::observability::init_tracing;
use tokio::signal;
use tonic::transport::Server;
use tower::ServiceBuilder;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings: Arc<dyn SettingsProvider> = Arc::new(EnvSettings::load());

    // Load configuration - fail fast if invalid
    let config = AuthConfig::from_settings(settings.as_ref())?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting authentication service"
    );

    let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
    db.health_check().await?;
    db.ensure_unique_index(User::COLLECTION, "email").await?;
    tracing::info!("Database initialized successfully");

    let state = AppState::new(db.repository::<User>(), settings);

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<AuthServiceServer<AuthServiceImpl>>()
        .await;

    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build_v1()
        .map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "Failed to build reflection service: {}",
                e
            ))
        })?;

    let layer = ServiceBuilder::new()
        .layer(tonic::service::interceptor(trace_context_interceptor))
        .into_inner();

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    tracing::info!(address = %addr, "gRPC server listening");

    Server::builder()
        .layer(layer)
        .add_service(health_service)
        .add_service(reflection_service)
        .add_service(AuthServiceServer::new(AuthServiceImpl::new(
            state.validator.clone(),
        )))
        .serve_with_shutdown(addr, shutdown_signal())
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("gRPC server error: {}", e)))?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
