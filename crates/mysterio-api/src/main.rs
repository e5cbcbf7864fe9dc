//! Mysterio API server entry point.

use std::sync::Arc;

use mysterio_api::config::ServerConfig;
use mysterio_api::error::AppError;
use mysterio_api::state::AppState;
use mysterio_scenario::{ScenarioSource, TemplateScenarioGenerator};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Cancels `shutdown` on Ctrl-C or SIGTERM.
fn spawn_shutdown_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
            () = terminate => tracing::info!("received SIGTERM, shutting down"),
        }

        shutdown.cancel();
    });
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Mysterio API server");

    let config = ServerConfig::from_env()?;
    let schema = config.load_schema()?;
    let addr = config.socket_addr()?;

    let shutdown = CancellationToken::new();
    spawn_shutdown_listener(shutdown.clone());

    let scenarios = ScenarioSource::new(
        Arc::new(TemplateScenarioGenerator::new()),
        Arc::new(schema),
        config.generation_timeout,
    );
    let app_state = AppState::in_memory(scenarios, shutdown.clone());

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = mysterio_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!(
        timeout_secs = config.generation_timeout.as_secs(),
        "Scenario generation time box configured"
    );

    mysterio_api::serve(addr, app, shutdown).await?;

    tracing::info!("Server stopped");
    Ok(())
}
