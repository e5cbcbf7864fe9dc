//! Mysterio API: the HTTP adapter over the session engine.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::state::AppState;

/// Builds the application router with every route mounted.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/sessions", routes::sessions::router())
        .with_state(state)
}

/// Binds `addr` and serves `app` until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Server` if the address cannot be bound or the server
/// stops on an I/O error.
pub async fn serve(
    addr: SocketAddr,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    Ok(())
}
