use axum::http::Request;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::error::ServerError;
use crate::handlers;
use crate::state::AppState;

/// Builds the router for the data routes, presets and status.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/fred/observations", get(handlers::observations))
        .route("/api/fred/series", get(handlers::series))
        .route("/api/fred/search", get(handlers::search))
        .route("/api/fred/category-series", get(handlers::category_series))
        .route("/api/fred/multi", post(handlers::multi))
        .route("/api/fred/presets", get(handlers::presets))
        .route("/api/fred/presets/:slug", get(handlers::preset_observations))
        .route("/api/status", get(handlers::status))
        .route("/api/validate-keys", post(handlers::validate_keys))
        .with_state(state)
        .layer(
            // Spans record the path only; query strings never reach the logs.
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| -> Span {
                tracing::info_span!(
                    "http_request",
                    request_id = %uuid::Uuid::new_v4(),
                    method = %request.method(),
                    path = request.uri().path(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
}

/// Serves until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "fredboard listening");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
