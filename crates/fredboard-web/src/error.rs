use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fredboard_core::{ConfigError, Envelope, FredError, ValidationError};
use serde_json::Value;
use thiserror::Error;

/// Handler failure rendered as an error envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", .0.message())]
    Fred(#[from] FredError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error("invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("invalid query string: {0}")]
    InvalidQuery(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Fred(error) => {
                StatusCode::from_u16(error.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Validation(_) | Self::InvalidBody(_) | Self::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(Envelope::<Value>::failure(self.to_string()))).into_response()
    }
}

/// Startup failures of the binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
