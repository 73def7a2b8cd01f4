use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required piece of server configuration is missing.
    ///
    /// Rendered as plain text: this is an operator problem, not a client one.
    #[error("{0}")]
    Configuration(String),

    /// No valid admin session accompanies the request.
    #[error("Unauthorized")]
    Unauthorized,

    /// An authentication error reported back to the caller.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Input could not be decoded (base64, UTF-8 or JSON).
    #[error("Decode error: {0}")]
    Decode(String),

    /// The backend could not be reached.
    #[error("Upstream error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The backend answered with something unusable.
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                    msg,
                )
                    .into_response();
            }

            AppError::Unauthorized => {
                tracing::debug!("Request without a valid admin session");
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }

            AppError::Authentication(msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                (StatusCode::UNAUTHORIZED, msg)
            }

            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }

            AppError::Encryption(msg) => {
                tracing::error!("Encryption error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Encryption error".to_string())
            }

            AppError::Decode(msg) => {
                tracing::debug!("Decode error: {}", msg);
                (StatusCode::BAD_REQUEST, "Malformed input".to_string())
            }

            AppError::Upstream(e) => {
                tracing::error!("Backend unreachable: {}", e);
                (StatusCode::BAD_GATEWAY, "Backend unavailable".to_string())
            }

            AppError::BadGateway(msg) => {
                tracing::error!("Bad gateway: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    }
}
