use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use supportpilot::{ErrorKind, SupportError};
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the `supportpilot` library.
    Support(SupportError),
    /// The request body was not valid JSON for the endpoint.
    Json(JsonRejection),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// Conversion from `SupportError` to `AppError`.
impl From<SupportError> for AppError {
    fn from(err: SupportError) -> Self {
        AppError::Support(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Json(rejection)
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message, details) = match self {
            AppError::Support(err) => match err.kind() {
                ErrorKind::Validation => {
                    warn!("Rejected request: {err}");
                    (StatusCode::BAD_REQUEST, err.to_string(), None)
                }
                // The detail may name a missing credential; it is logged, not returned.
                ErrorKind::Configuration => {
                    error!("Configuration error: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server is not configured correctly.".to_string(),
                        None,
                    )
                }
                ErrorKind::Collaborator | ErrorKind::Provider => {
                    error!("SupportError: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Server error".to_string(),
                        Some(err.to_string()),
                    )
                }
            },
            AppError::Json(rejection) => {
                warn!("Rejected request body: {}", rejection.body_text());
                (rejection.status(), rejection.body_text(), None)
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                    None,
                )
            }
        };

        let body = match details {
            Some(details) => json!({ "error": error_message, "details": details }),
            None => json!({ "error": error_message }),
        };

        (status_code, Json(body)).into_response()
    }
}
