//! Error types for the Drop server

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Upload exceeds the configured size limit")]
    PayloadTooLarge,

    #[error("Multipart error: {0}")]
    Upload(MultipartError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to send {name}: {source}")]
    SendFile {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::Upload(err)
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    message: &'static str,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoFileUploaded => StatusCode::BAD_REQUEST,
            AppError::FileNotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Upload(_) | AppError::Io(_) | AppError::SendFile { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AppError::NoFileUploaded => "No file uploaded!",
            AppError::FileNotFound(_) => "File not found!",
            AppError::PayloadTooLarge => "File too large!",
            AppError::Upload(_) | AppError::Io(_) => "Error saving file!",
            AppError::SendFile { .. } => "Error sending file!",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (status, Json(ErrorResponse { message: self.message() })).into_response()
    }
}
