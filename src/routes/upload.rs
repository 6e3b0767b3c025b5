//! Upload routes
//!
//! Endpoints:
//! - POST /upload - Store the multipart `file` part under a generated name

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::middleware::ClientAddr;
use crate::state::AppState;

/// Multipart field that carries the uploaded file
pub const FILE_FIELD: &str = "file";

/// Create the upload router
pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(upload_file))
}

/// Response after a successful upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: &'static str,

    /// Public path served by the static `/uploads` route
    pub file_path: String,

    /// Stored name, usable with `/file/:fileName`
    pub file_name: String,
}

/// POST /upload
///
/// Only the first part named `file` that carries a filename is stored;
/// every other part is skipped.
async fn upload_file(
    State(state): State<AppState>,
    Extension(client): Extension<ClientAddr>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    tracing::info!(client_ip = %client, "File upload request");

    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::info!(reason = %rejection, "No file uploaded");
            return Err(AppError::NoFileUploaded);
        }
    };

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(original_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let stored = state.store().save(&original_name, field).await?;

        tracing::info!(
            client_ip = %client,
            file_name = %stored.stored_name,
            size = stored.size,
            "File uploaded successfully"
        );

        return Ok(Json(UploadResponse {
            message: "File uploaded successfully!",
            file_path: stored.public_path(),
            file_name: stored.stored_name,
        }));
    }

    tracing::info!(client_ip = %client, "No file uploaded");
    Err(AppError::NoFileUploaded)
}
