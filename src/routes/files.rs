//! File serving routes
//!
//! Serves stored uploads back by their generated name.

use std::path::Path as FsPath;

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use futures::TryStreamExt;
use tokio_util::io::ReaderStream;
use tower_http::services::ServeDir;

use crate::error::{AppError, Result};
use crate::middleware::ClientAddr;
use crate::state::AppState;

/// Create the files router
///
/// `/uploads/*` is plain static serving of the storage root; `/file/:fileName`
/// answers misses with a JSON body.
pub fn router(storage_root: &FsPath) -> Router<AppState> {
    Router::new()
        .route("/file/:file_name", get(send_file))
        .nest_service("/uploads", ServeDir::new(storage_root))
}

/// GET /file/:fileName
async fn send_file(
    State(state): State<AppState>,
    Extension(client): Extension<ClientAddr>,
    Path(file_name): Path<String>,
) -> Result<Response> {
    tracing::info!(client_ip = %client, file_name = %file_name, "File fetch request");

    let lookup = state.store().metadata(&file_name).await;

    let Some((path, metadata)) = lookup else {
        tracing::info!(file_name = %file_name, "File not found");
        return Err(AppError::FileNotFound(file_name));
    };

    tracing::info!(path = %path.display(), "Sending file");

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|source| AppError::SendFile {
            name: file_name.clone(),
            source,
        })?;

    // Headers are committed once the body starts; a read failure past this
    // point aborts the connection instead of producing a new status.
    let stream = ReaderStream::new(file).inspect_err(move |e| {
        tracing::error!(file_name = %file_name, error = %e, "Error sending file");
    });

    let content_type = mime_guess::from_path(&path).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, metadata.len().to_string()),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
