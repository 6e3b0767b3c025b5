//! Health check endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub storage: StorageHealth,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageHealth {
    pub root: String,
    pub writable: bool,
}

/// Reports `503` while the storage root is missing or read-only
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let root = state.store().root();
    let writable = match tokio::fs::metadata(root).await {
        Ok(metadata) => metadata.is_dir() && !metadata.permissions().readonly(),
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "Storage root unavailable");
            false
        }
    };

    let (status, label) = if writable {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            version: env!("CARGO_PKG_VERSION"),
            service: "drop-server",
            storage: StorageHealth {
                root: root.display().to_string(),
                writable,
            },
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}
